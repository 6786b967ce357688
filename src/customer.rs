//! Customer model and its transaction history.

use crate::amount::Amount;
use crate::handle::Handle;
use crate::transaction::Transaction;
use chrono::Utc;
use log::{info, warn};

/// Shared reference to a [`Customer`].
pub type CustomerHandle = Handle<Customer>;

/// A customer and the transactions credited to them.
///
/// # Invariants
///
/// - Every recorded transaction has a non-negative amount
/// - `balance` equals the sum of `transactions` and never overflows
#[derive(Debug, Clone)]
pub struct Customer {
    name: String,
    id: u32,
    transactions: Vec<Transaction>,
    balance: Amount,
}

impl Customer {
    /// Creates a customer with no transactions.
    ///
    /// The id is chosen by the caller and is not checked for uniqueness.
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Customer {
            name: name.into(),
            id,
            transactions: Vec::new(),
            balance: Amount::ZERO,
        }
    }

    /// Creates a customer and wraps it in a shared handle.
    pub fn shared(name: impl Into<String>, id: u32) -> CustomerHandle {
        Handle::new(Self::new(name, id))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Transactions in the order they were recorded.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Records a credit stamped with the current time.
    ///
    /// Returns `false` and leaves the history untouched if `amount` is
    /// negative or the balance could no longer be represented.
    pub fn add_transaction(&mut self, amount: Amount) -> bool {
        if amount.is_negative() {
            warn!(
                "Negative values are not accepted: {} for customer {}",
                amount, self.id
            );
            return false;
        }

        let Some(balance) = self.balance.checked_add(amount) else {
            warn!(
                "Balance overflow: {} cannot be added to customer {}",
                amount, self.id
            );
            return false;
        };

        self.transactions.push(Transaction::new(amount, Utc::now()));
        self.balance = balance;
        info!("{} is added now to {} account", amount, self.name);
        true
    }

    /// Sum of all recorded amounts; zero when there are none.
    pub fn balance(&self) -> Amount {
        self.balance
    }
}
