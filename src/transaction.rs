//! Transaction records held by a customer.

use crate::amount::Amount;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// An immutable credit recorded against a customer.
///
/// Only [`Customer::add_transaction`](crate::Customer::add_transaction)
/// creates these, and it is the one place the amount is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    amount: Amount,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn new(amount: Amount, timestamp: DateTime<Utc>) -> Self {
        Transaction { amount, timestamp }
    }

    /// The credited amount. Never negative.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// When the transaction was recorded.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Renders the report line `Amount: <a>, Date: <d>`.
impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Amount: {}, Date: {}",
            self.amount,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}
