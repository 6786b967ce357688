//! Branch model: an ordered set of customer handles.

use crate::amount::Amount;
use crate::customer::CustomerHandle;
use crate::handle::Handle;
use log::{debug, info, warn};

/// Shared reference to a [`Branch`].
pub type BranchHandle = Handle<Branch>;

/// A branch and the customers registered with it.
///
/// Customers are kept in insertion order and deduplicated by handle
/// identity, so two distinct customers may share a name or an id.
#[derive(Debug, Clone)]
pub struct Branch {
    name: String,
    customers: Vec<CustomerHandle>,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Branch {
            name: name.into(),
            customers: Vec::new(),
        }
    }

    /// Creates a branch and wraps it in a shared handle.
    pub fn shared(name: impl Into<String>) -> BranchHandle {
        Handle::new(Self::new(name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered customers in insertion order.
    pub fn customers(&self) -> &[CustomerHandle] {
        &self.customers
    }

    /// Returns `true` if this exact customer handle is registered here.
    pub fn contains(&self, customer: &CustomerHandle) -> bool {
        self.customers.contains(customer)
    }

    /// First customer, in insertion order, whose id equals `customer_id`.
    pub fn find_customer(&self, customer_id: u32) -> Option<&CustomerHandle> {
        self.customers
            .iter()
            .find(|customer| customer.borrow().id() == customer_id)
    }

    /// Registers a customer.
    ///
    /// Returns `false` if the same handle is already registered.
    pub fn add_customer(&mut self, customer: &CustomerHandle) -> bool {
        if self.contains(customer) {
            warn!(
                "{} is already added to {}",
                customer.borrow().name(),
                self.name
            );
            return false;
        }

        self.customers.push(customer.clone());
        info!("{} is added now to {}", customer.borrow().name(), self.name);
        true
    }

    /// Credits `amount` to the first customer with `customer_id`.
    ///
    /// Returns `false` if no such customer is registered or the customer
    /// rejects the amount.
    pub fn add_customer_transaction(&self, customer_id: u32, amount: Amount) -> bool {
        match self.find_customer(customer_id) {
            Some(customer) => {
                debug!("Found customer {} in {}", customer_id, self.name);
                customer.borrow_mut().add_transaction(amount)
            }
            None => {
                warn!(
                    "Customer id {} is incorrect or not registered in {}",
                    customer_id, self.name
                );
                false
            }
        }
    }
}
