//! Bank model: the root of the ledger.
//!
//! Every customer-facing operation goes through the bank, which first checks
//! that the branch handle it was given is registered with it before
//! delegating to [`Branch`] and [`Customer`](crate::Customer).

use crate::amount::Amount;
use crate::branch::{Branch, BranchHandle};
use crate::customer::CustomerHandle;
use crate::error::{LedgerError, Result};
use log::{debug, info, warn};
use std::fmt;
use std::io::Write;

/// A bank and the branches registered with it, in insertion order.
#[derive(Debug, Clone)]
pub struct Bank {
    name: String,
    branches: Vec<BranchHandle>,
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Bank {
            name: name.into(),
            branches: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered branches in insertion order.
    pub fn branches(&self) -> &[BranchHandle] {
        &self.branches
    }

    /// Registers a branch.
    ///
    /// Returns `false` if the same handle is already registered. Branches
    /// with equal names but distinct handles are both accepted.
    pub fn add_branch(&mut self, branch: &BranchHandle) -> bool {
        if self.check_branch(branch) {
            warn!("{} is already added to {}", branch.borrow().name(), self.name);
            return false;
        }

        self.branches.push(branch.clone());
        info!("{} is added now to {} bank", branch.borrow().name(), self.name);
        true
    }

    /// Returns `true` if this exact branch handle is registered with the bank.
    pub fn check_branch(&self, branch: &BranchHandle) -> bool {
        self.branches.contains(branch)
    }

    /// Registers `customer` with `branch`.
    ///
    /// Returns `false` if the branch is not part of this bank or the
    /// customer is already registered there.
    pub fn add_customer(&self, branch: &BranchHandle, customer: &CustomerHandle) -> bool {
        if !self.check_branch(branch) {
            warn!(
                "Branch {} is not found in {}",
                branch.borrow().name(),
                self.name
            );
            return false;
        }

        branch.borrow_mut().add_customer(customer)
    }

    /// Credits `amount` to the first customer of `branch` with `customer_id`.
    ///
    /// Returns `false` if the branch is not part of this bank, the id is not
    /// registered in it, or the amount is negative.
    pub fn add_customer_transaction(
        &self,
        branch: &BranchHandle,
        customer_id: u32,
        amount: Amount,
    ) -> bool {
        if !self.check_branch(branch) {
            warn!(
                "Branch {} is not found in {}",
                branch.borrow().name(),
                self.name
            );
            return false;
        }

        branch.borrow().add_customer_transaction(customer_id, amount)
    }

    /// Looks up a branch by exact, case-sensitive name.
    ///
    /// Returns `Ok(None)` when no branch matches and
    /// [`LedgerError::MissingField`] when `name` is empty.
    pub fn find_branch_by_name(&self, name: &str) -> Result<Option<String>> {
        if name.is_empty() {
            return Err(LedgerError::MissingField {
                field: "branch name",
            });
        }

        let found = self
            .branches
            .iter()
            .find(|branch| branch.borrow().name() == name)
            .map(|branch| branch.borrow().name().to_string());

        debug!("Lookup of branch '{}' in {}: {:?}", name, self.name, found);
        Ok(found)
    }

    /// Renders the customer report for `branch`.
    ///
    /// Fails with [`LedgerError::UnknownBranch`] if the branch is not part of
    /// this bank.
    pub fn list_customers(
        &self,
        branch: &BranchHandle,
        include_transactions: bool,
    ) -> Result<String> {
        self.ensure_branch(branch)?;

        let branch = branch.borrow();
        Ok(CustomerReport {
            branch: &branch,
            include_transactions,
        }
        .to_string())
    }

    /// Writes the customer report for `branch` to `writer`.
    pub fn write_customers<W: Write>(
        &self,
        branch: &BranchHandle,
        include_transactions: bool,
        mut writer: W,
    ) -> Result<()> {
        self.ensure_branch(branch)?;

        let branch = branch.borrow();
        let report = CustomerReport {
            branch: &branch,
            include_transactions,
        };
        write!(writer, "{}", report)?;
        writer.flush()?;
        Ok(())
    }

    fn ensure_branch(&self, branch: &BranchHandle) -> Result<()> {
        if self.check_branch(branch) {
            Ok(())
        } else {
            Err(LedgerError::UnknownBranch {
                name: branch.borrow().name().to_string(),
            })
        }
    }
}

/// The `Customers List:` report for one branch.
struct CustomerReport<'a> {
    branch: &'a Branch,
    include_transactions: bool,
}

impl fmt::Display for CustomerReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Customers List:")?;

        for customer in self.branch.customers() {
            let customer = customer.borrow();
            writeln!(f, "Name: {}", customer.name())?;
            writeln!(f, " Id: {}", customer.id())?;

            if !self.include_transactions {
                continue;
            }
            writeln!(f, "Transactions:")?;
            if customer.transactions().is_empty() {
                writeln!(f, " Empty...")?;
            }
            for tx in customer.transactions() {
                writeln!(f, "{}", tx)?;
            }
        }

        Ok(())
    }
}
