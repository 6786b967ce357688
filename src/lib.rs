//! # Branch Ledger
//!
//! An in-memory banking ledger: banks contain branches, branches contain
//! customers, customers accumulate transactions.
//!
//! ## Design Principles
//!
//! - **Identity handles**: branches and customers are shared through
//!   [`Handle`]s compared by key, so the same customer can sit in several
//!   branches and membership checks never depend on names or ids
//! - **Single validation point**: only [`Customer::add_transaction`] rejects
//!   negative amounts; branch and bank propagate its answer
//! - **Two failure channels**: expected rejections return `false`,
//!   exceptional conditions return [`LedgerError`]
//! - **Fixed-point arithmetic**: amounts carry 2 decimal places via `rust_decimal`
//!
//! ## Example
//!
//! ```
//! use branch_ledger::{Amount, Bank, Branch, Customer};
//!
//! let mut bank = Bank::new("Arizona");
//! let west = Branch::shared("West Branch");
//! let john = Customer::shared("John", 1);
//!
//! assert!(bank.add_branch(&west));
//! assert!(bank.add_customer(&west, &john));
//! assert!(bank.add_customer_transaction(&west, 1, Amount::from(3000)));
//! assert_eq!(john.borrow().balance().to_string(), "3000.00");
//! ```

pub mod amount;
pub mod bank;
pub mod branch;
pub mod customer;
pub mod error;
pub mod handle;
pub mod script;
pub mod transaction;

pub use amount::{Amount, AmountError};
pub use bank::Bank;
pub use branch::{Branch, BranchHandle};
pub use customer::{Customer, CustomerHandle};
pub use error::{LedgerError, Result};
pub use handle::Handle;
pub use script::{RunSummary, ScriptOp, ScriptRecord, ScriptRunner};
pub use transaction::Transaction;
