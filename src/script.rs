//! CSV-driven scripts against a single bank.
//!
//! A script is a CSV file with the header `op,branch,customer,id,amount`.
//! Rows are read one at a time; a row that fails to parse or is rejected by
//! the ledger is logged at warn level and the run continues.

use crate::amount::Amount;
use crate::bank::Bank;
use crate::branch::{Branch, BranchHandle};
use crate::customer::{Customer, CustomerHandle};
use crate::error::{LedgerError, Result};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{Read, Write};

/// Raw script row as read from CSV. Columns an op does not use may be empty.
#[derive(Debug, Deserialize)]
pub struct ScriptRecord {
    pub op: String,

    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default)]
    pub customer: Option<String>,

    #[serde(default)]
    pub id: Option<u32>,

    #[serde(default)]
    pub amount: Option<Amount>,
}

/// A parsed script operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOp {
    /// Create the named branch on first use and register it with the bank.
    AddBranch { branch: String },

    /// Create the customer on first sight of its id and register it with a branch.
    AddCustomer { branch: String, name: String, id: u32 },

    /// Credit a customer through the bank and branch.
    Deposit { branch: String, id: u32, amount: Amount },

    /// Credit a customer directly, bypassing bank and branch.
    Transaction { id: u32, amount: Amount },

    /// Look a branch up by name. The name may be empty.
    Find { branch: String },

    /// Report a customer's balance.
    Balance { id: u32 },

    /// Report a branch's customers.
    List {
        branch: String,
        include_transactions: bool,
    },
}

impl ScriptRecord {
    /// Parses the raw row into a typed operation, or explains what is missing.
    pub fn parse(&self) -> std::result::Result<ScriptOp, String> {
        let op = self.op.trim().to_lowercase();

        match op.as_str() {
            "branch" => Ok(ScriptOp::AddBranch {
                branch: self.branch_name()?,
            }),
            "customer" => Ok(ScriptOp::AddCustomer {
                branch: self.branch_name()?,
                name: self.customer_name()?,
                id: self.customer_id()?,
            }),
            "deposit" => Ok(ScriptOp::Deposit {
                branch: self.branch_name()?,
                id: self.customer_id()?,
                amount: self.parse_amount()?,
            }),
            "transaction" => Ok(ScriptOp::Transaction {
                id: self.customer_id()?,
                amount: self.parse_amount()?,
            }),
            "find" => Ok(ScriptOp::Find {
                branch: self.branch.as_deref().unwrap_or("").trim().to_string(),
            }),
            "balance" => Ok(ScriptOp::Balance {
                id: self.customer_id()?,
            }),
            "list" | "list_transactions" => Ok(ScriptOp::List {
                branch: self.branch_name()?,
                include_transactions: op == "list_transactions",
            }),
            other => Err(format!("unknown op '{}'", other)),
        }
    }

    fn branch_name(&self) -> std::result::Result<String, String> {
        non_empty(self.branch.as_deref()).ok_or_else(|| "missing branch".to_string())
    }

    fn customer_name(&self) -> std::result::Result<String, String> {
        non_empty(self.customer.as_deref()).ok_or_else(|| "missing customer name".to_string())
    }

    fn customer_id(&self) -> std::result::Result<u32, String> {
        self.id.ok_or_else(|| "missing customer id".to_string())
    }

    fn parse_amount(&self) -> std::result::Result<Amount, String> {
        self.amount.ok_or_else(|| "missing amount".to_string())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Counts of script rows by outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows the ledger accepted.
    pub applied: usize,

    /// Rows that failed to parse or that the ledger rejected.
    pub rejected: usize,
}

/// Runs scripts against one bank.
///
/// Branches are remembered by name and customers by id, so every row that
/// names them refers to the same handle.
pub struct ScriptRunner {
    bank: Bank,

    /// Branches created by this runner, indexed by name.
    branches: HashMap<String, BranchHandle>,

    /// Customers created by this runner, indexed by id.
    customers: HashMap<u32, CustomerHandle>,
}

impl ScriptRunner {
    /// Creates a runner around an empty bank.
    pub fn new(bank_name: impl Into<String>) -> Self {
        ScriptRunner {
            bank: Bank::new(bank_name),
            branches: HashMap::new(),
            customers: HashMap::new(),
        }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// The branch this runner created under `name`, if any.
    pub fn branch(&self, name: &str) -> Option<&BranchHandle> {
        self.branches.get(name)
    }

    /// The customer this runner created with `id`, if any.
    pub fn customer(&self, id: u32) -> Option<&CustomerHandle> {
        self.customers.get(&id)
    }

    /// Executes a script, writing lookup results and reports to `writer`.
    ///
    /// Only I/O failures abort the run; everything else is counted as rejected.
    pub fn run<R: Read, W: Write>(&mut self, reader: R, mut writer: W) -> Result<RunSummary> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut summary = RunSummary::default();

        for (row_idx, result) in csv_reader.deserialize::<ScriptRecord>().enumerate() {
            let row = row_idx + 2; // 1-indexed, accounting for header row

            let outcome = match result {
                Ok(record) => match record.parse() {
                    Ok(op) => self.apply(op, row, &mut writer),
                    Err(message) => Err(LedgerError::InvalidRecord { row, message }),
                },
                Err(e) => Err(LedgerError::Csv(e)),
            };

            match outcome {
                Ok(true) => summary.applied += 1,
                Ok(false) => {
                    debug!("Row {}: rejected by the ledger", row);
                    summary.rejected += 1;
                }
                Err(LedgerError::Io(e)) => return Err(LedgerError::Io(e)),
                Err(e) => {
                    warn!("Row {}: {}", row, e);
                    summary.rejected += 1;
                }
            }
        }

        writer.flush()?;
        Ok(summary)
    }

    /// Applies one operation. `Ok(false)` means the ledger refused it.
    fn apply<W: Write>(&mut self, op: ScriptOp, row: usize, writer: &mut W) -> Result<bool> {
        match op {
            ScriptOp::AddBranch { branch } => {
                let handle = self
                    .branches
                    .entry(branch.clone())
                    .or_insert_with(|| Branch::shared(branch))
                    .clone();
                Ok(self.bank.add_branch(&handle))
            }
            ScriptOp::AddCustomer { branch, name, id } => {
                let branch = self.known_branch(&branch, row)?;
                let customer = self
                    .customers
                    .entry(id)
                    .or_insert_with(|| Customer::shared(name.as_str(), id))
                    .clone();

                let existing = customer.borrow().name().to_string();
                if existing != name {
                    warn!(
                        "Row {}: customer {} is already {}, ignoring name {}",
                        row, id, existing, name
                    );
                }
                Ok(self.bank.add_customer(&branch, &customer))
            }
            ScriptOp::Deposit { branch, id, amount } => {
                let branch = self.known_branch(&branch, row)?;
                Ok(self.bank.add_customer_transaction(&branch, id, amount))
            }
            ScriptOp::Transaction { id, amount } => {
                let customer = self.known_customer(id, row)?;
                let accepted = customer.borrow_mut().add_transaction(amount);
                Ok(accepted)
            }
            ScriptOp::Find { branch } => {
                match self.bank.find_branch_by_name(&branch)? {
                    Some(found) => writeln!(writer, "Found: {}", found)?,
                    None => writeln!(writer, "Not found: {}", branch)?,
                }
                Ok(true)
            }
            ScriptOp::Balance { id } => {
                let customer = self.known_customer(id, row)?;
                let customer = customer.borrow();
                writeln!(
                    writer,
                    "Balance of {} ({}): {}",
                    customer.name(),
                    customer.id(),
                    customer.balance()
                )?;
                Ok(true)
            }
            ScriptOp::List {
                branch,
                include_transactions,
            } => {
                let branch = self.known_branch(&branch, row)?;
                self.bank
                    .write_customers(&branch, include_transactions, &mut *writer)?;
                Ok(true)
            }
        }
    }

    fn known_branch(&self, name: &str, row: usize) -> Result<BranchHandle> {
        self.branches
            .get(name)
            .cloned()
            .ok_or_else(|| LedgerError::InvalidRecord {
                row,
                message: format!("branch '{}' was never created", name),
            })
    }

    fn known_customer(&self, id: u32, row: usize) -> Result<CustomerHandle> {
        self.customers
            .get(&id)
            .cloned()
            .ok_or_else(|| LedgerError::InvalidRecord {
                row,
                message: format!("customer {} was never created", id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(csv: &str) -> (ScriptRunner, RunSummary, String) {
        let mut runner = ScriptRunner::new("Arizona");
        let mut output = Vec::new();
        let summary = runner.run(Cursor::new(csv), &mut output).unwrap();
        (runner, summary, String::from_utf8(output).unwrap())
    }

    fn record(
        op: &str,
        branch: &str,
        customer: &str,
        id: Option<u32>,
        amount: Option<i64>,
    ) -> ScriptRecord {
        let field = |s: &str| (!s.is_empty()).then(|| s.to_string());
        ScriptRecord {
            op: op.to_string(),
            branch: field(branch),
            customer: field(customer),
            id,
            amount: amount.map(Amount::from),
        }
    }

    #[test]
    fn test_parse_deposit() {
        let op = record("deposit", "West Branch", "", Some(1), Some(3000)).parse().unwrap();
        assert_eq!(
            op,
            ScriptOp::Deposit {
                branch: "West Branch".to_string(),
                id: 1,
                amount: Amount::from(3000),
            }
        );
    }

    #[test]
    fn test_parse_keeps_negative_amounts() {
        let op = record("transaction", "", "", Some(1), Some(-1000)).parse().unwrap();
        assert_eq!(
            op,
            ScriptOp::Transaction {
                id: 1,
                amount: Amount::from(-1000),
            }
        );
    }

    #[test]
    fn test_parse_find_allows_empty_branch() {
        let op = record("find", "", "", None, None).parse().unwrap();
        assert_eq!(op, ScriptOp::Find { branch: String::new() });
    }

    #[test]
    fn test_parse_list_variants() {
        let plain = record("list", "Sun Branch", "", None, None).parse().unwrap();
        let detailed = record(" LIST_TRANSACTIONS ", "Sun Branch", "", None, None).parse().unwrap();

        assert!(matches!(plain, ScriptOp::List { include_transactions: false, .. }));
        assert!(matches!(detailed, ScriptOp::List { include_transactions: true, .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_op() {
        assert!(record("withdraw", "West", "", Some(1), Some(5)).parse().is_err());
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(record("customer", "West", "", Some(1), None).parse().is_err());
        assert!(record("customer", "West", "John", None, None).parse().is_err());
        assert!(record("deposit", "West", "", Some(1), None).parse().is_err());
        assert!(record("branch", "", "", None, None).parse().is_err());
    }

    #[test]
    fn test_customer_shared_across_branches() {
        let csv = r#"op,branch,customer,id,amount
branch,West Branch,,,
branch,Sun Branch,,,
customer,West Branch,John,1,
customer,Sun Branch,John,1,
deposit,West Branch,,1,3000
deposit,Sun Branch,,1,2000
balance,,,1,"#;

        let (runner, summary, output) = run_script(csv);

        assert_eq!(summary, RunSummary { applied: 7, rejected: 0 });
        assert_eq!(output, "Balance of John (1): 5000.00\n");

        let west = runner.branch("West Branch").unwrap();
        let sun = runner.branch("Sun Branch").unwrap();
        assert_eq!(west.borrow().customers()[0], sun.borrow().customers()[0]);
    }

    #[test]
    fn test_repeated_branch_is_rejected() {
        let csv = r#"op,branch,customer,id,amount
branch,West Branch,,,
branch,West Branch,,,"#;

        let (runner, summary, _) = run_script(csv);
        assert_eq!(summary, RunSummary { applied: 1, rejected: 1 });
        assert_eq!(runner.bank().branches().len(), 1);
    }

    #[test]
    fn test_find_outputs() {
        let csv = r#"op,branch,customer,id,amount
branch,Sun Branch,,,
find,Sun Branch,,,
find,sun,,,
find,,,,"#;

        let (_, summary, output) = run_script(csv);
        assert_eq!(output, "Found: Sun Branch\nNot found: sun\n");
        assert_eq!(summary, RunSummary { applied: 3, rejected: 1 });
    }

    #[test]
    fn test_unknown_references_are_skipped() {
        let csv = r#"op,branch,customer,id,amount
customer,Nowhere,John,1,
transaction,,,7,10
balance,,,7,
bogus,,,,"#;

        let (runner, summary, output) = run_script(csv);
        assert_eq!(summary, RunSummary { applied: 0, rejected: 4 });
        assert!(output.is_empty());
        assert!(runner.customer(1).is_none());
    }

    #[test]
    fn test_negative_direct_transaction_is_rejected() {
        let csv = r#"op,branch,customer,id,amount
branch,West Branch,,,
customer,West Branch,John,1,
deposit,West Branch,,1,3000
transaction,,,1,-1000
balance,,,1,"#;

        let (_, summary, output) = run_script(csv);
        assert_eq!(summary.rejected, 1);
        assert_eq!(output, "Balance of John (1): 3000.00\n");
    }

    #[test]
    fn test_list_output() {
        let csv = r#"op,branch,customer,id,amount
branch,Sun Branch,,,
customer,Sun Branch,Anna,2,
list_transactions,Sun Branch,,,"#;

        let (_, _, output) = run_script(csv);
        assert_eq!(
            output,
            "Customers List:\nName: Anna\n Id: 2\nTransactions:\n Empty...\n"
        );
    }

    #[test]
    fn test_bad_amounts_are_skipped() {
        let csv = r#"op,branch,customer,id,amount
branch,West Branch,,,
customer,West Branch,John,1,
deposit,West Branch,,1,abc
transaction,,,1,-0.001
deposit,West Branch,,1,0.005
balance,,,1,"#;

        let (runner, summary, output) = run_script(csv);
        assert_eq!(summary, RunSummary { applied: 3, rejected: 3 });
        assert_eq!(output, "Balance of John (1): 0.00
");
        assert!(runner.customer(1).unwrap().borrow().transactions().is_empty());
    }

    #[test]
    fn test_overflowing_deposit_does_not_panic() {
        let csv = r#"op,branch,customer,id,amount
branch,West Branch,,,
customer,West Branch,John,1,
deposit,West Branch,,1,79228162514264337593543950335
deposit,West Branch,,1,79228162514264337593543950335
balance,,,1,
list_transactions,West Branch,,,"#;

        let (_, summary, output) = run_script(csv);
        assert_eq!(summary, RunSummary { applied: 5, rejected: 1 });
        assert!(output.starts_with("Balance of John (1): 79228162514264337593543950335"));
    }

    #[test]
    fn test_reused_id_keeps_first_name() {
        let csv = r#"op,branch,customer,id,amount
branch,West Branch,,,
branch,Sun Branch,,,
customer,West Branch,John,1,
customer,Sun Branch,Johnny,1,"#;

        let (runner, summary, _) = run_script(csv);
        assert_eq!(summary.applied, 4);

        let sun = runner.branch("Sun Branch").unwrap();
        assert_eq!(sun.borrow().customers()[0].borrow().name(), "John");
    }

    #[test]
    fn test_short_rows_are_accepted() {
        let csv = "op,branch,customer,id,amount\nbranch,West Branch\nfind,West Branch\n";

        let (_, summary, output) = run_script(csv);
        assert_eq!(summary, RunSummary { applied: 2, rejected: 0 });
        assert_eq!(output, "Found: West Branch\n");
    }
}
