//! Error types for the ledger.

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Exceptional failures.
///
/// Expected, recoverable rejections (negative amounts, duplicates, unknown
/// customer ids) are reported through `bool` returns instead.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to open or read the script file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// A required input was empty
    #[error("Please fill in all the required fields: {field} is empty")]
    MissingField { field: &'static str },

    /// The branch is not registered with the bank
    #[error("The branch '{name}' is not found")]
    UnknownBranch { name: String },

    /// Invalid script record
    #[error("Invalid script record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },
}
