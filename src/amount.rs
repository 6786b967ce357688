//! Monetary amounts in whole cents.
//!
//! Backed by `rust_decimal`. Values finer than a cent are refused at parse
//! time instead of being rounded, so a sub-cent negative can never turn into
//! `-0.00` and slip past the sign check.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a value could not become an [`Amount`].
#[derive(Error, Debug)]
pub enum AmountError {
    #[error("not a decimal number: {0}")]
    Parse(#[from] rust_decimal::Error),

    #[error("{value} has more than {} decimal places", Amount::SCALE)]
    TooPrecise { value: Decimal },
}

/// A monetary amount with at most 2 decimal places, always displayed with 2.
///
/// Negative amounts are representable; rejecting them is the job of
/// [`Customer::add_transaction`](crate::Customer::add_transaction).
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use branch_ledger::Amount;
///
/// let amount = Amount::from_str("3000").unwrap();
/// assert_eq!(amount.to_string(), "3000.00");
/// assert!(Amount::from_str("0.001").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Decimal places kept.
    pub const SCALE: u32 = 2;

    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Strictly below zero. `-0.00` is not negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Sum of two amounts, or `None` if it exceeds what `Decimal` can hold.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        // 1.50 and 1.500 are the same cent value; only real sub-cent digits fail
        if value.normalize().scale() > Self::SCALE {
            return Err(AmountError::TooPrecise { value });
        }
        Ok(Amount(value))
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::try_from(Decimal::from_str(s.trim())?)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
