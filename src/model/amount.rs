//! Amount type for the monetary fields of an expense.
//!
//! `Amount` wraps `Decimal` so the value typed by the user is stored exactly. The spreadsheet
//! format only knows floating point numbers, so the conversion to `f64` happens at export time.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Represents a monetary amount.
///
/// # Examples
///
/// Strict parsing:
/// ```
/// # use expense_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("250.50").unwrap();
/// assert_eq!(amount.to_string(), "250.50");
/// assert!(Amount::from_str("abc").is_err());
/// ```
///
/// Lenient parsing, as used for free-form input:
/// ```
/// # use expense_ledger::model::Amount;
/// assert!(Amount::parse_or_zero("abc").is_zero());
/// assert_eq!(Amount::parse_or_zero(" 12 ").to_f64(), 12.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Parses free-form input text, falling back to zero when the text is not a number.
    ///
    /// This never fails. An unparsable amount is not an error anywhere in this crate.
    pub fn parse_or_zero(s: &str) -> Self {
        Amount::from_str(s).unwrap_or(Amount::ZERO)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// The value widened to the floating point type used by spreadsheet cells.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or_default()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a finite number")]
    NotFinite(String),
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Accepts exactly what parses as an `f64`: plain decimals ("250", "-4.50", ".5") and
    /// scientific notation ("2.5e2"), but not digit separators ("1_000").
    ///
    /// Finite values beyond the `Decimal` range saturate at `Decimal::MAX` or `Decimal::MIN`
    /// with a warning.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let float: f64 = trimmed
            .parse()
            .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
        if !float.is_finite() {
            return Err(AmountError::NotFinite(trimmed.to_string()));
        }
        let value = Decimal::from_str_exact(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .or_else(|_| Decimal::try_from(float))
            .unwrap_or_else(|_| saturate(trimmed, float));
        Ok(Amount { value })
    }
}

/// Maps a finite value that `Decimal` cannot hold onto the nearest representable one.
fn saturate(text: &str, float: f64) -> Decimal {
    if float.abs() < 1.0 {
        return Decimal::ZERO;
    }
    let value = if float.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    warn!("The amount '{text}' is too large to store exactly, it is stored as {value}");
    value
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
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

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
