//! Monetary values and their locale text representation.
//!
//! Every amount the dashboard handles is a [`Money`]: an exact, non-negative
//! decimal in Brazilian Real. The [`parse_amount`] and [`format_brl`]
//! functions convert between `Money` and the pt-BR currency text found in the
//! source spreadsheets (`R$ 1.234,56`).

mod format;
mod parser;

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

pub use format::{AmountStyle, MIN_FRACTION_DIGITS, format_amount, format_brl};
pub use parser::{
    CURRENCY_SYMBOL, DECIMAL_SEPARATOR, EMPTY_SENTINEL, RawAmount, THOUSANDS_SEPARATOR,
    is_blank_amount, parse_amount,
};

/// An exact, non-negative amount of money.
///
/// Serializes as a decimal string (e.g. `"1234.56"`) and deserializes from a
/// decimal string or number, rejecting negative values.
///
/// # Example
///
/// ```
/// use cost_dashboard::money::Money;
/// use rust_decimal::Decimal;
///
/// let salary = Money::new(Decimal::new(100000, 2)).unwrap();
/// let total = Money::checked_sum([salary, salary]).unwrap();
/// assert_eq!(total.amount(), Decimal::new(2000, 0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates a `Money` from a decimal, failing with `MalformedAmount` when
    /// the value is negative.
    pub fn new(amount: Decimal) -> DashboardResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DashboardError::MalformedAmount {
                raw: amount.to_string(),
            });
        }
        Ok(Money(amount))
    }

    /// Returns the underlying decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies the amount by a non-negative factor, returning `None` when
    /// the product leaves the decimal range.
    ///
    /// Factors come from validated configuration (contract multipliers) or
    /// from fixed period counts, so the result stays non-negative.
    pub fn checked_times(self, factor: Decimal) -> Option<Money> {
        debug_assert!(!factor.is_sign_negative() || factor.is_zero());
        self.0.checked_mul(factor).map(Money)
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Sums a sequence of amounts, returning `None` as soon as the running
    /// total overflows.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |total, amount| total.checked_add(amount))
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DashboardError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl From<u32> for Money {
    fn from(value: u32) -> Self {
        Money(Decimal::from(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_brl(*self))
    }
}

impl FromStr for Money {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_amount(s)
    }
}
