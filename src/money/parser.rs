//! Parsing of pt-BR currency text into [`Money`].

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{DashboardError, DashboardResult};

use super::Money;

/// The currency prefix stripped before parsing.
pub const CURRENCY_SYMBOL: &str = "R$";

/// The placeholder spreadsheets use for "no amount".
pub const EMPTY_SENTINEL: &str = "-";

/// The pt-BR thousands separator.
pub const THOUSANDS_SEPARATOR: char = '.';

/// The pt-BR decimal separator.
pub const DECIMAL_SEPARATOR: char = ',';

/// A raw amount as it arrives from a cell or an operator form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawAmount<'a> {
    /// Locale-formatted text, e.g. `"R$ 1.234,56"`.
    Text(&'a str),
    /// An already numeric amount.
    Number(Decimal),
}

impl<'a> From<&'a str> for RawAmount<'a> {
    fn from(value: &'a str) -> Self {
        RawAmount::Text(value)
    }
}

impl<'a> From<&'a String> for RawAmount<'a> {
    fn from(value: &'a String) -> Self {
        RawAmount::Text(value.as_str())
    }
}

impl From<Decimal> for RawAmount<'_> {
    fn from(value: Decimal) -> Self {
        RawAmount::Number(value)
    }
}

/// Returns true if the text denotes an absent amount (blank or `-`).
pub fn is_blank_amount(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == EMPTY_SENTINEL
}

/// Parses a raw amount into [`Money`].
///
/// Numbers pass through unchanged. Text is trimmed; blank text and the `-`
/// sentinel are zero. Otherwise the `R$` prefix is stripped, every `.` is
/// removed and `,` becomes the decimal point.
///
/// # Errors
///
/// Returns `MalformedAmount` when the remaining text is not an unsigned
/// decimal numeral, or when a numeric input is negative.
///
/// # Examples
///
/// ```
/// use cost_dashboard::money::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("R$ 1.234,56").unwrap().amount(), Decimal::new(123456, 2));
/// assert!(parse_amount("-").unwrap().is_zero());
/// assert!(parse_amount("R$ 12abc").is_err());
/// ```
pub fn parse_amount<'a>(raw: impl Into<RawAmount<'a>>) -> DashboardResult<Money> {
    match raw.into() {
        RawAmount::Number(value) => Money::new(value),
        RawAmount::Text(text) => parse_text(text),
    }
}

fn parse_text(text: &str) -> DashboardResult<Money> {
    if is_blank_amount(text) {
        return Ok(Money::ZERO);
    }

    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix(CURRENCY_SYMBOL)
        .unwrap_or(trimmed)
        .trim();

    let canonical: String = digits
        .chars()
        .filter(|c| *c != THOUSANDS_SEPARATOR)
        .map(|c| if c == DECIMAL_SEPARATOR { '.' } else { c })
        .collect();

    let malformed = || DashboardError::MalformedAmount {
        raw: text.to_string(),
    };

    if !is_unsigned_numeral(&canonical) {
        return Err(malformed());
    }

    let value = Decimal::from_str(&canonical).map_err(|_| malformed())?;
    Money::new(value)
}

/// Digits with at most one decimal point and at least one digit.
fn is_unsigned_numeral(text: &str) -> bool {
    let mut points = 0;
    let mut digits = 0;
    for c in text.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}
