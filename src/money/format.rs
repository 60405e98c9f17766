//! Rendering of [`Money`] as locale text.

use num_format::{CustomFormat, ToFormattedString};
use serde::{Deserialize, Serialize};

use super::Money;
use super::parser::{CURRENCY_SYMBOL, DECIMAL_SEPARATOR, THOUSANDS_SEPARATOR};

/// Fewest fractional digits ever rendered.
pub const MIN_FRACTION_DIGITS: u32 = 2;

/// How amounts are rendered in exported files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountStyle {
    /// `1234.56`
    Plain,
    /// `1234,56`
    DecimalComma,
    /// `R$ 1.234,56`
    #[default]
    Currency,
}

/// Formats an amount as pt-BR currency text, e.g. `R$ 1.234,56`.
///
/// At least two fractional digits are always printed; amounts carrying more
/// precision keep all of it, so [`parse_amount`](super::parse_amount) reads
/// back exactly the same value.
///
/// # Example
///
/// ```
/// use cost_dashboard::money::{format_brl, parse_amount};
///
/// let value = parse_amount("1234567,8").unwrap();
/// assert_eq!(format_brl(value), "R$ 1.234.567,80");
/// ```
pub fn format_brl(value: Money) -> String {
    format_amount(value, AmountStyle::Currency)
}

/// Formats an amount in the given style.
pub fn format_amount(value: Money, style: AmountStyle) -> String {
    let (integer, fraction) = fixed_point(value);
    match style {
        AmountStyle::Plain => format!("{}.{}", integer, fraction),
        AmountStyle::DecimalComma => format!("{}{}{}", integer, DECIMAL_SEPARATOR, fraction),
        AmountStyle::Currency => format!(
            "{} {}{}{}",
            CURRENCY_SYMBOL,
            group_thousands(&integer),
            DECIMAL_SEPARATOR,
            fraction
        ),
    }
}

/// Splits the amount into integer and fraction digits.
fn fixed_point(value: Money) -> (String, String) {
    let amount = value.amount();
    let scale = amount.normalize().scale().max(MIN_FRACTION_DIGITS) as usize;
    let rendered = format!("{:.*}", scale, amount);
    match rendered.split_once('.') {
        Some((integer, fraction)) => (integer.to_string(), fraction.to_string()),
        None => (rendered, "0".repeat(scale)),
    }
}

fn group_thousands(integer: &str) -> String {
    let grouping = CustomFormat::builder()
        .separator(THOUSANDS_SEPARATOR.to_string())
        .build();
    match (grouping, integer.parse::<u128>()) {
        (Ok(grouping), Ok(units)) => units.to_formatted_string(&grouping),
        _ => integer.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    #[test]
    fn test_currency_groups_thousands() {
        assert_eq!(format_brl(money("1234567.89")), "R$ 1.234.567,89");
    }

    #[test]
    fn test_currency_small_amount() {
        assert_eq!(format_brl(money("950.5")), "R$ 950,50");
    }

    #[test]
    fn test_zero_renders_two_decimals() {
        assert_eq!(format_brl(Money::ZERO), "R$ 0,00");
    }

    #[test]
    fn test_trailing_zero_scale_is_not_widened() {
        assert_eq!(format_brl(money("2800.000")), "R$ 2.800,00");
    }

    #[test]
    fn test_extra_precision_is_kept() {
        assert_eq!(format_brl(money("1.23456")), "R$ 1,23456");
    }

    #[test]
    fn test_plain_style() {
        assert_eq!(format_amount(money("1234.5"), AmountStyle::Plain), "1234.50");
    }

    #[test]
    fn test_decimal_comma_style() {
        assert_eq!(
            format_amount(money("1234.5"), AmountStyle::DecimalComma),
            "1234,50"
        );
    }

    #[test]
    fn test_amount_style_deserializes_snake_case() {
        let style: AmountStyle = serde_json::from_str("\"decimal_comma\"").unwrap();
        assert_eq!(style, AmountStyle::DecimalComma);
    }
}
