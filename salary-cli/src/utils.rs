use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use salary_core::calculations::common::round_to_unit;
use thiserror::Error;

/// Currency symbol appended by [`format_currency`].
pub const CURRENCY_SYMBOL: &str = "₫";

/// Error returned when typed text cannot be turned into an amount or count.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("value '{input}' is too large")]
pub struct ParseAmountError {
    input: String,
}

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("static pattern is valid"));

/// Keeps only ASCII digits, so both `1,234,567` and `1.234.567` read as
/// `1234567`.
fn digits_only(s: &str) -> String {
    NON_DIGITS.replace_all(s, "").into_owned()
}

/// Parses typed text into a whole-unit amount.
///
/// Every character that is not a digit is discarded (thousands separators,
/// spaces, currency symbols, signs). Input with no digits is treated as 0.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let digits = digits_only(s);
    if digits.is_empty() {
        return Ok(Decimal::ZERO);
    }
    digits.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
        }
    })
}

/// Parses typed text into a count (e.g. dependents) with the same rules as
/// [`parse_amount`].
pub fn parse_count(s: &str) -> Result<u32, ParseAmountError> {
    let digits = digits_only(s);
    if digits.is_empty() {
        return Ok(0);
    }
    digits.parse().map_err(|_| ParseAmountError {
        input: s.to_string(),
    })
}

/// Rounds to whole units and groups thousands with `.`, e.g. `17.460.000`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_to_unit(amount);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < Decimal::ZERO {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Vietnamese display form: `17.460.000 ₫` (no-break space before the symbol).
pub fn format_currency(amount: Decimal) -> String {
    format!("{}\u{a0}{CURRENCY_SYMBOL}", format_amount(amount))
}

/// Like [`format_currency`] but always shows the sign, for differences.
pub fn format_signed_currency(amount: Decimal) -> String {
    if round_to_unit(amount) > Decimal::ZERO {
        format!("+{}", format_currency(amount))
    } else {
        format_currency(amount)
    }
}

/// Formats a fractional rate as a percentage with at most two decimals,
/// e.g. `0.015` → `1.5%`.
pub fn format_rate(rate: Decimal) -> String {
    let percent = rate.saturating_mul(Decimal::ONE_HUNDRED).round_dp(2);
    format!("{}%", percent.normalize())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_amount_strips_thousands_separators() {
        assert_eq!(parse_amount("20,000,000").unwrap(), dec!(20000000));
        assert_eq!(parse_amount("20.000.000").unwrap(), dec!(20000000));
        assert_eq!(parse_amount("20 000 000 ₫").unwrap(), dec!(20000000));
    }

    #[test]
    fn parse_amount_empty_treated_as_zero() {
        assert_eq!(parse_amount("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("   ").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("VND").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_drops_sign() {
        assert_eq!(parse_amount("-5000").unwrap(), dec!(5000));
    }

    #[test]
    fn parse_amount_rejects_overflow() {
        let huge = "9".repeat(40);

        assert!(parse_amount(&huge).is_err());
    }

    #[test]
    fn parse_count_reads_digits() {
        assert_eq!(parse_count("2").unwrap(), 2);
        assert_eq!(parse_count("").unwrap(), 0);
        assert!(parse_count("99999999999").is_err());
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(17460000)), "17.460.000");
        assert_eq!(format_amount(dec!(999)), "999");
        assert_eq!(format_amount(dec!(1000)), "1.000");
        assert_eq!(format_amount(dec!(0)), "0");
    }

    #[test]
    fn format_amount_rounds_to_nearest_unit() {
        assert_eq!(format_amount(dec!(250000.1)), "250.000");
        assert_eq!(format_amount(dec!(1600000.00)), "1.600.000");
        assert_eq!(format_amount(dec!(999.5)), "1.000");
    }

    #[test]
    fn format_amount_keeps_sign_for_negatives() {
        assert_eq!(format_amount(dec!(-895000)), "-895.000");
        assert_eq!(format_amount(dec!(-0.4)), "0");
    }

    #[test]
    fn format_currency_appends_symbol_after_no_break_space() {
        assert_eq!(format_currency(dec!(17460000)), "17.460.000\u{a0}₫");
    }

    #[test]
    fn format_signed_currency_marks_gains() {
        assert_eq!(format_signed_currency(dec!(320000)), "+320.000\u{a0}₫");
        assert_eq!(format_signed_currency(dec!(-320000)), "-320.000\u{a0}₫");
        assert_eq!(format_signed_currency(Decimal::ZERO), "0\u{a0}₫");
    }

    #[test]
    fn format_rate_shows_percentage() {
        assert_eq!(format_rate(dec!(0.08)), "8%");
        assert_eq!(format_rate(dec!(0.015)), "1.5%");
        assert_eq!(format_rate(dec!(0.35)), "35%");
        assert_eq!(format_rate(dec!(0.022)), "2.2%");
        assert_eq!(format_rate(dec!(0.123456)), "12.35%");
        assert_eq!(format_rate(Decimal::ZERO), "0%");
    }
}
