//! Exact conversion between decimal amount strings and integer cents.
//!
//! Amounts are stored as `i64` euro cents. External APIs (Qonto) and the CLI
//! speak decimal strings such as `"1250.5"`; these helpers never go through
//! floating point.

use crate::errors::CoreError;

/// Parse a decimal amount (`"12"`, `"12.5"`, `"-3.07"`, `"1 250,50"`) into cents.
///
/// Accepts `.` or `,` as decimal separator and ignores spaces and `_`.
/// At most two fractional digits are allowed.
///
/// # Errors
///
/// Returns `CoreError::InvalidAmount` on empty input, more than two decimals,
/// non-digit characters, or overflow.
pub fn parse_cents(raw: &str) -> Result<i64, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidAmount {
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    if digits.is_empty() {
        return Err(invalid("empty amount"));
    }

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("empty amount"));
    }
    if fraction.len() > 2 {
        return Err(invalid("more than two decimal places"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid("not a number"));
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("amount too large"))?
    };
    let fraction_value: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid("not a number"))? * 10,
        _ => fraction.parse().map_err(|_| invalid("not a number"))?,
    };

    let cents = whole_value
        .checked_mul(100)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| invalid("amount too large"))?;
    Ok(if negative { -cents } else { cents })
}

/// Format cents as a plain decimal string with two fractional digits (`"1250.50"`).
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12", 1200)]
    #[case("12.5", 1250)]
    #[case("12.05", 1205)]
    #[case("0.99", 99)]
    #[case(".5", 50)]
    #[case("1 250,50", 125_050)]
    #[case("-3.07", -307)]
    #[case("+4", 400)]
    fn parses_amounts(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(parse_cents(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("-")]
    #[case("1.234")]
    #[case("12a")]
    #[case("1.2.3")]
    #[case("99999999999999999999")]
    fn rejects_invalid_amounts(#[case] raw: &str) {
        assert!(parse_cents(raw).is_err(), "{raw} should be rejected");
    }

    #[test]
    fn formats_cents() {
        assert_eq!(format_cents(125_050), "1250.50");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-307), "-3.07");
        assert_eq!(format_cents(0), "0.00");
    }

    #[test]
    fn format_then_parse_is_identity() {
        for cents in [0, 1, 99, 100, 123_456, -42] {
            assert_eq!(parse_cents(&format_cents(cents)).unwrap(), cents);
        }
    }
}
