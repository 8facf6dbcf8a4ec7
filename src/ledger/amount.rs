//! Lenient parsing of decimal amounts.
//!
//! Amounts are stored and submitted as base-10 strings. A malformed amount is
//! never an error: the longest numeric prefix is used, and text without one
//! counts as zero.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse `text` as a decimal amount.
///
/// Leading whitespace is skipped, then an optional sign, integer digits and
/// an optional fractional part are read. Anything after the longest valid
/// prefix is ignored, so `"12.5abc"` parses as `12.5`. Returns zero when
/// there is no numeric prefix (e.g. `"abc"`, `""`, `"-"`), or when the
/// number does not fit in a [Decimal].
pub fn parse_amount(text: &str) -> Decimal {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut cursor = 0;

    let is_negative = match bytes.first() {
        Some(b'-') => {
            cursor += 1;
            true
        }
        Some(b'+') => {
            cursor += 1;
            false
        }
        _ => false,
    };

    let integer_start = cursor;
    cursor += count_digits(&bytes[cursor..]);
    let integer_digits = &text[integer_start..cursor];

    let fraction_digits = match bytes.get(cursor) {
        Some(b'.') => {
            let fraction_start = cursor + 1;
            let fraction_end = fraction_start + count_digits(&bytes[fraction_start..]);
            &text[fraction_start..fraction_end]
        }
        _ => "",
    };

    if integer_digits.is_empty() && fraction_digits.is_empty() {
        return Decimal::ZERO;
    }

    let mut normalized = String::with_capacity(integer_digits.len() + fraction_digits.len() + 3);

    if is_negative {
        normalized.push('-');
    }

    if integer_digits.is_empty() {
        normalized.push('0');
    } else {
        normalized.push_str(integer_digits);
    }

    if !fraction_digits.is_empty() {
        normalized.push('.');
        normalized.push_str(fraction_digits);
    }

    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::parse_amount;

    #[test]
    fn parses_plain_decimal_strings() {
        assert_eq!(parse_amount("120.50"), dec!(120.50));
        assert_eq!(parse_amount("2500"), dec!(2500));
        assert_eq!(parse_amount("0.00"), Decimal::ZERO);
    }

    #[test]
    fn non_numeric_text_is_zero() {
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("-"), Decimal::ZERO);
        assert_eq!(parse_amount("."), Decimal::ZERO);
    }

    #[test]
    fn uses_longest_numeric_prefix() {
        assert_eq!(parse_amount("12.5abc"), dec!(12.5));
        assert_eq!(parse_amount("  42 euros"), dec!(42));
        assert_eq!(parse_amount("7.25.3"), dec!(7.25));
        assert_eq!(parse_amount("3."), dec!(3));
    }

    #[test]
    fn accepts_sign_and_missing_integer_part() {
        assert_eq!(parse_amount("-19.99"), dec!(-19.99));
        assert_eq!(parse_amount("+5"), dec!(5));
        assert_eq!(parse_amount(".5"), dec!(0.5));
    }

    #[test]
    fn does_not_lose_precision() {
        assert_eq!(parse_amount("0.1") + parse_amount("0.2"), dec!(0.3));
    }

    #[test]
    fn overflowing_number_is_zero() {
        assert_eq!(
            parse_amount("123456789012345678901234567890123"),
            Decimal::ZERO
        );
    }
}
