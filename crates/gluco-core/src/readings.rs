//! Parsing of string-encoded glucose readings.
//!
//! The extraction service formats readings with their unit attached, e.g.
//! `"95 mg/dl"` or `"95 (mg/dl)"`. A reading parses by taking the leading
//! numeric prefix of the trimmed string; anything without a finite leading
//! number is dropped by the caller, never treated as fatal.

/// Parse a reading string into a finite `f64`.
///
/// Accepts an optional sign, a decimal number (`"95"`, `"95.5"`, `".5"`) and
/// an optional exponent, ignoring any trailing unit text. Returns `None` for
/// strings with no leading number and for non-finite results (overflowing
/// exponents).
pub fn parse_reading(raw: &str) -> Option<f64> {
    let prefix = numeric_prefix(raw.trim());
    if prefix.is_empty() {
        return None;
    }
    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Length-scan for the leading `[+-]? digits [. digits] [eE [+-]? digits]`
/// prefix of `s`. Returns the matching slice (possibly empty).
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(&b'+') | Some(&b'-')) {
        end += 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    // No mantissa digits at all: not a number.
    if int_digits + frac_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(&b'e') | Some(&b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(&b'+') | Some(&b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        // Only consume the exponent when it actually has digits.
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    &s[..end]
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── plain numbers ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_reading("95"), Some(95.0));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_reading("102.5"), Some(102.5));
    }

    #[test]
    fn test_parse_leading_dot() {
        assert_eq!(parse_reading(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(parse_reading("-12"), Some(-12.0));
    }

    // ── unit suffixes from the extraction service ─────────────────────────

    #[test]
    fn test_parse_with_unit() {
        assert_eq!(parse_reading("95 mg/dl"), Some(95.0));
    }

    #[test]
    fn test_parse_with_parenthesised_unit() {
        assert_eq!(parse_reading("140 (mg/dl)"), Some(140.0));
    }

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        assert_eq!(parse_reading("  110 mg/dl "), Some(110.0));
    }

    // ── rejections ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_rejects_text() {
        assert_eq!(parse_reading("abc"), None);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(parse_reading(""), None);
        assert_eq!(parse_reading("   "), None);
    }

    #[test]
    fn test_parse_rejects_unit_only() {
        assert_eq!(parse_reading("mg/dl"), None);
    }

    #[test]
    fn test_parse_rejects_lone_sign_or_dot() {
        assert_eq!(parse_reading("-"), None);
        assert_eq!(parse_reading("."), None);
        assert_eq!(parse_reading("-."), None);
    }

    #[test]
    fn test_parse_rejects_inf_spelling() {
        // `f64::from_str` would accept "inf"; the numeric-prefix scan does not.
        assert_eq!(parse_reading("inf"), None);
        assert_eq!(parse_reading("NaN"), None);
    }

    #[test]
    fn test_parse_rejects_overflowing_exponent() {
        assert_eq!(parse_reading("1e999"), None);
    }

    // ── edge cases ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_exponent() {
        assert_eq!(parse_reading("1.2e2 mg/dl"), Some(120.0));
    }

    #[test]
    fn test_parse_dangling_exponent_marker() {
        // "95e" has no exponent digits; the prefix stops at "95".
        assert_eq!(parse_reading("95e mg/dl"), Some(95.0));
    }

    #[test]
    fn test_parse_number_glued_to_unit() {
        assert_eq!(parse_reading("95mg/dl"), Some(95.0));
    }
}
