//! String shaping helpers that turn raw DOM text into record values.
//!
//! Prices follow the storefront convention of "strip everything but digits
//! and dots, then read the leading number", so `"AED 1,234.50"` becomes
//! `1234.5` and `"Free"` yields nothing. Zero and "no number" stay distinct.

use std::sync::LazyLock;

use regex::Regex;

/// A bare decimal such as `"49"`, `"49.95"` or `".5"`, with no currency or
/// grouping characters. ASCII digits only.
static BARE_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*\.?[0-9]+$").expect("valid regex"));

/// Parses a price from display text.
///
/// Every character that is not an ASCII digit or `.` is removed, then the
/// longest leading `digits[.digits]` run is read as a float. Returns `None`
/// when that run contains no digit or overflows `f64`.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    leading_decimal(&stripped)
}

/// Parses a price only when the text is already a bare decimal number.
///
/// Text carrying a currency code or thousands separator is rejected outright
/// rather than stripped.
#[must_use]
pub fn parse_bare_price(raw: &str) -> Option<f64> {
    if BARE_DECIMAL.is_match(raw) {
        parse_price(raw)
    } else {
        None
    }
}

/// Returns the first currency symbol from `symbols` found in `raw`.
///
/// With `run` set, consecutive allow-listed symbols following the first match
/// are returned together (e.g. `"$$"`).
#[must_use]
pub fn match_currency(raw: &str, symbols: &[char], run: bool) -> Option<String> {
    let start = raw.find(|c: char| symbols.contains(&c))?;
    let tail = &raw[start..];
    let matched: String = if run {
        tail.chars().take_while(|c| symbols.contains(c)).collect()
    } else {
        tail.chars().take(1).collect()
    };
    Some(matched)
}

/// Trims `raw` and removes the first occurrence of `prefix`, wherever it sits.
#[must_use]
pub fn strip_first(raw: &str, prefix: &str) -> String {
    raw.trim().replacen(prefix, "", 1)
}

/// Trims each item and joins with newlines, preserving order.
#[must_use]
pub fn join_lines(items: &[String]) -> String {
    items.iter().map(|s| s.trim()).collect::<Vec<_>>().join("\n")
}

/// Reads the longest `digits[.digits]` prefix of an already-stripped string.
fn leading_decimal(stripped: &str) -> Option<f64> {
    let bytes = stripped.as_bytes();
    let int_end = bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len());

    let mut end = int_end;
    let mut frac_digits = 0usize;
    if bytes.get(int_end) == Some(&b'.') {
        frac_digits = bytes[int_end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if frac_digits > 0 {
            end = int_end + 1 + frac_digits;
        }
    }

    if int_end == 0 && frac_digits == 0 {
        return None;
    }

    let number = &stripped[..end];
    let parsed: f64 = if int_end == 0 {
        format!("0{number}").parse().ok()?
    } else {
        number.parse().ok()?
    };
    parsed.is_finite().then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_strips_currency_code_and_grouping() {
        assert_eq!(parse_price("AED 1,234.50"), Some(1234.5));
    }

    #[test]
    fn price_with_symbol() {
        assert_eq!(parse_price("$45.00"), Some(45.0));
    }

    #[test]
    fn price_without_digits_is_absent() {
        assert_eq!(parse_price("Free"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("."), None);
    }

    #[test]
    fn price_zero_is_kept() {
        assert_eq!(parse_price("AED 0.00"), Some(0.0));
    }

    #[test]
    fn price_reads_leading_number_only() {
        // "1.2.3" keeps the first well-formed decimal.
        assert_eq!(parse_price("1.2.3"), Some(1.2));
        // Two prices glued together after stripping.
        assert_eq!(parse_price("Was $10.00 Now $8.00"), Some(10.008));
    }

    #[test]
    fn price_leading_dot() {
        assert_eq!(parse_price("€.99"), Some(0.99));
    }

    #[test]
    fn price_trailing_dot() {
        assert_eq!(parse_price("12."), Some(12.0));
    }

    #[test]
    fn price_sentence_with_leading_dot_noise() {
        // "Ships in 2 days. US $3.10" → "2.3.10"
        assert_eq!(parse_price("Ships in 2 days. US $3.10"), Some(2.3));
    }

    #[test]
    fn bare_price_accepts_plain_decimal() {
        assert_eq!(parse_bare_price("49.95"), Some(49.95));
        assert_eq!(parse_bare_price("120"), Some(120.0));
        assert_eq!(parse_bare_price(".5"), Some(0.5));
    }

    #[test]
    fn bare_price_rejects_decorated_text() {
        assert_eq!(parse_bare_price("AED 49.95"), None);
        assert_eq!(parse_bare_price("1,299"), None);
        assert_eq!(parse_bare_price("12."), None);
        assert_eq!(parse_bare_price(""), None);
    }

    #[test]
    fn bare_price_rejects_non_ascii_digits() {
        assert_eq!(parse_bare_price("٤٥"), None);
    }

    #[test]
    fn currency_single_symbol() {
        assert_eq!(match_currency("$45.00", &['$', '€'], false).as_deref(), Some("$"));
    }

    #[test]
    fn currency_ignores_surrounding_text() {
        let symbols = ['$', '£', '€', '¥'];
        assert_eq!(
            match_currency("Now only 12,00 € incl. VAT", &symbols, false).as_deref(),
            Some("€")
        );
    }

    #[test]
    fn currency_first_match_wins() {
        assert_eq!(match_currency("£5 / $7", &['$', '£'], false).as_deref(), Some("£"));
    }

    #[test]
    fn currency_run_collects_adjacent_symbols() {
        assert_eq!(match_currency("₹₹ 300", &['₹', '$'], true).as_deref(), Some("₹₹"));
        assert_eq!(match_currency("₹₹ 300", &['₹', '$'], false).as_deref(), Some("₹"));
    }

    #[test]
    fn price_overflowing_f64_is_absent() {
        let huge = format!("AED {}", "9".repeat(400));
        assert_eq!(parse_price(&huge), None);
        assert_eq!(parse_bare_price(&"1".repeat(310)), None);
        // Large but representable stays present.
        assert_eq!(parse_price(&"9".repeat(300)).map(f64::is_finite), Some(true));
    }

    #[test]
    fn currency_independent_of_allow_list_order() {
        let forward = ['$', '£', '€', '¥', '₹', '₩'];
        let mut reversed = forward;
        reversed.reverse();
        for raw in ["$45.00", "Now only 12,00 € incl. VAT", "₹₹ 300", "₩1,000", "AED 99"] {
            for run in [false, true] {
                assert_eq!(
                    match_currency(raw, &forward, run),
                    match_currency(raw, &reversed, run),
                    "{raw:?} run={run}"
                );
            }
        }
        assert_eq!(match_currency("$45.00", &reversed, false).as_deref(), Some("$"));
    }

    #[test]
    fn currency_absent_when_no_symbol() {
        assert_eq!(match_currency("AED 99", &['$', '€'], true), None);
    }

    #[test]
    fn currency_respects_allow_list() {
        assert_eq!(match_currency("₩5000", &['$', '€', '£', '¥'], false), None);
        assert_eq!(match_currency("₩5000", &['₩'], false).as_deref(), Some("₩"));
    }

    #[test]
    fn strip_first_removes_one_occurrence() {
        assert_eq!(strip_first("  SKU: sw2209  ", "SKU: "), "sw2209");
        assert_eq!(strip_first("SKU: a SKU: b", "SKU: "), "a SKU: b");
        assert_eq!(strip_first("no prefix", "SKU: "), "no prefix");
    }

    #[test]
    fn join_lines_trims_and_keeps_order() {
        let items = vec!["  b ".to_string(), "a".to_string(), "\nc\n".to_string()];
        assert_eq!(join_lines(&items), "b\na\nc");
        assert_eq!(join_lines(&[]), "");
    }
}
