//! Parse-or-default combinators.
//!
//! Every stored or wire-level numeric in Panelquote goes through these
//! helpers: a value that fails to parse falls back to a caller-supplied
//! default instead of raising. Strict validation happens only on the
//! administrative write path.

use std::str::FromStr;

/// Parses `raw` as `T`, falling back to `default` on failure.
///
/// Leading/trailing whitespace is ignored.
pub fn parse_or<T: FromStr>(raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or(default)
}

/// Strips decorative characters from a stored numeric string.
///
/// Removes `%` and `+`, replaces the decimal comma with a dot. The result
/// still goes through [`parse_or`]; an unparseable remainder degrades to
/// the caller's default.
pub fn normalize_decorated(raw: &str) -> String {
    raw.replace('%', "")
        .replace('+', "")
        .replace(',', ".")
        .trim()
        .to_string()
}

/// Formats a numeric value for storage.
///
/// Whole numbers are written without a fractional part so that files stay
/// readable (`5`, not `5.0`). The parser accepts both forms.
pub fn fmt_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
