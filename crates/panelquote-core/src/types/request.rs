//! Quote request and result records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parse::parse_or;

/// Dimension key aliases, checked in precedence order.
const LENGTH_KEYS: [&str; 3] = ["L", "l", "length"];
const WIDTH_KEYS: [&str; 3] = ["W", "w", "width"];
const HEIGHT_KEYS: [&str; 3] = ["H", "h", "height"];
/// Option key aliases, checked in precedence order.
const POSITION_KEYS: [&str; 3] = ["position", "color", "colors"];

/// A single quote request.
///
/// Dimensions are integer millimeters. Absent or unparseable inputs coerce
/// to 0 rather than erroring; callers wanting stricter bounds validate
/// before invoking the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Requested length, millimeters.
    pub length: i64,
    /// Requested width, millimeters.
    pub width: i64,
    /// Requested height, millimeters.
    pub height: i64,
    /// Selected option name; empty selects nothing.
    pub position: String,
}

impl QuoteRequest {
    /// Decodes a request from an arbitrary JSON object.
    ///
    /// Dimension keys are accepted as `L`/`W`/`H` (either case) or
    /// `length`/`width`/`height`, the option key as `position`, `color` or
    /// `colors` - first non-empty alias wins, in that order. Values may be
    /// JSON numbers or numeric strings; anything else coerces to 0 or the
    /// empty selection.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            length: dimension(value, &LENGTH_KEYS),
            width: dimension(value, &WIDTH_KEYS),
            height: dimension(value, &HEIGHT_KEYS),
            position: option_name(value, &POSITION_KEYS),
        }
    }
}

fn dimension(value: &Value, keys: &[&str]) -> i64 {
    for key in keys {
        match value.get(key) {
            Some(Value::Number(n)) => {
                return n.as_f64().map_or(0, |f| f as i64);
            }
            Some(Value::String(s)) if !s.trim().is_empty() => {
                return parse_or::<f64>(s, 0.0) as i64;
            }
            _ => {}
        }
    }
    0
}

fn option_name(value: &Value, keys: &[&str]) -> String {
    for key in keys {
        match value.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    String::new()
}

/// The computed quote for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Interpolated price-per-meter actually used, unrounded.
    pub price_per_meter: f64,
    /// Base price, integer.
    pub price_base: i64,
    /// Width surcharge, rounded to 2 decimals for display.
    pub surcharge_width: f64,
    /// Height surcharge, rounded to 2 decimals for display.
    pub surcharge_height: f64,
    /// Matched option percentage, raw (0 when unmatched).
    pub surcharge_color_percent: f64,
    /// Option adjustment amount, rounded to 2 decimals for display.
    pub surcharge_color_amount: f64,
    /// Final rounded total.
    pub price_total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_keys() {
        let req = QuoteRequest::from_value(&json!({"L": 750, "W": 500, "H": 150}));
        assert_eq!(req.length, 750);
        assert_eq!(req.width, 500);
        assert_eq!(req.height, 150);
        assert_eq!(req.position, "");
    }

    #[test]
    fn test_long_keys_and_position() {
        let req = QuoteRequest::from_value(&json!({
            "length": 1000, "width": 600, "height": 200, "position": "black"
        }));
        assert_eq!(req.length, 1000);
        assert_eq!(req.width, 600);
        assert_eq!(req.height, 200);
        assert_eq!(req.position, "black");
    }

    #[test]
    fn test_alias_precedence() {
        // Short key wins over long key; position wins over color.
        let req = QuoteRequest::from_value(&json!({
            "L": 500, "length": 900, "position": "a", "color": "b"
        }));
        assert_eq!(req.length, 500);
        assert_eq!(req.position, "a");
    }

    #[test]
    fn test_empty_alias_falls_through() {
        let req = QuoteRequest::from_value(&json!({"position": " ", "color": "black"}));
        assert_eq!(req.position, "black");
    }

    #[test]
    fn test_numeric_strings_coerce() {
        let req = QuoteRequest::from_value(&json!({"L": "750", "W": "600.5"}));
        assert_eq!(req.length, 750);
        assert_eq!(req.width, 600);
    }

    #[test]
    fn test_garbage_coerces_to_zero() {
        let req = QuoteRequest::from_value(&json!({"L": "abc", "W": null, "H": [1, 2]}));
        assert_eq!(req.length, 0);
        assert_eq!(req.width, 0);
        assert_eq!(req.height, 0);
    }

    #[test]
    fn test_missing_everything() {
        let req = QuoteRequest::from_value(&json!({}));
        assert_eq!(req, QuoteRequest::default());
    }

    #[test]
    fn test_position_trimmed() {
        let req = QuoteRequest::from_value(&json!({"color": "  black  "}));
        assert_eq!(req.position, "black");
    }
}
