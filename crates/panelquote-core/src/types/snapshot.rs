//! Resolved configuration snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default lower calibration length, millimeters.
pub const DEFAULT_MIN_LENGTH: i64 = 500;
/// Default upper calibration length, millimeters.
pub const DEFAULT_MAX_LENGTH: i64 = 1000;
/// Default width surcharge threshold, millimeters.
pub const DEFAULT_MIN_WIDTH: i64 = 500;
/// Default height surcharge threshold, millimeters.
pub const DEFAULT_MIN_HEIGHT: i64 = 150;
/// Default surcharge rate, currency per mm of overage per meter of length.
pub const DEFAULT_EXTRA_PRICE: f64 = 22.0;
/// Default rounding policy label.
pub const DEFAULT_ROUNDING: &str = "ceil10";
/// Default price-per-meter at or below the lower calibration length.
pub const DEFAULT_PRICE_HIGH: f64 = 21101.0;
/// Default price-per-meter at or above the upper calibration length.
pub const DEFAULT_PRICE_LOW: f64 = 18257.0;

/// A fully-resolved, immutable pricing configuration.
///
/// A snapshot is re-derived from the persisted store on every resolution
/// call; it has no persistent identity and is safe to share across threads
/// by value. The two `price_per_meter` fields are the calibration points of
/// the linear rate interpolation: `high` applies at or below `min_length`,
/// `low` at or above `max_length`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Lower calibration length, millimeters.
    pub min_length: i64,
    /// Upper calibration length, millimeters.
    pub max_length: i64,
    /// Width surcharge threshold, millimeters.
    pub min_width: i64,
    /// Height surcharge threshold, millimeters.
    pub min_height: i64,
    /// Surcharge rate per mm of overage per meter of length.
    pub extra_price: f64,
    /// Rounding policy label, stored as-is.
    ///
    /// The resolver passes unknown labels through; the engine treats
    /// anything other than `nearest10` as `ceil10`.
    pub rounding: String,
    /// Price-per-meter at or below `min_length`.
    pub price_per_meter_high: f64,
    /// Price-per-meter at or above `max_length`.
    pub price_per_meter_low: f64,
    /// Named percentage adjustments, option name to percent.
    ///
    /// Percent values may be negative.
    pub positions: BTreeMap<String, f64>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            extra_price: DEFAULT_EXTRA_PRICE,
            rounding: DEFAULT_ROUNDING.to_string(),
            price_per_meter_high: DEFAULT_PRICE_HIGH,
            price_per_meter_low: DEFAULT_PRICE_LOW,
            positions: BTreeMap::new(),
        }
    }
}

impl Snapshot {
    /// Looks up the percentage adjustment for an option name.
    ///
    /// The name is trimmed before lookup; an unmatched or empty selection
    /// contributes 0%.
    #[must_use]
    pub fn position_percent(&self, name: &str) -> f64 {
        self.positions.get(name.trim()).copied().unwrap_or(0.0)
    }
}
