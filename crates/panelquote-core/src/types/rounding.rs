//! Final-total rounding policies.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Final-total rounding policy.
///
/// The persisted store keeps the policy as a free-form label; the engine
/// dispatches on exactly two branches, so any label other than `nearest10`
/// behaves as `ceil10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Round `total / 10` to the nearest integer, ties away from zero,
    /// then multiply back by 10.
    Nearest10,
    /// Ceiling of `total / 10`, times 10.
    Ceil10,
}

impl RoundingMode {
    /// Label for `nearest10`.
    pub const NEAREST10: &'static str = "nearest10";
    /// Label for `ceil10`.
    pub const CEIL10: &'static str = "ceil10";

    /// Resolves a stored label into a policy. Total: anything other than
    /// `nearest10` is `ceil10`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.trim() == Self::NEAREST10 {
            Self::Nearest10
        } else {
            Self::Ceil10
        }
    }

    /// Strict parse for the administrative write path.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` for anything outside
    /// `{nearest10, ceil10}`.
    pub fn parse_strict(label: &str) -> CoreResult<Self> {
        match label.trim().to_lowercase().as_str() {
            Self::NEAREST10 => Ok(Self::Nearest10),
            Self::CEIL10 => Ok(Self::Ceil10),
            _ => Err(CoreError::invalid_input(
                "rounding must be nearest10|ceil10",
            )),
        }
    }

    /// Returns the canonical label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest10 => Self::NEAREST10,
            Self::Ceil10 => Self::CEIL10,
        }
    }

    /// Applies the policy to a raw total.
    #[must_use]
    pub fn apply(&self, raw_total: f64) -> i64 {
        match self {
            Self::Nearest10 => round_nearest_10(raw_total),
            Self::Ceil10 => round_ceil_10(raw_total),
        }
    }
}

/// Rounds to the nearest multiple of 10, ties away from zero.
///
/// The value is taken through its shortest decimal representation before
/// halving so that binary float noise cannot push an exact `X5` tie off the
/// midpoint (12.5 must round to 13, never 12).
pub fn round_nearest_10(x: f64) -> i64 {
    let d: Decimal = x.to_string().parse().unwrap_or_default();
    let halved =
        (d / Decimal::TEN).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    (halved * Decimal::TEN).to_i64().unwrap_or(0)
}

/// Rounds up to the next multiple of 10; exact multiples are unchanged.
pub fn round_ceil_10(x: f64) -> i64 {
    (x / 10.0).ceil() as i64 * 10
}
