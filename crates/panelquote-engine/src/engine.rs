//! Quote computation.

use panelquote_core::{QuoteRequest, QuoteResult, RoundingMode, Snapshot};

/// Interpolates the price-per-meter for a requested length.
///
/// Flat at `price_per_meter_high` below `min_length`, flat at
/// `price_per_meter_low` above `max_length`, linear in between:
///
/// ```text
/// high - (L - min_length) * (high - low) / (max_length - min_length)
/// ```
///
/// A non-positive calibration span (`max_length <= min_length`) would
/// divide by zero inside the linear branch; it is treated as the
/// `L <= min_length` case and returns the high rate.
#[must_use]
pub fn price_per_meter(snapshot: &Snapshot, length: i64) -> f64 {
    if length < snapshot.min_length {
        return snapshot.price_per_meter_high;
    }
    if length <= snapshot.max_length {
        let span = snapshot.max_length - snapshot.min_length;
        if span <= 0 {
            return snapshot.price_per_meter_high;
        }
        let delta =
            (snapshot.price_per_meter_high - snapshot.price_per_meter_low) / span as f64;
        return snapshot.price_per_meter_high - (length - snapshot.min_length) as f64 * delta;
    }
    snapshot.price_per_meter_low
}

/// Rounds a display amount to 2 decimal places.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Computes a quote.
///
/// Total function: never blocks, never fails. Zero or negative dimensions
/// flow through the arithmetic (a zero length drives the base price to 0
/// and skips both surcharges, since 0 does not exceed a positive
/// threshold); an unmatched or empty `position` contributes 0%.
///
/// `price_base` is rounded half away from zero; the final total follows the
/// snapshot's rounding policy, with any label other than `nearest10`
/// behaving as `ceil10`.
#[must_use]
pub fn compute(snapshot: &Snapshot, request: &QuoteRequest) -> QuoteResult {
    let ppm = price_per_meter(snapshot, request.length);
    let price_base = (ppm * request.length as f64 / 1000.0).round() as i64;

    // Surcharges trigger on strictly exceeding the threshold, not on
    // reaching it. They are independent and may both apply.
    let mut surcharge_width = 0.0;
    let mut surcharge_height = 0.0;
    if request.width > snapshot.min_width {
        surcharge_width = snapshot.extra_price
            * (request.width - snapshot.min_width) as f64
            * request.length as f64
            / 1000.0;
    }
    if request.height > snapshot.min_height {
        surcharge_height = snapshot.extra_price
            * (request.height - snapshot.min_height) as f64
            * request.length as f64
            / 1000.0;
    }

    let subtotal = price_base as f64 + surcharge_width + surcharge_height;

    let percent = snapshot.position_percent(&request.position);
    let surcharge_color_amount = subtotal * percent / 100.0;

    let raw_total = subtotal + surcharge_color_amount;
    let price_total = RoundingMode::from_label(&snapshot.rounding).apply(raw_total);

    QuoteResult {
        price_per_meter: ppm,
        price_base,
        surcharge_width: round2(surcharge_width),
        surcharge_height: round2(surcharge_height),
        surcharge_color_percent: percent,
        surcharge_color_amount: round2(surcharge_color_amount),
        price_total,
    }
}
