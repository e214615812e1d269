//! Property tests for the quote computation.

use proptest::prelude::*;

use panelquote_core::{QuoteRequest, Snapshot};
use panelquote_engine::{compute, price_per_meter};

fn request(length: i64, width: i64, height: i64) -> QuoteRequest {
    QuoteRequest {
        length,
        width,
        height,
        position: String::new(),
    }
}

proptest! {
    /// The rate is non-increasing in length whenever high >= low.
    #[test]
    fn rate_monotone_non_increasing(l1 in 0i64..5000, l2 in 0i64..5000) {
        let s = Snapshot::default();
        let (lo, hi) = if l1 <= l2 { (l1, l2) } else { (l2, l1) };
        prop_assert!(price_per_meter(&s, lo) >= price_per_meter(&s, hi));
    }

    /// The rate stays within the calibration band.
    #[test]
    fn rate_bounded_by_calibration_points(length in 0i64..10_000) {
        let s = Snapshot::default();
        let rate = price_per_meter(&s, length);
        prop_assert!(rate <= s.price_per_meter_high);
        prop_assert!(rate >= s.price_per_meter_low);
    }

    /// ceil10 totals are multiples of 10 and never below the raw subtotal.
    #[test]
    fn ceil10_total_is_a_ceiling(
        length in 0i64..3000,
        width in 0i64..1500,
        height in 0i64..600,
    ) {
        let s = Snapshot::default();
        let quote = compute(&s, &request(length, width, height));
        prop_assert_eq!(quote.price_total % 10, 0);
        let subtotal =
            quote.price_base as f64 + quote.surcharge_width + quote.surcharge_height;
        prop_assert!(quote.price_total as f64 >= subtotal - 1e-6);
    }

    /// Dimensions at or below their thresholds never produce surcharges.
    #[test]
    fn no_surcharge_at_or_below_threshold(
        length in 1i64..3000,
        width in 0i64..=500,
        height in 0i64..=150,
    ) {
        let s = Snapshot::default();
        let quote = compute(&s, &request(length, width, height));
        prop_assert_eq!(quote.surcharge_width, 0.0);
        prop_assert_eq!(quote.surcharge_height, 0.0);
    }

    /// Same snapshot, same request: identical result.
    #[test]
    fn compute_is_deterministic(
        length in 0i64..3000,
        width in 0i64..1500,
        height in 0i64..600,
    ) {
        let mut s = Snapshot::default();
        s.positions.insert("black".to_string(), 20.0);
        let r = QuoteRequest { length, width, height, position: "black".to_string() };
        prop_assert_eq!(compute(&s, &r), compute(&s, &r));
    }
}
