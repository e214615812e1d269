//! Core domain types.

mod adjustment;
mod request;
mod rounding;
mod snapshot;

pub use adjustment::{AdjustOp, AdjustmentItem, Category, SelectionMode, ITEM_DELIMITER};
pub use request::{QuoteRequest, QuoteResult};
pub use rounding::{round_ceil_10, round_nearest_10, RoundingMode};
pub use snapshot::{
    Snapshot, DEFAULT_EXTRA_PRICE, DEFAULT_MAX_LENGTH, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_LENGTH,
    DEFAULT_MIN_WIDTH, DEFAULT_PRICE_HIGH, DEFAULT_PRICE_LOW, DEFAULT_ROUNDING,
};
