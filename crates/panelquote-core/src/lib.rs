//! # Panelquote Core
//!
//! Core types and abstractions for the Panelquote quoting service.
//!
//! This crate provides the foundational building blocks used throughout
//! Panelquote:
//!
//! - **Types**: the resolved configuration [`Snapshot`], quote request and
//!   result records, adjustment categories and rounding policies
//! - **Parsing**: the parse-or-default combinators applied to every stored
//!   or wire-level numeric value
//! - **Errors**: structured error handling with context
//!
//! ## Design Philosophy
//!
//! - **Permissive inputs**: stored and wire numerics degrade to defaults
//!   instead of failing; strict validation lives at the admin boundary
//! - **Immutable snapshots**: a `Snapshot` is re-derived on every
//!   resolution and never mutated in place
//! - **Explicit over implicit**: rounding and coercion policies are named
//!   functions, not scattered conversions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod parse;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::parse::{fmt_number, normalize_decorated, parse_or};
    pub use crate::types::{
        AdjustOp, AdjustmentItem, Category, QuoteRequest, QuoteResult, RoundingMode,
        SelectionMode, Snapshot,
    };
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{
    AdjustOp, AdjustmentItem, Category, QuoteRequest, QuoteResult, RoundingMode, SelectionMode,
    Snapshot,
};
