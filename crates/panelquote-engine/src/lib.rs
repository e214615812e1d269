//! # Panelquote Engine
//!
//! Pure pricing computation: a total function of (snapshot, request) with
//! no I/O and no mutable state. Safe to invoke concurrently from any number
//! of tasks.
//!
//! ## Example
//!
//! ```rust
//! use panelquote_core::{QuoteRequest, Snapshot};
//! use panelquote_engine::compute;
//!
//! let snapshot = Snapshot::default();
//! let request = QuoteRequest {
//!     length: 750,
//!     width: 500,
//!     height: 150,
//!     position: String::new(),
//! };
//! let quote = compute(&snapshot, &request);
//! assert_eq!(quote.price_per_meter, 19679.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

mod engine;

pub use engine::{compute, price_per_meter};
