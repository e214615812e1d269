//! # Panelquote Ext File
//!
//! File-backed configuration store for the Panelquote quoting service.
//!
//! The persisted format is a flat sectioned key-value text file:
//! `[variables]` holds dimensional thresholds and the surcharge rate,
//! `[base]` the rounding policy and calibration rates, and one
//! `[group:<id>]` section per adjustment category, each item encoded as a
//! single `name|op|value` line. A legacy flat `[positions]` section is
//! still read when the designated category is absent.
//!
//! [`FileConfigStore`] re-reads the file on every resolution, substitutes
//! defaults field-by-field for anything missing or malformed, and performs
//! the idempotent cleanup migration of decorated item values.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod document;
mod error;
mod positions;
mod store;

pub use document::ConfigDocument;
pub use error::StoreError;
pub use positions::InMemoryPositionStore;
pub use store::{FileConfigStore, VariablesUpdate, DESIGNATED_CATEGORY_ID};
