//! Adjustment categories and their stored item encoding.
//!
//! Each adjustment item persists as a single delimited string
//! `"<name>|<op>|<value>"`. Parsing never raises: a malformed encoding
//! degrades to a default record, and decorated values (`+5%`, `12,5`) are
//! normalized to plain numerics.

use serde::{Deserialize, Serialize};

use crate::parse::{fmt_number, normalize_decorated, parse_or};

/// Delimiter between the stored item fields.
pub const ITEM_DELIMITER: char = '|';

/// Arithmetic operation tag carried by a stored adjustment item.
///
/// The tag is parsed, persisted and served to administrative clients, but
/// the pricing engine does not apply it: the item `value` is always used as
/// a percentage of the subtotal regardless of the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustOp {
    /// Multiplicative percentage (the only semantics the engine has).
    Mul,
    /// Reserved.
    Add,
    /// Reserved.
    Sub,
    /// Reserved.
    Div,
}

impl AdjustOp {
    /// Resolves a stored tag, defaulting to `mul` for unknown tokens.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "add" => Self::Add,
            "sub" => Self::Sub,
            "div" => Self::Div,
            _ => Self::Mul,
        }
    }

    /// Returns the canonical lowercase tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mul => "mul",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Div => "div",
        }
    }
}

/// A named percentage adjustment inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentItem {
    /// Display name, unique within its category.
    pub name: String,
    /// Operation tag (inert, see [`AdjustOp`]).
    pub op: AdjustOp,
    /// Percentage value; may be negative.
    pub value: f64,
}

impl AdjustmentItem {
    /// Creates an item with the default `mul` tag.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            op: AdjustOp::Mul,
            value,
        }
    }

    /// Parses the stored `"<name>|<op>|<value>"` encoding.
    ///
    /// Fewer than three parts yields a degenerate item carrying the
    /// original string (or `"item"` when empty) with `mul|0`. The value
    /// part is stripped of `%`/`+` decorations and decimal commas before
    /// numeric parsing; an unparseable remainder defaults to `0.0`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let parts: Vec<&str> = raw.split(ITEM_DELIMITER).map(str::trim).collect();
        if parts.len() < 3 {
            let name = if raw.is_empty() { "item" } else { raw };
            return Self::new(name, 0.0);
        }

        Self {
            name: parts[0].to_string(),
            op: AdjustOp::from_label(parts[1]),
            value: parse_or(&normalize_decorated(parts[2]), 0.0),
        }
    }

    /// Formats the item in normalized storage form.
    #[must_use]
    pub fn format(&self) -> String {
        format!(
            "{}{d}{}{d}{}",
            self.name,
            self.op.as_str(),
            fmt_number(self.value),
            d = ITEM_DELIMITER
        )
    }
}

/// Selection cardinality of a category.
///
/// Administrative metadata only; the engine always treats the selection as
/// single.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// One item may be selected.
    Single,
    /// Several items may be selected.
    Multi,
}

impl SelectionMode {
    /// Resolves a stored mode, defaulting to `single`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.trim().to_lowercase() == "multi" {
            Self::Multi
        } else {
            Self::Single
        }
    }

    /// Returns the canonical lowercase label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }
}

/// An administrative category of adjustment items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique category key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Selection cardinality.
    pub mode: SelectionMode,
    /// Ordered adjustment items.
    pub items: Vec<AdjustmentItem>,
}

impl Category {
    /// Builds the option-name to percent mapping the engine consumes.
    #[must_use]
    pub fn position_map(&self) -> std::collections::BTreeMap<String, f64> {
        self.items
            .iter()
            .map(|item| (item.name.clone(), item.value))
            .collect()
    }
}
