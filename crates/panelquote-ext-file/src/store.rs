//! File-backed configuration store and snapshot resolver.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use panelquote_core::parse::{fmt_number, parse_or};
use panelquote_core::types::{
    DEFAULT_EXTRA_PRICE, DEFAULT_MAX_LENGTH, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_LENGTH,
    DEFAULT_MIN_WIDTH, DEFAULT_PRICE_HIGH, DEFAULT_PRICE_LOW, DEFAULT_ROUNDING,
};
use panelquote_core::{AdjustmentItem, Category, RoundingMode, SelectionMode, Snapshot};

use crate::document::ConfigDocument;
use crate::error::StoreError;

const SECTION_VARIABLES: &str = "variables";
const SECTION_BASE: &str = "base";
const SECTION_POSITIONS: &str = "positions";
const GROUP_PREFIX: &str = "group:";
const ITEM_KEY_PREFIX: &str = "item.";

/// The category whose items feed the engine's `positions` map.
pub const DESIGNATED_CATEGORY_ID: &str = "colors";

/// Partial update for the `[variables]` block.
#[derive(Debug, Clone, Default)]
pub struct VariablesUpdate {
    /// Lower calibration length, millimeters.
    pub min_length: Option<i64>,
    /// Upper calibration length, millimeters.
    pub max_length: Option<i64>,
    /// Width surcharge threshold, millimeters.
    pub min_width: Option<i64>,
    /// Height surcharge threshold, millimeters.
    pub min_height: Option<i64>,
    /// Surcharge rate.
    pub extra_price: Option<f64>,
    /// Rounding policy label; validated strictly.
    pub rounding: Option<String>,
}

/// File-backed configuration store.
///
/// Every resolution re-reads the file - there is no cache inside the store,
/// so a write committed by one administrative operation is visible to the
/// next resolution with no invalidation signaling. Hosts that layer a cache
/// on top must discard it wholesale and call [`FileConfigStore::reload`]
/// after a write.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Creates a store over the given file path. No I/O happens until the
    /// first resolution.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The underlying file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves the current configuration snapshot.
    ///
    /// Re-reads the store, bootstraps any missing defaults, runs the
    /// idempotent item-value cleanup migration (persisting only when
    /// something changed) and builds the snapshot. Individually missing or
    /// malformed fields fall back to their defaults; only file-level I/O
    /// failures propagate.
    pub fn resolve(&self) -> Result<Snapshot, StoreError> {
        let mut doc = ConfigDocument::load(&self.path)?;

        let mut changed = ensure_defaults(&mut doc);
        changed |= migrate_decorated_items(&mut doc);
        if changed {
            // A failed write-back must not fail the resolution; the
            // normalized document still feeds the snapshot.
            match self.save(&doc) {
                Ok(()) => {
                    debug!(path = %self.path.display(), "configuration normalized and persisted");
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "could not persist normalized configuration");
                }
            }
        }

        Ok(build_snapshot(&doc))
    }

    /// Explicit invalidation hook: forces a full re-resolution.
    ///
    /// Any snapshot a host-side cache may hold must be discarded wholesale
    /// before this call; there is no partial or incremental update.
    pub fn reload(&self) -> Result<Snapshot, StoreError> {
        info!(path = %self.path.display(), "configuration reload requested");
        self.resolve()
    }

    /// Lists all stored categories, ordered by id.
    pub fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let doc = ConfigDocument::load(&self.path)?;
        let mut categories: Vec<Category> = doc
            .section_names()
            .iter()
            .filter_map(|name| name.strip_prefix(GROUP_PREFIX).map(ToString::to_string))
            .map(|id| category_from_doc(&doc, &id))
            .collect();
        categories.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(categories)
    }

    /// Fetches one category by id.
    pub fn get_category(&self, id: &str) -> Result<Option<Category>, StoreError> {
        let doc = ConfigDocument::load(&self.path)?;
        if !doc.has_section(&group_section(id)) {
            return Ok(None);
        }
        Ok(Some(category_from_doc(&doc, id)))
    }

    /// Creates or replaces a category.
    ///
    /// Replaces the full item list; item names default to `item N` when
    /// blank. Returns the category as re-read from the store.
    ///
    /// # Errors
    ///
    /// `StoreError::InvalidInput` when the id is empty.
    pub fn save_category(&self, category: &Category) -> Result<Category, StoreError> {
        let id = category.id.trim();
        if id.is_empty() {
            return Err(StoreError::InvalidInput("category id is required".into()));
        }

        let mut doc = ConfigDocument::load(&self.path)?;
        let section = group_section(id);

        let name = if category.name.trim().is_empty() {
            capitalize(id)
        } else {
            category.name.trim().to_string()
        };
        doc.set(&section, "title", name);
        doc.set(&section, "mode", category.mode.as_str());

        doc.remove_keys_with_prefix(&section, ITEM_KEY_PREFIX);
        for (i, item) in category.items.iter().enumerate() {
            let n = i + 1;
            let stored = AdjustmentItem {
                name: if item.name.trim().is_empty() {
                    format!("item {n}")
                } else {
                    item.name.trim().to_string()
                },
                op: item.op,
                value: item.value,
            };
            doc.set(&section, &format!("{ITEM_KEY_PREFIX}{n}"), stored.format());
        }

        self.save(&doc)?;
        info!(category = id, items = category.items.len(), "category saved");
        Ok(category_from_doc(&doc, id))
    }

    /// Deletes a category. Returns false when it did not exist.
    pub fn delete_category(&self, id: &str) -> Result<bool, StoreError> {
        let mut doc = ConfigDocument::load(&self.path)?;
        if !doc.remove_section(&group_section(id)) {
            return Ok(false);
        }
        self.save(&doc)?;
        info!(category = id, "category deleted");
        Ok(true)
    }

    /// Applies a partial `[variables]` update and returns the fresh
    /// snapshot.
    ///
    /// # Errors
    ///
    /// `StoreError::InvalidInput` when `rounding` is outside
    /// `{nearest10, ceil10}`.
    pub fn save_variables(&self, update: &VariablesUpdate) -> Result<Snapshot, StoreError> {
        let mut doc = ConfigDocument::load(&self.path)?;

        if let Some(v) = update.min_length {
            doc.set(SECTION_VARIABLES, "min_length", v.to_string());
        }
        if let Some(v) = update.max_length {
            doc.set(SECTION_VARIABLES, "max_length", v.to_string());
        }
        if let Some(v) = update.min_width {
            doc.set(SECTION_VARIABLES, "min_width", v.to_string());
        }
        if let Some(v) = update.min_height {
            doc.set(SECTION_VARIABLES, "min_height", v.to_string());
        }
        if let Some(v) = update.extra_price {
            doc.set(SECTION_VARIABLES, "extra_price", fmt_number(v));
        }
        if let Some(ref label) = update.rounding {
            let mode = RoundingMode::parse_strict(label)
                .map_err(|e| StoreError::InvalidInput(e.to_string()))?;
            set_rounding(&mut doc, mode);
        }

        self.save(&doc)?;
        info!("variables updated");
        self.resolve()
    }

    /// Updates the calibration rates and returns the fresh snapshot.
    pub fn save_prices(&self, high: f64, low: f64) -> Result<Snapshot, StoreError> {
        let mut doc = ConfigDocument::load(&self.path)?;
        doc.set(SECTION_BASE, "price_high", fmt_number(high));
        doc.set(SECTION_BASE, "price_low", fmt_number(low));
        self.save(&doc)?;
        info!(high, low, "calibration rates updated");
        self.resolve()
    }

    /// Updates the `[base]` block. `None` leaves the corresponding field
    /// untouched. Returns the fresh snapshot.
    ///
    /// # Errors
    ///
    /// `StoreError::InvalidInput` for a rounding label outside
    /// `{nearest10, ceil10}`.
    pub fn save_base(
        &self,
        rounding: Option<&str>,
        high: Option<f64>,
        low: Option<f64>,
    ) -> Result<Snapshot, StoreError> {
        let mut doc = ConfigDocument::load(&self.path)?;

        if let Some(label) = rounding {
            let mode = RoundingMode::parse_strict(label)
                .map_err(|e| StoreError::InvalidInput(e.to_string()))?;
            set_rounding(&mut doc, mode);
        }
        if let Some(v) = high {
            doc.set(SECTION_BASE, "price_high", fmt_number(v));
        }
        if let Some(v) = low {
            doc.set(SECTION_BASE, "price_low", fmt_number(v));
        }

        self.save(&doc)?;
        info!("base rates updated");
        self.resolve()
    }

    /// The built-in category synthesized when the store has neither the
    /// designated category nor a legacy `[positions]` section.
    #[must_use]
    pub fn default_category() -> Category {
        Category {
            id: DESIGNATED_CATEGORY_ID.to_string(),
            name: "Colour".to_string(),
            mode: SelectionMode::Single,
            items: vec![
                AdjustmentItem::new("standard grey", 0.0),
                AdjustmentItem::new("tinted in mass", 5.0),
                AdjustmentItem::new("black", 20.0),
                AdjustmentItem::new("custom surface finish", 20.0),
                AdjustmentItem::new("custom in mass", 25.0),
            ],
        }
    }

    fn save(&self, doc: &ConfigDocument) -> Result<(), StoreError> {
        doc.save(&self.path)
    }
}

fn group_section(id: &str) -> String {
    format!("{GROUP_PREFIX}{id}")
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// The rounding label lives in `[base]`; older stores kept it under
/// `[variables]`, so writers keep both in sync.
fn set_rounding(doc: &mut ConfigDocument, mode: RoundingMode) {
    doc.set(SECTION_BASE, "rounding", mode.as_str());
    doc.set(SECTION_VARIABLES, "rounding", mode.as_str());
}

fn ensure_defaults(doc: &mut ConfigDocument) -> bool {
    let mut changed = false;

    changed |= doc.set_if_missing(
        SECTION_VARIABLES,
        "min_length",
        DEFAULT_MIN_LENGTH.to_string(),
    );
    changed |= doc.set_if_missing(
        SECTION_VARIABLES,
        "max_length",
        DEFAULT_MAX_LENGTH.to_string(),
    );
    changed |= doc.set_if_missing(
        SECTION_VARIABLES,
        "min_width",
        DEFAULT_MIN_WIDTH.to_string(),
    );
    changed |= doc.set_if_missing(
        SECTION_VARIABLES,
        "min_height",
        DEFAULT_MIN_HEIGHT.to_string(),
    );
    changed |= doc.set_if_missing(
        SECTION_VARIABLES,
        "extra_price",
        fmt_number(DEFAULT_EXTRA_PRICE),
    );

    // Seed [base].rounding from the legacy [variables] location when only
    // the old key exists.
    if doc.get(SECTION_BASE, "rounding").is_none() {
        let label = doc
            .get(SECTION_VARIABLES, "rounding")
            .unwrap_or(DEFAULT_ROUNDING)
            .to_string();
        doc.set(SECTION_BASE, "rounding", label);
        changed = true;
    }
    changed |= doc.set_if_missing(SECTION_BASE, "price_high", fmt_number(DEFAULT_PRICE_HIGH));
    changed |= doc.set_if_missing(SECTION_BASE, "price_low", fmt_number(DEFAULT_PRICE_LOW));

    // Bootstrap the designated category, unless a legacy [positions]
    // section is still the source of truth.
    let designated = group_section(DESIGNATED_CATEGORY_ID);
    if !doc.has_section(&designated) && !doc.has_section(SECTION_POSITIONS) {
        let category = FileConfigStore::default_category();
        doc.set(&designated, "title", category.name.clone());
        doc.set(&designated, "mode", category.mode.as_str());
        for (i, item) in category.items.iter().enumerate() {
            doc.set(&designated, &format!("{ITEM_KEY_PREFIX}{}", i + 1), item.format());
        }
        changed = true;
    }

    changed
}

/// Rewrites stored items still carrying `%`/`+` decorations or decimal
/// commas into normalized numeric form. Idempotent: a second pass finds
/// nothing to rewrite.
fn migrate_decorated_items(doc: &mut ConfigDocument) -> bool {
    let mut rewrites: Vec<(String, String, String)> = Vec::new();

    for section in doc.section_names() {
        if !section.starts_with(GROUP_PREFIX) {
            continue;
        }
        for (key, value) in doc.entries(section) {
            if !key.starts_with(ITEM_KEY_PREFIX) {
                continue;
            }
            if value.contains('%') || value.contains('+') || value.contains(',') {
                rewrites.push((
                    section.to_string(),
                    key.to_string(),
                    AdjustmentItem::parse(value).format(),
                ));
            }
        }
    }

    if rewrites.is_empty() {
        return false;
    }
    debug!(count = rewrites.len(), "normalizing decorated item values");
    for (section, key, value) in rewrites {
        doc.set(&section, &key, value);
    }
    true
}

fn category_from_doc(doc: &ConfigDocument, id: &str) -> Category {
    let section = group_section(id);
    let name = doc
        .get(&section, "title")
        .map_or_else(|| capitalize(id), ToString::to_string);
    let mode = SelectionMode::from_label(doc.get(&section, "mode").unwrap_or("single"));

    // Collect item.N in order of N; a mangled index sorts last.
    let mut items: Vec<(usize, AdjustmentItem)> = doc
        .entries(&section)
        .iter()
        .filter_map(|(key, value)| {
            let suffix = key.strip_prefix(ITEM_KEY_PREFIX)?;
            let index = parse_or(suffix, 9999usize);
            Some((index, AdjustmentItem::parse(value)))
        })
        .collect();
    items.sort_by_key(|(index, _)| *index);

    Category {
        id: id.to_string(),
        name,
        mode,
        items: items.into_iter().map(|(_, item)| item).collect(),
    }
}

fn build_snapshot(doc: &ConfigDocument) -> Snapshot {
    let get = |section: &str, key: &str| doc.get(section, key).unwrap_or("");

    // The designated category wins; the legacy flat section is only read
    // when the category is absent.
    let positions = if doc.has_section(&group_section(DESIGNATED_CATEGORY_ID)) {
        category_from_doc(doc, DESIGNATED_CATEGORY_ID).position_map()
    } else {
        legacy_positions(doc)
    };

    let rounding = doc
        .get(SECTION_BASE, "rounding")
        .or_else(|| doc.get(SECTION_VARIABLES, "rounding"))
        .unwrap_or(DEFAULT_ROUNDING)
        .to_string();

    Snapshot {
        min_length: parse_or(get(SECTION_VARIABLES, "min_length"), DEFAULT_MIN_LENGTH),
        max_length: parse_or(get(SECTION_VARIABLES, "max_length"), DEFAULT_MAX_LENGTH),
        min_width: parse_or(get(SECTION_VARIABLES, "min_width"), DEFAULT_MIN_WIDTH),
        min_height: parse_or(get(SECTION_VARIABLES, "min_height"), DEFAULT_MIN_HEIGHT),
        extra_price: parse_or(get(SECTION_VARIABLES, "extra_price"), DEFAULT_EXTRA_PRICE),
        rounding,
        price_per_meter_high: parse_or(get(SECTION_BASE, "price_high"), DEFAULT_PRICE_HIGH),
        price_per_meter_low: parse_or(get(SECTION_BASE, "price_low"), DEFAULT_PRICE_LOW),
        positions,
    }
}

fn legacy_positions(doc: &ConfigDocument) -> BTreeMap<String, f64> {
    let mut positions = BTreeMap::new();
    for (name, value) in doc.entries(SECTION_POSITIONS) {
        // Unparseable legacy entries are skipped, not defaulted.
        if let Ok(percent) = value.trim().parse::<f64>() {
            positions.insert(name.to_string(), percent);
        }
    }
    positions
}
