//! Integration tests for the file-backed configuration store.

use std::fs;

use tempfile::TempDir;

use panelquote_core::{AdjustmentItem, Category, SelectionMode, Snapshot};
use panelquote_ext_file::{FileConfigStore, VariablesUpdate};

fn store_in(dir: &TempDir) -> FileConfigStore {
    FileConfigStore::new(dir.path().join("panelquote.ini"))
}

#[test]
fn missing_file_resolves_to_defaults_and_bootstraps() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let snapshot = store.resolve().unwrap();
    assert_eq!(snapshot.min_length, 500);
    assert_eq!(snapshot.max_length, 1000);
    assert_eq!(snapshot.rounding, "ceil10");
    assert_eq!(snapshot.price_per_meter_high, 21101.0);
    assert_eq!(snapshot.price_per_meter_low, 18257.0);
    // Bootstrap synthesizes the five default options.
    assert_eq!(snapshot.positions.len(), 5);
    assert_eq!(snapshot.positions.get("black"), Some(&20.0));

    // Defaults were persisted to disk.
    let text = fs::read_to_string(store.path()).unwrap();
    assert!(text.contains("[variables]"));
    assert!(text.contains("[group:colors]"));
    assert!(text.contains("min_length = 500"));

    // A second resolution is a pure re-read: no further rewrite.
    let before = fs::read_to_string(store.path()).unwrap();
    let again = store.resolve().unwrap();
    assert_eq!(again, snapshot);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn malformed_fields_fall_back_individually() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.path(),
        "[variables]\nmin_length = banana\nmax_length = 2000\n",
    )
    .unwrap();

    let snapshot = store.resolve().unwrap();
    assert_eq!(snapshot.min_length, 500); // default
    assert_eq!(snapshot.max_length, 2000); // parsed
}

#[test]
fn decorated_items_are_migrated_once() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.path(),
        "[group:colors]\ntitle = Colour\nmode = single\n\
         item.1 = standard grey|mul|0\nitem.2 = tinted in mass|mul|+5%\n\
         item.3 = custom|mul|12,5\n",
    )
    .unwrap();

    let snapshot = store.resolve().unwrap();
    assert_eq!(snapshot.positions.get("tinted in mass"), Some(&5.0));
    assert_eq!(snapshot.positions.get("custom"), Some(&12.5));

    let text = fs::read_to_string(store.path()).unwrap();
    assert!(text.contains("item.2 = tinted in mass|mul|5"));
    assert!(text.contains("item.3 = custom|mul|12.5"));
    assert!(!text.contains('%'));
    assert!(!text.contains('+'));

    // Idempotent: nothing further changes on re-resolution.
    let before = fs::read_to_string(store.path()).unwrap();
    store.resolve().unwrap();
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn legacy_positions_section_is_read_when_group_is_absent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "[positions]\nblack = 20\nbad = lots\n").unwrap();

    let snapshot = store.resolve().unwrap();
    assert_eq!(snapshot.positions.get("black"), Some(&20.0));
    // Unparseable legacy entries are skipped.
    assert!(!snapshot.positions.contains_key("bad"));

    // The legacy layer suppresses the default-category bootstrap.
    let text = fs::read_to_string(store.path()).unwrap();
    assert!(!text.contains("[group:colors]"));
}

#[test]
fn designated_group_wins_over_legacy_section() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.path(),
        "[positions]\nblack = 99\n\n[group:colors]\nitem.1 = black|mul|20\n",
    )
    .unwrap();

    let snapshot = store.resolve().unwrap();
    assert_eq!(snapshot.positions.get("black"), Some(&20.0));
}

#[test]
fn category_crud_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.resolve().unwrap();

    let saved = store
        .save_category(&Category {
            id: "finishes".to_string(),
            name: "Finish".to_string(),
            mode: SelectionMode::Multi,
            items: vec![
                AdjustmentItem::new("matte", 0.0),
                AdjustmentItem::new("gloss", 7.5),
            ],
        })
        .unwrap();
    assert_eq!(saved.items.len(), 2);
    assert_eq!(saved.mode, SelectionMode::Multi);

    let listed = store.list_categories().unwrap();
    let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["colors", "finishes"]);

    let fetched = store.get_category("finishes").unwrap().unwrap();
    assert_eq!(fetched.items[1].name, "gloss");
    assert_eq!(fetched.items[1].value, 7.5);

    assert!(store.delete_category("finishes").unwrap());
    assert!(!store.delete_category("finishes").unwrap());
    assert!(store.get_category("finishes").unwrap().is_none());
}

#[test]
fn save_category_replaces_stale_items() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.resolve().unwrap();

    let long = Category {
        id: "colors".to_string(),
        name: "Colour".to_string(),
        mode: SelectionMode::Single,
        items: vec![
            AdjustmentItem::new("a", 1.0),
            AdjustmentItem::new("b", 2.0),
            AdjustmentItem::new("c", 3.0),
        ],
    };
    store.save_category(&long).unwrap();

    let short = Category {
        items: vec![AdjustmentItem::new("only", 9.0)],
        ..long
    };
    let saved = store.save_category(&short).unwrap();
    assert_eq!(saved.items.len(), 1);

    let snapshot = store.resolve().unwrap();
    assert_eq!(snapshot.positions.len(), 1);
    assert_eq!(snapshot.positions.get("only"), Some(&9.0));
}

#[test]
fn save_category_requires_an_id() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let err = store
        .save_category(&Category {
            id: "  ".to_string(),
            name: String::new(),
            mode: SelectionMode::Single,
            items: vec![],
        })
        .unwrap_err();
    assert!(err.to_string().contains("category id"));
}

#[test]
fn save_variables_updates_and_validates() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let snapshot = store
        .save_variables(&VariablesUpdate {
            min_length: Some(400),
            extra_price: Some(25.5),
            rounding: Some("nearest10".to_string()),
            ..VariablesUpdate::default()
        })
        .unwrap();
    assert_eq!(snapshot.min_length, 400);
    assert_eq!(snapshot.extra_price, 25.5);
    assert_eq!(snapshot.rounding, "nearest10");
    // Untouched fields keep their defaults.
    assert_eq!(snapshot.max_length, 1000);

    let err = store
        .save_variables(&VariablesUpdate {
            rounding: Some("floor".to_string()),
            ..VariablesUpdate::default()
        })
        .unwrap_err();
    assert!(err.to_string().contains("nearest10|ceil10"));
}

#[test]
fn save_base_partial_update() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let snapshot = store
        .save_base(Some("nearest10"), Some(20097.0), None)
        .unwrap();
    assert_eq!(snapshot.rounding, "nearest10");
    assert_eq!(snapshot.price_per_meter_high, 20097.0);
    assert_eq!(snapshot.price_per_meter_low, 18257.0);

    let snapshot = store.save_prices(19000.0, 17000.0).unwrap();
    assert_eq!(snapshot.price_per_meter_high, 19000.0);
    assert_eq!(snapshot.price_per_meter_low, 17000.0);
}

#[test]
fn out_of_band_writes_are_visible_to_the_next_resolution() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.resolve().unwrap();

    // Simulate another writer replacing the file between resolutions.
    let text = fs::read_to_string(store.path())
        .unwrap()
        .replace("min_length = 500", "min_length = 750");
    fs::write(store.path(), text).unwrap();

    assert_eq!(store.resolve().unwrap().min_length, 750);
    assert_eq!(store.reload().unwrap().min_length, 750);
}

#[test]
fn atomic_save_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.resolve().unwrap();

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn unknown_rounding_label_in_store_passes_through() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "[base]\nrounding = floor100\n").unwrap();

    let snapshot: Snapshot = store.resolve().unwrap();
    assert_eq!(snapshot.rounding, "floor100");
}

#[test]
fn legacy_variables_rounding_seeds_base() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "[variables]\nrounding = nearest10\n").unwrap();

    let snapshot = store.resolve().unwrap();
    assert_eq!(snapshot.rounding, "nearest10");
}
