//! Process-lifetime in-memory position overrides.

use std::collections::BTreeMap;

use dashmap::DashMap;

/// In-memory name-to-percent map backing one variant admin route.
///
/// Process-wide state with a reset-on-restart lifecycle: nothing here is
/// persisted, and it is distinct from the file-backed configuration - the
/// resolver and the engine never consult it.
pub struct InMemoryPositionStore {
    positions: DashMap<String, f64>,
}

impl InMemoryPositionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: DashMap::new(),
        }
    }

    /// Inserts or replaces a named percent.
    pub fn upsert(&self, name: impl Into<String>, percent: f64) {
        self.positions.insert(name.into(), percent);
    }

    /// Looks up a named percent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.positions.get(name).map(|p| *p)
    }

    /// Removes an entry, returning the previous percent if any.
    pub fn remove(&self, name: &str) -> Option<f64> {
        self.positions.remove(name).map(|(_, percent)| percent)
    }

    /// All entries, name-ordered for stable serialization.
    #[must_use]
    pub fn list(&self) -> BTreeMap<String, f64> {
        self.positions
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no entries exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.positions.clear();
    }
}

impl Default for InMemoryPositionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crud_cycle() {
        let store = InMemoryPositionStore::new();
        assert!(store.is_empty());

        store.upsert("black", 20.0);
        store.upsert("white", 5.0);
        store.upsert("black", 25.0);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("black"), Some(25.0));

        let listed = store.list();
        assert_eq!(
            listed.keys().collect::<Vec<_>>(),
            vec!["black", "white"]
        );

        assert_eq!(store.remove("black"), Some(25.0));
        assert_eq!(store.remove("black"), None);
        store.clear();
        assert!(store.is_empty());
    }
}
