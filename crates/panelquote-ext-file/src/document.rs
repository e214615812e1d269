//! Sectioned key-value document.

use std::fs;
use std::path::Path;

use crate::error::StoreError;

/// An ordered, sectioned key-value document - the on-disk configuration
/// layout.
///
/// Parsing is lenient and total: blank lines, `;`/`#` comments and lines
/// that are neither section headers nor `key = value` pairs are skipped.
/// Keys are lowercased; section names keep their case. Duplicate section
/// headers merge into the first occurrence, later duplicate keys replace
/// earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    sections: Vec<Section>,
}

#[derive(Debug, Clone)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl ConfigDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses document text. Never fails; unrecognized lines are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::new();
        let mut current: Option<usize> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = Some(doc.section_index_or_insert(name.trim()));
                continue;
            }
            let Some(index) = current else {
                // Key-value pair before any section header.
                continue;
            };
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_lowercase();
                if key.is_empty() {
                    continue;
                }
                set_entry(&mut doc.sections[index], &key, value.trim());
            }
        }
        doc
    }

    /// Reads and parses a document from disk. A missing file yields an
    /// empty document.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Formats the document for storage, sections in insertion order.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for (key, value) in &section.entries {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }

    /// Writes the document atomically: temp file in the target directory,
    /// then rename over the target.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file_name = path
            .file_name()
            .ok_or_else(|| StoreError::InvalidInput(format!("bad store path: {}", path.display())))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);

        fs::write(&tmp, self.to_text())?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// True if the named section exists.
    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name == name)
    }

    /// All section names, in insertion order.
    #[must_use]
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Looks up a value.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.section(section)?
            .entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All `(key, value)` pairs of a section, in insertion order.
    #[must_use]
    pub fn entries(&self, section: &str) -> Vec<(&str, &str)> {
        self.section(section)
            .map(|s| {
                s.entries
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sets a value, creating the section as needed. Existing keys are
    /// replaced in place.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let index = self.section_index_or_insert(section);
        set_entry(&mut self.sections[index], &key.to_lowercase(), value);
    }

    /// Sets a value only when the key is absent. Returns true if the
    /// document changed.
    pub fn set_if_missing(&mut self, section: &str, key: &str, value: impl Into<String>) -> bool {
        if self.get(section, key).is_some() {
            return false;
        }
        self.set(section, key, value);
        true
    }

    /// Removes a key. Returns true if it existed.
    pub fn remove_key(&mut self, section: &str, key: &str) -> bool {
        let key = key.to_lowercase();
        let Some(s) = self.sections.iter_mut().find(|s| s.name == section) else {
            return false;
        };
        let before = s.entries.len();
        s.entries.retain(|(k, _)| *k != key);
        s.entries.len() != before
    }

    /// Removes every key of a section that starts with `prefix`.
    pub fn remove_keys_with_prefix(&mut self, section: &str, prefix: &str) {
        if let Some(s) = self.sections.iter_mut().find(|s| s.name == section) {
            s.entries.retain(|(k, _)| !k.starts_with(prefix));
        }
    }

    /// Removes a whole section. Returns true if it existed.
    pub fn remove_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        self.sections.len() != before
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(i) = self.sections.iter().position(|s| s.name == name) {
            return i;
        }
        self.sections.push(Section {
            name: name.to_string(),
            entries: Vec::new(),
        });
        self.sections.len() - 1
    }
}

fn set_entry(section: &mut Section, key: &str, value: impl Into<String>) {
    let value = value.into();
    if let Some(entry) = section.entries.iter_mut().find(|(k, _)| k == key) {
        entry.1 = value;
    } else {
        section.entries.push((key.to_string(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
; pricing configuration
[variables]
min_length = 500
Max_Length = 1000

[group:colors]
title = Colour
item.1 = standard grey|mul|0
";

    #[test]
    fn test_parse_sections_and_keys() {
        let doc = ConfigDocument::parse(SAMPLE);
        assert!(doc.has_section("variables"));
        assert!(doc.has_section("group:colors"));
        assert_eq!(doc.get("variables", "min_length"), Some("500"));
        // Keys are lowercased.
        assert_eq!(doc.get("variables", "max_length"), Some("1000"));
        assert_eq!(doc.get("group:colors", "item.1"), Some("standard grey|mul|0"));
    }

    #[test]
    fn test_parse_skips_junk() {
        let doc = ConfigDocument::parse("orphan = 1\n[ok]\n# comment\nnot a pair\nkey = v\n");
        assert_eq!(doc.section_names(), vec!["ok"]);
        assert_eq!(doc.get("ok", "key"), Some("v"));
        assert_eq!(doc.get("ok", "orphan"), None);
    }

    #[test]
    fn test_value_may_contain_delimiters() {
        let doc = ConfigDocument::parse("[g]\nitem.1 = a=b|mul|5\n");
        assert_eq!(doc.get("g", "item.1"), Some("a=b|mul|5"));
    }

    #[test]
    fn test_set_and_roundtrip() {
        let mut doc = ConfigDocument::new();
        doc.set("base", "rounding", "ceil10");
        doc.set("base", "price_high", "21101");
        doc.set("base", "rounding", "nearest10");

        let reparsed = ConfigDocument::parse(&doc.to_text());
        assert_eq!(reparsed.get("base", "rounding"), Some("nearest10"));
        assert_eq!(reparsed.get("base", "price_high"), Some("21101"));
        assert_eq!(reparsed.entries("base").len(), 2);
    }

    #[test]
    fn test_set_if_missing() {
        let mut doc = ConfigDocument::new();
        assert!(doc.set_if_missing("base", "rounding", "ceil10"));
        assert!(!doc.set_if_missing("base", "rounding", "nearest10"));
        assert_eq!(doc.get("base", "rounding"), Some("ceil10"));
    }

    #[test]
    fn test_remove() {
        let mut doc = ConfigDocument::parse(SAMPLE);
        doc.remove_keys_with_prefix("group:colors", "item.");
        assert_eq!(doc.get("group:colors", "item.1"), None);
        assert_eq!(doc.get("group:colors", "title"), Some("Colour"));
        assert!(doc.remove_section("group:colors"));
        assert!(!doc.remove_section("group:colors"));
    }

    #[test]
    fn test_duplicate_sections_merge() {
        let doc = ConfigDocument::parse("[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n");
        assert_eq!(doc.get("a", "x"), Some("1"));
        assert_eq!(doc.get("a", "z"), Some("3"));
        assert_eq!(doc.section_names().len(), 2);
    }
}
