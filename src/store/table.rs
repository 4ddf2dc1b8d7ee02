//! Table implementation
//!
//! HashMap-based table of lock entries. Not synchronized on its own; the
//! owning store's lock covers it.

use std::collections::HashMap;

use super::Attributes;

/// Entries of one named table, keyed by lock key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    entries: HashMap<String, Attributes>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the attributes stored at `key`
    pub fn get(&self, key: &str) -> Option<&Attributes> {
        self.entries.get(key)
    }

    /// Insert or fully replace the entry at `key`
    pub fn insert(&mut self, key: String, attributes: Attributes) {
        self.entries.insert(key, attributes);
    }

    /// Insert only if `key` is free
    ///
    /// Returns false, leaving the table unchanged, when an entry is present.
    pub fn insert_if_absent(&mut self, key: &str, attributes: Attributes) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), attributes);
        true
    }

    /// Remove the entry at `key`, returning what was stored
    pub fn remove(&mut self, key: &str) -> Option<Attributes> {
        self.entries.remove(key)
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
