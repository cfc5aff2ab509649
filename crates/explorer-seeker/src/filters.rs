//! The active-filter map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clause::FilterValue;

/// Current value for each active filter, keyed by config field.
///
/// Absence of an entry means the filter is inactive. Empty values are
/// never stored: setting one removes the entry instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFilters {
    entries: BTreeMap<String, FilterValue>,
}

impl ActiveFilters {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        ActiveFilters::default()
    }

    /// Adds a filter, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Replaces the entry for `field`, or removes it if `value` is empty.
    ///
    /// Returns `true` if the map changed.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> bool {
        let field = field.into();
        let value = value.into();
        if value.is_empty() {
            return self.entries.remove(&field).is_some();
        }
        match self.entries.get(&field) {
            Some(existing) if *existing == value => false,
            _ => {
                self.entries.insert(field, value);
                true
            }
        }
    }

    /// Removes the entry for `field`. Returns `true` if it existed.
    pub fn remove(&mut self, field: &str) -> bool {
        self.entries.remove(field).is_some()
    }

    /// Removes every entry. Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }

    /// Returns the value for `field`.
    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.entries.get(field)
    }

    /// Iterates entries in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of active filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no filter is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
