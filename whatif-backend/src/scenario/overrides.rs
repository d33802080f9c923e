//! Session-level override store.
//!
//! Holds at most one override per field. Re-applying a field removes the old
//! entry and appends the new one, so iteration order is the order in which
//! fields were last applied.

use tracing::debug;

use whatif_shared::{FieldMap, Override};

#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
    entries: Vec<Override>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an override, replacing any existing override for the same field
    pub fn apply(&mut self, source: &str, field: &str, value: f64) -> &Override {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.field != field);
        if self.entries.len() != before {
            debug!("Replacing existing override for field '{}'", field);
        }

        self.entries.push(Override::new(source, field, value));
        &self.entries[self.entries.len() - 1]
    }

    /// Remove every override, returning how many were cleared
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Active override for a field, if any
    pub fn get(&self, field: &str) -> Option<&Override> {
        self.entries.iter().find(|entry| entry.field == field)
    }

    /// Active overrides in last-applied order
    pub fn entries(&self) -> &[Override] {
        &self.entries
    }

    /// Field → value mapping of all active overrides
    pub fn to_field_map(&self) -> FieldMap {
        self.entries
            .iter()
            .map(|entry| (entry.field.clone(), entry.value))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
