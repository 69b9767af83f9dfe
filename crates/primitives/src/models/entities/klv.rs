use diesel::Queryable;
use std::collections::HashMap;

/// One row of the `pmtol_klvmap` dictionary table.
#[derive(Debug, Clone, Queryable)]
pub struct KlvEntry {
    pub key_index: String,
    pub key_name: String,
    pub key_descrp: String,
}

/// Immutable key-index dictionary, loaded once at startup and shared
/// read-only for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct KlvDictionary {
    entries: HashMap<String, KlvEntry>,
}

impl KlvDictionary {
    pub fn from_entries(entries: Vec<KlvEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.key_index.clone(), e))
                .collect(),
        }
    }

    pub fn get(&self, key_index: &str) -> Option<&KlvEntry> {
        self.entries.get(key_index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
