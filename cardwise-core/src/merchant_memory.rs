//! Merchant → category memory.
//!
//! Every committed purchase teaches the book which category a merchant
//! belongs to; the classifier consults this before any keyword heuristic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Normalized memory key: trimmed and lowercased.
pub fn normalize_merchant(merchant: &str) -> String {
    merchant.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MerchantMemory {
    entries: BTreeMap<String, String>,
}

impl MerchantMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Remember `merchant` as belonging to `category`. Blank merchants are
    /// ignored; returns whether an entry was written.
    pub fn remember(&mut self, merchant: &str, category: &str) -> bool {
        let key = normalize_merchant(merchant);
        if key.is_empty() {
            return false;
        }
        self.entries.insert(key, category.to_string());
        true
    }

    pub fn lookup(&self, merchant: &str) -> Option<&str> {
        self.entries
            .get(&normalize_merchant(merchant))
            .map(|s| s.as_str())
    }

    pub fn forget(&mut self, merchant: &str) -> Option<String> {
        self.entries.remove(&normalize_merchant(merchant))
    }

    /// Point every entry filed under `old` (case-insensitive) at `new`.
    /// Returns the number of entries updated.
    pub fn retarget(&mut self, old: &str, new: &str) -> usize {
        let old = old.to_lowercase();
        let mut updated = 0;
        for value in self.entries.values_mut() {
            if value.to_lowercase() == old {
                *value = new.to_string();
                updated += 1;
            }
        }
        updated
    }
}
