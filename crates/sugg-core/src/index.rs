//! Normalized candidate index.
//!
//! Maps the normalized form of each dataset item to its original form.
//! Entries keep the position of the first occurrence of their key so that
//! iteration (and therefore tie-breaking between equal scores) is stable;
//! a later duplicate only overwrites the original form.

use std::collections::HashMap;

/// Lower-case unless the engine runs case-sensitive.
pub fn normalize(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_string()
    } else {
        s.to_lowercase()
    }
}

#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub normalized: String,
    pub original: String,
    /// `normalized` as chars, cached for edit distance.
    pub chars: Vec<char>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<String, usize>,
}

impl CandidateIndex {
    pub fn build<'a, I>(items: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut index = Self::default();
        for item in items {
            index.insert(item, case_sensitive);
        }
        index
    }

    fn insert(&mut self, original: &str, case_sensitive: bool) {
        let normalized = normalize(original, case_sensitive);
        if let Some(&pos) = self.positions.get(&normalized) {
            self.entries[pos].original = original.to_string();
            return;
        }
        self.positions.insert(normalized.clone(), self.entries.len());
        self.entries.push(IndexEntry {
            chars: normalized.chars().collect(),
            normalized,
            original: original.to_string(),
        });
    }

    /// Original form for a normalized key.
    pub fn get(&self, normalized: &str) -> Option<&str> {
        self.positions
            .get(normalized)
            .map(|&pos| self.entries[pos].original.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
