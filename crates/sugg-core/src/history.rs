//! Usage-history frequency table.
//!
//! Items that appeared often in the caller's history receive a
//! multiplicative boost: `1 + frequency * factor / max(1, total)`.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct HistoryTable {
    frequencies: HashMap<String, u32>,
    total: usize,
}

impl HistoryTable {
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for item in items {
            *table
                .frequencies
                .entry(item.as_ref().to_string())
                .or_insert(0) += 1;
            table.total += 1;
        }
        table
    }

    pub fn frequency(&self, item: &str) -> u32 {
        self.frequencies.get(item).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct items recorded.
    pub fn distinct(&self) -> usize {
        self.frequencies.len()
    }

    pub fn boost(&self, item: &str, factor: f64) -> f64 {
        let freq = self.frequency(item);
        if freq == 0 {
            return 1.0;
        }
        1.0 + freq as f64 * factor / self.total.max(1) as f64
    }
}
