use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

/// Counters describing engine activity since creation or the last reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionStats {
    pub dataset_size: usize,
    pub cache_size: usize,
    pub total_suggestion_calls: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub total_processing_time: Duration,
    pub items_filtered: u64,
}

impl SuggestionStats {
    /// Fraction of calls served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }

    pub fn average_processing_time(&self) -> Duration {
        if self.total_suggestion_calls == 0 {
            return Duration::ZERO;
        }
        let calls = u32::try_from(self.total_suggestion_calls).unwrap_or(u32::MAX);
        self.total_processing_time / calls
    }

    /// Multi-line report for logs and diagnostics output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Suggestion engine statistics");
        let _ = writeln!(out, "  dataset size:       {}", self.dataset_size);
        let _ = writeln!(out, "  cache size:         {}", self.cache_size);
        let _ = writeln!(out, "  suggestion calls:   {}", self.total_suggestion_calls);
        let _ = writeln!(
            out,
            "  cache hits/misses:  {}/{} ({:.1}% hit rate)",
            self.cache_hits,
            self.cache_misses,
            self.hit_rate() * 100.0
        );
        let _ = writeln!(
            out,
            "  processing time:    {:?} total, {:?} avg",
            self.total_processing_time,
            self.average_processing_time()
        );
        let _ = writeln!(out, "  items filtered:     {}", self.items_filtered);
        out
    }
}
