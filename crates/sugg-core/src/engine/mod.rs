//! Thread-safe suggestion engine.
//!
//! All state (dataset, index, weights, filters, history, cache, stats) sits
//! behind one mutex, so every operation observes a single total order.
//! Nothing here blocks on I/O; callers wanting non-blocking lookups run
//! `suggest` on their own worker threads.

#[cfg(test)]
mod tests;
mod types;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, debug_span};

use crate::cache::{CacheKey, ResultCache};
use crate::distance::edit_distance_chars;
use crate::history::HistoryTable;
use crate::index::{normalize, CandidateIndex};
use crate::matcher::{MatchType, Matcher};
use crate::scoring::{advanced_score, confidence, ScoreParts};
use crate::settings::{self, SuggestConfig};
use crate::stats::SuggestionStats;

pub use types::{Filter, SuggestError, SuggestionDetail};

pub struct SuggestionEngine {
    state: Mutex<EngineState>,
}

struct EngineState {
    config: SuggestConfig,
    dataset: Vec<String>,
    index: CandidateIndex,
    weights: HashMap<String, f64>,
    filters: Vec<Filter>,
    history: HistoryTable,
    cache: ResultCache,
    stats: SuggestionStats,
}

struct Scored {
    original: String,
    score: f64,
    distance: usize,
}

struct Ranking {
    items: Vec<Scored>,
    filtered: u64,
}

impl EngineState {
    fn rebuild_index(&mut self) {
        self.index = CandidateIndex::build(&self.dataset, self.config.case_sensitive);
        debug!(
            items = self.dataset.len(),
            keys = self.index.len(),
            case_sensitive = self.config.case_sensitive,
            "index rebuilt"
        );
    }

    fn cache_key(&self, input: &str, match_type: MatchType) -> CacheKey {
        // Regex patterns are keyed verbatim: lower-casing would turn `\W` into `\w`.
        let input = match match_type {
            MatchType::Regex => input.to_string(),
            _ => normalize(input, self.config.case_sensitive),
        };
        CacheKey {
            input,
            match_type,
            case_sensitive: self.config.case_sensitive,
        }
    }

    /// Score every indexed item, drop ineligible and filtered ones, and
    /// return the best `max_suggestions` in descending score order.
    fn rank(&self, raw: &str, match_type: MatchType) -> Ranking {
        let cfg = &self.config;
        let input = normalize(raw, cfg.case_sensitive);
        let input_chars: Vec<char> = input.chars().collect();
        let matcher = Matcher::new(
            match_type,
            &input,
            raw,
            cfg.case_sensitive,
            cfg.max_edit_distance,
        );

        let mut items = Vec::new();
        let mut filtered = 0;
        for entry in self.index.iter() {
            let distance = edit_distance_chars(&input_chars, &entry.chars, cfg.use_transposition);
            let Some(match_score) = matcher.match_score(entry, distance) else {
                continue;
            };
            let parts = ScoreParts {
                advanced: advanced_score(
                    &input,
                    input_chars.len(),
                    &entry.normalized,
                    entry.chars.len(),
                ),
                match_score,
                distance,
                weight: self.weights.get(&entry.original).copied().unwrap_or(1.0),
                history_boost: self
                    .history
                    .boost(&entry.original, cfg.history_weight_factor),
            };
            let score = parts.total();
            if !self.filters.iter().all(|f| f(&entry.original)) {
                filtered += 1;
                continue;
            }
            items.push(Scored {
                original: entry.original.clone(),
                score,
                distance,
            });
        }

        // Stable sort: equal scores keep index order.
        items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        items.truncate(cfg.max_suggestions);
        Ranking { items, filtered }
    }

    fn snapshot_stats(&self) -> SuggestionStats {
        SuggestionStats {
            dataset_size: self.dataset.len(),
            cache_size: self.cache.len(),
            ..self.stats.clone()
        }
    }
}

fn require_input(input: &str) -> Result<(), SuggestError> {
    if input.is_empty() {
        return Err(SuggestError::InvalidInput("query must not be empty".to_string()));
    }
    Ok(())
}

impl SuggestionEngine {
    pub fn new<I, S>(dataset: I, config: SuggestConfig) -> Result<Self, SuggestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        settings::validate(&config)?;
        let dataset: Vec<String> = dataset.into_iter().map(Into::into).collect();
        let index = CandidateIndex::build(&dataset, config.case_sensitive);
        let state = EngineState {
            cache: ResultCache::new(config.max_cache_size),
            config,
            dataset,
            index,
            weights: HashMap::new(),
            filters: Vec::new(),
            history: HistoryTable::default(),
            stats: SuggestionStats::default(),
        };
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// Default configuration with a custom result cap.
    pub fn with_max_suggestions<I, S>(
        dataset: I,
        max_suggestions: usize,
    ) -> Result<Self, SuggestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = SuggestConfig {
            max_suggestions,
            ..SuggestConfig::default()
        };
        Self::new(dataset, config)
    }

    /// A panicking filter poisons the mutex; the state itself is never left
    /// half-updated by a filter, so the guard is recovered.
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ranked suggestions for `input`, served from the cache when possible.
    pub fn suggest(
        &self,
        input: &str,
        match_type: MatchType,
    ) -> Result<Vec<String>, SuggestError> {
        require_input(input)?;
        let _span = debug_span!("suggest", input, match_type = %match_type).entered();
        let started = Instant::now();

        let mut state = self.lock();
        state.stats.total_suggestion_calls += 1;
        let key = state.cache_key(input, match_type);

        if let Some(hit) = state.cache.get(&key) {
            state.stats.cache_hits += 1;
            state.stats.total_processing_time += started.elapsed();
            debug!(results = hit.len(), "cache hit");
            return Ok(hit);
        }
        state.stats.cache_misses += 1;

        let ranking = state.rank(input, match_type);
        state.stats.items_filtered += ranking.filtered;
        let results: Vec<String> = ranking.items.into_iter().map(|s| s.original).collect();
        state.cache.insert(key, results.clone());
        state.stats.total_processing_time += started.elapsed();
        debug!(results = results.len(), filtered = ranking.filtered, "cache miss");
        Ok(results)
    }

    /// Like [`suggest`](Self::suggest) but with per-candidate diagnostics.
    /// Bypasses the cache and leaves statistics untouched.
    pub fn suggestion_details(
        &self,
        input: &str,
        match_type: MatchType,
    ) -> Result<Vec<SuggestionDetail>, SuggestError> {
        require_input(input)?;
        let state = self.lock();
        let ranking = state.rank(input, match_type);
        Ok(ranking
            .items
            .into_iter()
            .map(|s| SuggestionDetail {
                suggestion: s.original,
                confidence: confidence(s.score),
                edit_distance: s.distance as f64,
                match_type: match_type.label().to_string(),
            })
            .collect())
    }

    /// Append items. Cached answers are kept; they may miss the new items
    /// until evicted or cleared.
    pub fn update_dataset<I, S>(&self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.lock();
        state.dataset.extend(items.into_iter().map(Into::into));
        state.rebuild_index();
    }

    /// Replace the dataset wholesale.
    pub fn set_dataset<I, S>(&self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.lock();
        state.dataset = items.into_iter().map(Into::into).collect();
        state.rebuild_index();
        state.cache.clear();
    }

    /// Snapshot of the raw dataset, duplicates included.
    pub fn dataset(&self) -> Vec<String> {
        self.lock().dataset.clone()
    }

    /// Number of distinct indexed items.
    pub fn len(&self) -> usize {
        self.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().index.is_empty()
    }

    /// Does not invalidate the cache; call [`clear_cache`](Self::clear_cache)
    /// after a batch of weight changes.
    pub fn set_weight(&self, item: &str, weight: f64) {
        self.lock().weights.insert(item.to_string(), weight);
    }

    pub fn weight(&self, item: &str) -> f64 {
        self.lock().weights.get(item).copied().unwrap_or(1.0)
    }

    pub fn add_filter<F>(&self, filter: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.lock().filters.push(Box::new(filter));
    }

    pub fn clear_filters(&self) {
        self.lock().filters.clear();
    }

    pub fn clear_cache(&self) {
        self.lock().cache.clear();
    }

    pub fn set_fuzzy_match_threshold(&self, threshold: f64) -> Result<(), SuggestError> {
        settings::check_threshold(threshold)?;
        self.lock().config.fuzzy_match_threshold = threshold;
        Ok(())
    }

    /// Clears the cache: cached lists were truncated to the old cap.
    pub fn set_max_suggestions(&self, max_suggestions: usize) -> Result<(), SuggestError> {
        settings::check_max_suggestions(max_suggestions)?;
        let mut state = self.lock();
        state.config.max_suggestions = max_suggestions;
        state.cache.clear();
        Ok(())
    }

    pub fn set_case_sensitivity(&self, case_sensitive: bool) {
        let mut state = self.lock();
        if state.config.case_sensitive == case_sensitive {
            return;
        }
        state.config.case_sensitive = case_sensitive;
        state.rebuild_index();
        state.cache.clear();
    }

    /// Replace the history frequency table.
    pub fn update_from_history<I, S>(&self, history: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = HistoryTable::from_items(history);
        let mut state = self.lock();
        debug!(
            total = table.total(),
            distinct = table.distinct(),
            "history replaced"
        );
        state.history = table;
        state.cache.clear();
    }

    pub fn stats(&self) -> SuggestionStats {
        self.lock().snapshot_stats()
    }

    pub fn statistics_text(&self) -> String {
        self.stats().render()
    }

    pub fn reset_stats(&self) {
        self.lock().stats = SuggestionStats::default();
    }

    /// Replace the whole configuration. Rejected configs leave the current
    /// one in place.
    pub fn update_config(&self, config: SuggestConfig) -> Result<(), SuggestError> {
        settings::validate(&config)?;
        let mut state = self.lock();
        let case_changed = state.config.case_sensitive != config.case_sensitive;
        state.cache.clear();
        state.cache.set_capacity(config.max_cache_size);
        state.config = config;
        if case_changed {
            state.rebuild_index();
        }
        Ok(())
    }

    pub fn config(&self) -> SuggestConfig {
        self.lock().config.clone()
    }
}
