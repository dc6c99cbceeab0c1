//! Ranked string suggestions: prefix, substring, fuzzy and regex matching
//! with per-item weights, usage-history boosting, exclusion filters and a
//! bounded result cache.

pub mod cache;
pub mod distance;
pub mod engine;
pub mod history;
pub mod index;
pub mod matcher;
pub mod scoring;
pub mod settings;
pub mod stats;

pub use engine::{SuggestError, SuggestionDetail, SuggestionEngine};
pub use matcher::MatchType;
pub use settings::SuggestConfig;
pub use stats::SuggestionStats;
