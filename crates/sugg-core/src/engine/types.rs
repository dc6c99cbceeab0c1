use serde::Serialize;

use crate::settings::SettingsError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SuggestError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid argument for {field}: {reason}")]
    InvalidArgument { field: String, reason: String },
}

impl From<SettingsError> for SuggestError {
    fn from(e: SettingsError) -> Self {
        match e {
            SettingsError::InvalidValue { field, reason } => Self::InvalidArgument { field, reason },
            SettingsError::Parse(reason) => Self::InvalidArgument {
                field: "settings".to_string(),
                reason,
            },
        }
    }
}

/// Diagnostic view of one ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionDetail {
    pub suggestion: String,
    /// Composite score mapped onto `[0, 1)`.
    pub confidence: f64,
    pub edit_distance: f64,
    /// `"prefix"`, `"substring"`, `"fuzzy"` or `"regex"`.
    pub match_type: String,
}

/// Predicate an item must satisfy to be suggested.
pub type Filter = Box<dyn Fn(&str) -> bool + Send + Sync>;
