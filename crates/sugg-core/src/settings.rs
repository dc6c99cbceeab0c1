//! Engine configuration loaded from TOML.
//!
//! - `parse_settings_toml(toml_content)` parses and validates a `[suggest]` table
//! - `default_toml()` returns the embedded defaults (`default_settings.toml`)
//! - `validate(config)` is shared with the engine's runtime setters

use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Snapshot of the tunables consulted on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    pub case_sensitive: bool,
    pub max_suggestions: usize,
    pub max_edit_distance: f64,
    pub fuzzy_match_threshold: f64,
    pub history_weight_factor: f64,
    pub max_cache_size: usize,
    pub use_transposition: bool,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            max_suggestions: 5,
            max_edit_distance: 3.0,
            fuzzy_match_threshold: 0.5,
            history_weight_factor: 1.5,
            max_cache_size: 1000,
            use_transposition: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    suggest: SuggestConfig,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<SuggestConfig, SettingsError> {
    let file: SettingsFile =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&file.suggest)?;
    Ok(file.suggest)
}

/// Render a config back into the `[suggest]` TOML layout.
pub fn to_toml(config: &SuggestConfig) -> Result<String, SettingsError> {
    #[derive(Serialize)]
    struct Out<'a> {
        suggest: &'a SuggestConfig,
    }
    toml::to_string(&Out { suggest: config }).map_err(|e| SettingsError::Parse(e.to_string()))
}

pub(crate) fn check_threshold(value: f64) -> Result<(), SettingsError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SettingsError::InvalidValue {
            field: "fuzzy_match_threshold".to_string(),
            reason: format!("{value} is outside [0.0, 1.0]"),
        });
    }
    Ok(())
}

pub(crate) fn check_max_suggestions(value: usize) -> Result<(), SettingsError> {
    if value == 0 {
        return Err(SettingsError::InvalidValue {
            field: "max_suggestions".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

pub fn validate(c: &SuggestConfig) -> Result<(), SettingsError> {
    macro_rules! check_non_negative {
        ($field:ident) => {
            if !c.$field.is_finite() || c.$field < 0.0 {
                return Err(SettingsError::InvalidValue {
                    field: stringify!($field).to_string(),
                    reason: "must be a non-negative finite number".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive_usize {
        ($field:ident) => {
            if c.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: stringify!($field).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(max_suggestions);
    check_positive_usize!(max_cache_size);
    check_non_negative!(max_edit_distance);
    check_non_negative!(history_weight_factor);
    check_threshold(c.fuzzy_match_threshold)?;

    Ok(())
}
