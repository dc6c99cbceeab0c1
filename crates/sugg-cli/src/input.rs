//! Loading datasets, history, weights and settings for the CLI.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use sugg_core::settings::{parse_settings_toml, SettingsError};
use sugg_core::{SuggestConfig, SuggestError, SuggestionEngine};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Suggest(#[from] SuggestError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// One item per line; blank lines and `#` comments are skipped.
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn read_list(path: &Path) -> Result<Vec<String>, CliError> {
    let text = fs::read_to_string(path)?;
    let items = parse_list(&text);
    debug!(path = %path.display(), items = items.len(), "list loaded");
    Ok(items)
}

/// Parse `ITEM=WEIGHT`. The split is on the last `=` so items may contain `=`.
pub fn parse_weight(spec: &str) -> Result<(String, f64), CliError> {
    let (item, weight) = spec
        .rsplit_once('=')
        .ok_or_else(|| CliError::InvalidArgument(format!("expected ITEM=WEIGHT, got {spec:?}")))?;
    if item.is_empty() {
        return Err(CliError::InvalidArgument(format!("empty item in {spec:?}")));
    }
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("weight is not a number in {spec:?}")))?;
    Ok((item.to_string(), weight))
}

pub fn load_config(path: Option<&Path>) -> Result<SuggestConfig, CliError> {
    match path {
        Some(p) => Ok(parse_settings_toml(&fs::read_to_string(p)?)?),
        None => Ok(SuggestConfig::default()),
    }
}

/// Everything needed to stand up an engine from files on disk.
#[derive(Debug, Default)]
pub struct EngineOptions<'a> {
    pub dataset: Option<&'a Path>,
    pub config: Option<&'a Path>,
    pub history: Option<&'a Path>,
    pub weights: Vec<String>,
    pub exclude: Vec<String>,
    pub max_suggestions: Option<usize>,
}

pub fn build_engine(opts: &EngineOptions<'_>) -> Result<SuggestionEngine, CliError> {
    let mut config = load_config(opts.config)?;
    if let Some(n) = opts.max_suggestions {
        config.max_suggestions = n;
    }
    let dataset = match opts.dataset {
        Some(p) => read_list(p)?,
        None => Vec::new(),
    };
    let engine = SuggestionEngine::new(dataset, config)?;

    if let Some(p) = opts.history {
        engine.update_from_history(read_list(p)?);
    }
    for spec in &opts.weights {
        let (item, weight) = parse_weight(spec)?;
        engine.set_weight(&item, weight);
    }
    if !opts.exclude.is_empty() {
        let excluded = opts.exclude.clone();
        engine.add_filter(move |item| !excluded.iter().any(|e| e == item));
    }
    Ok(engine)
}
