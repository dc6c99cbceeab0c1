//! Match strategies and their base scores.

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::index::IndexEntry;

/// Score awarded to every regex hit.
const REGEX_MATCH_SCORE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Prefix,
    Substring,
    Fuzzy,
    Regex,
}

impl MatchType {
    pub const ALL: [MatchType; 4] = [Self::Prefix, Self::Substring, Self::Fuzzy, Self::Regex];

    /// Human-readable label used in suggestion details.
    pub fn label(self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Substring => "substring",
            Self::Fuzzy => "fuzzy",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown match type: {0}")]
pub struct ParseMatchTypeError(String);

impl FromStr for MatchType {
    type Err = ParseMatchTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "substring" => Ok(Self::Substring),
            "fuzzy" => Ok(Self::Fuzzy),
            "regex" => Ok(Self::Regex),
            _ => Err(ParseMatchTypeError(s.to_string())),
        }
    }
}

/// A query prepared for one match type: the normalized input plus, for
/// regex queries, the compiled pattern (`None` when it failed to compile).
pub struct Matcher<'q> {
    match_type: MatchType,
    input: &'q str,
    input_len: usize,
    max_edit_distance: f64,
    regex: Option<Regex>,
}

impl<'q> Matcher<'q> {
    /// `input` is the normalized query; `raw` is what the caller typed and is
    /// what regex queries compile from.
    pub fn new(
        match_type: MatchType,
        input: &'q str,
        raw: &str,
        case_sensitive: bool,
        max_edit_distance: f64,
    ) -> Self {
        let regex = match match_type {
            MatchType::Regex => match RegexBuilder::new(raw)
                .case_insensitive(!case_sensitive)
                .build()
            {
                Ok(re) => Some(re),
                Err(e) => {
                    debug!(pattern = raw, error = %e, "regex did not compile, no matches");
                    None
                }
            },
            _ => None,
        };
        Self {
            match_type,
            input,
            input_len: input.chars().count(),
            max_edit_distance,
            regex,
        }
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// Base match score when `entry` is eligible, `None` otherwise.
    /// `distance` is the edit distance between the query and the entry.
    pub fn match_score(&self, entry: &IndexEntry, distance: usize) -> Option<f64> {
        let item = entry.normalized.as_str();
        let item_len = entry.chars.len();
        match self.match_type {
            MatchType::Prefix => {
                if !item.starts_with(self.input) {
                    return None;
                }
                Some(1.0 + (1.0 - ratio(self.input_len, item_len)))
            }
            MatchType::Substring => {
                let pos = char_position(item, self.input)?;
                Some(0.9 + 0.1 * (1.0 - ratio(pos, item_len)))
            }
            MatchType::Fuzzy => fuzzy_score(distance, self.max_edit_distance),
            MatchType::Regex => {
                let re = self.regex.as_ref()?;
                re.is_match(&entry.original).then_some(REGEX_MATCH_SCORE)
            }
        }
    }
}

/// `0.8 * (1 - distance / (max + 1))` when within `max`, `None` beyond it.
pub fn fuzzy_score(distance: usize, max_edit_distance: f64) -> Option<f64> {
    let d = distance as f64;
    if d > max_edit_distance {
        return None;
    }
    Some(0.8 * (1.0 - d / (max_edit_distance + 1.0)))
}

/// Char index of the first occurrence of `needle` in `haystack`.
pub fn char_position(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|byte_pos| haystack[..byte_pos].chars().count())
}

/// `num / den`, treating an empty denominator as a zero ratio.
pub(crate) fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
