//! Composite relevance score.
//!
//! ```text
//! final = (advanced + match) * 1/(distance + 1) * weight * history_boost
//! ```

use crate::matcher::{char_position, ratio};

const EXACT_SCORE: f64 = 10.0;
const PREFIX_BONUS: f64 = 5.0;
const CONTAINS_BONUS: f64 = 3.0;
const LENGTH_BONUS: f64 = 2.0;

/// Relevance of `item` for `input` independent of the match type.
/// Both strings are normalized; lengths are in chars.
pub fn advanced_score(input: &str, input_len: usize, item: &str, item_len: usize) -> f64 {
    if input == item {
        return EXACT_SCORE;
    }

    let mut score = 0.0;
    if item.starts_with(input) {
        score += PREFIX_BONUS;
    }
    if let Some(pos) = char_position(item, input) {
        score += CONTAINS_BONUS * (1.0 - ratio(pos, item_len));
    }
    score += LENGTH_BONUS * ratio(input_len.min(item_len), input_len.max(item_len));
    score
}

/// `1 / (distance + 1)`
pub fn edit_score(distance: usize) -> f64 {
    1.0 / (distance as f64 + 1.0)
}

pub struct ScoreParts {
    pub advanced: f64,
    pub match_score: f64,
    pub distance: usize,
    pub weight: f64,
    pub history_boost: f64,
}

impl ScoreParts {
    pub fn total(&self) -> f64 {
        (self.advanced + self.match_score)
            * edit_score(self.distance)
            * self.weight
            * self.history_boost
    }
}

/// Map a composite score onto `[0, 1)` for display.
pub fn confidence(score: f64) -> f64 {
    if score <= 0.0 {
        0.0
    } else {
        score / (score + 1.0)
    }
}
