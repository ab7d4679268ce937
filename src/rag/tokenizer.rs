//! Word tokenization shared by the dataset loader and the ranker

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Lowercase `text` and split it into maximal runs of word characters
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Distinct tokens of `text`
#[must_use]
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}
