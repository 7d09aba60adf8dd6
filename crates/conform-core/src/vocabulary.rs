//! Keyword sampling for instructions built without explicit keywords.

use rand::seq::SliceRandom;
use rand::Rng;

/// Vocabulary keywords are drawn from.
pub const WORD_LIST: &[&str] = &[
    "priateľ", "jedlo", "škola", "dom", "rodina", "práca", "čas", "kniha", "mesto", "pes",
];

/// Draw `count` distinct keywords, capped at the vocabulary size.
pub fn generate_keywords<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    let mut words: Vec<String> = WORD_LIST
        .choose_multiple(rng, count)
        .map(|w| w.to_string())
        .collect();
    words.shuffle(rng);
    words
}

/// Draw a single keyword.
pub fn generate_keyword<R: Rng + ?Sized>(rng: &mut R) -> String {
    WORD_LIST
        .choose(rng)
        .map(|w| w.to_string())
        .unwrap_or_default()
}
