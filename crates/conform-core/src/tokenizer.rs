//! Word and sentence tokenization.
//!
//! Checkers treat tokenization as a black box behind [`Tokenizer`]. The
//! default [`UnicodeTokenizer`] follows the UAX #29 word and sentence
//! boundary rules, which work for any language without a model download.

use unicode_segmentation::UnicodeSegmentation;

/// Result of tokenizing a text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenization {
    /// Non-punctuation tokens, in order.
    pub words: Vec<String>,

    /// Number of sentences found by the tokenizer's own segmenter.
    pub sentence_count: usize,
}

/// A language-agnostic word tokenizer and sentence segmenter.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text`.
    fn tokenize(&self, text: &str) -> Tokenization;

    /// Name for logs.
    fn name(&self) -> &str;
}

/// UAX #29 tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeTokenizer;

impl UnicodeTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for UnicodeTokenizer {
    fn tokenize(&self, text: &str) -> Tokenization {
        // The sentence segmenter underflows on input with no content.
        if text.trim().is_empty() {
            return Tokenization::default();
        }

        let words = text.unicode_words().map(str::to_string).collect();
        let sentence_count = text
            .split_sentence_bounds()
            .filter(|s| !s.trim().is_empty())
            .count();

        Tokenization {
            words,
            sentence_count,
        }
    }

    fn name(&self) -> &str {
        "unicode"
    }
}

/// Number of non-punctuation tokens.
pub fn count_words(tokenizer: &dyn Tokenizer, text: &str) -> usize {
    tokenizer.tokenize(text).words.len()
}

/// The non-punctuation tokens themselves.
pub fn tokenize_words(tokenizer: &dyn Tokenizer, text: &str) -> Vec<String> {
    tokenizer.tokenize(text).words
}

/// Sentence count from the tokenizer's segmenter, not from
/// [`crate::sentences::split_into_sentences`].
pub fn count_sentences(tokenizer: &dyn Tokenizer, text: &str) -> usize {
    tokenizer.tokenize(text).sentence_count
}
