//! Length constraints: sentences, words and paragraphs.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

use super::{sample_count, Rule, LIST_MARKERS};
use crate::params::{InstructionArgs, InstructionParams};
use crate::relation::ComparisonRelation;
use crate::sentences::split_into_sentences;
use crate::tokenizer::count_words;
use crate::toolkit::Toolkit;
use crate::vocabulary::generate_keyword;
use crate::InstructionError;

const MAX_NUM_SENTENCES: i64 = 20;
const MAX_NUM_PARAGRAPHS: i64 = 5;
const NUM_WORDS_LOWER_LIMIT: i64 = 1;
const NUM_WORDS_UPPER_LIMIT: i64 = 500;

lazy_static! {
    static ref PARAGRAPH_SEPARATOR: Regex = Regex::new(r"\s?\*\*\*\s?").unwrap();
}

/// Number of sentences against a threshold.
#[derive(Debug, Clone)]
pub struct SentenceCount {
    num_sentences: i64,
    relation: ComparisonRelation,
}

impl Rule for SentenceCount {
    const ARGS_KEYS: &'static [&'static str] = &["num_sentences", "relation"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let num_sentences = sample_count(params.num_sentences, rng, 1, MAX_NUM_SENTENCES);
        let relation = ComparisonRelation::resolve(params.relation.as_deref(), rng)?;
        Ok(Self {
            num_sentences,
            relation,
        })
    }

    fn description(&self) -> String {
        format!(
            "Tvoja odpoveď musí obsahovať {} {} viet.",
            self.relation, self.num_sentences
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(
            InstructionArgs::new()
                .with("num_sentences", self.num_sentences)
                .with("relation", self.relation.as_str()),
        )
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let cleaned = LIST_MARKERS.replace_all(text, "");
        let count = split_into_sentences(&cleaned).len() as i64;
        self.relation.compare(count, self.num_sentences)
    }
}

/// Number of words against a threshold.
#[derive(Debug, Clone)]
pub struct WordCount {
    num_words: i64,
    relation: ComparisonRelation,
}

impl Rule for WordCount {
    const ARGS_KEYS: &'static [&'static str] = &["num_words", "relation"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let num_words = sample_count(
            params.num_words,
            rng,
            NUM_WORDS_LOWER_LIMIT,
            NUM_WORDS_UPPER_LIMIT,
        );
        let relation = ComparisonRelation::resolve(params.relation.as_deref(), rng)?;
        Ok(Self {
            num_words,
            relation,
        })
    }

    fn description(&self) -> String {
        format!("Odpovedz {} {} slovami.", self.relation, self.num_words)
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(
            InstructionArgs::new()
                .with("num_words", self.num_words)
                .with("relation", self.relation.as_str()),
        )
    }

    fn check_following(&self, text: &str, toolkit: &Toolkit) -> bool {
        let cleaned = LIST_MARKERS.replace_all(text, "").replace('\n', " ");
        let count = count_words(toolkit.tokenizer(), &cleaned) as i64;
        self.relation.compare(count, self.num_words)
    }
}

/// Exactly N paragraphs separated by `***`.
#[derive(Debug, Clone)]
pub struct ParagraphCount {
    num_paragraphs: i64,
}

impl Rule for ParagraphCount {
    const ARGS_KEYS: &'static [&'static str] = &["num_paragraphs"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self {
            num_paragraphs: sample_count(params.num_paragraphs, rng, 1, MAX_NUM_PARAGRAPHS),
        })
    }

    fn description(&self) -> String {
        format!(
            "Musí byť {} odsekov. Odseky sú oddelené oddeľovačom markdownu: ***",
            self.num_paragraphs
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(InstructionArgs::new().with("num_paragraphs", self.num_paragraphs))
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let paragraphs: Vec<&str> = PARAGRAPH_SEPARATOR.split(text).collect();
        let last = paragraphs.len().saturating_sub(1);
        let mut count = paragraphs.len() as i64;

        for (index, paragraph) in paragraphs.iter().enumerate() {
            if paragraph.trim().is_empty() {
                // Empty edges come from a leading or trailing separator
                if index == 0 || index == last {
                    count -= 1;
                } else {
                    return false;
                }
            }
        }

        count == self.num_paragraphs
    }
}

/// Paragraph count plus the first word of the nth paragraph.
///
/// Paragraphs are separated by a blank line (`\n\n`). Comparison ignores
/// case and ASCII punctuation.
#[derive(Debug, Clone)]
pub struct ParagraphFirstWord {
    num_paragraphs: i64,
    nth_paragraph: i64,
    first_word: String,
}

impl Rule for ParagraphFirstWord {
    const ARGS_KEYS: &'static [&'static str] = &["num_paragraphs", "nth_paragraph", "first_word"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let num_paragraphs = sample_count(params.num_paragraphs, rng, 1, MAX_NUM_PARAGRAPHS);
        let nth_paragraph = match params.nth_paragraph {
            Some(nth) if nth > 0 && nth <= num_paragraphs => nth,
            _ => rng.gen_range(1..=num_paragraphs.saturating_add(1)),
        };
        let first_word = params
            .first_word
            .clone()
            .unwrap_or_else(|| generate_keyword(rng))
            .to_lowercase();

        Ok(Self {
            num_paragraphs,
            nth_paragraph,
            first_word,
        })
    }

    fn description(&self) -> String {
        format!(
            "Musí byť {} odsekov. Odseky a len odseky sú od seba oddelené dvoma \
             zlomami riadkov. Odsek {} musí začínať slovom {}.",
            self.num_paragraphs, self.nth_paragraph, self.first_word
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(
            InstructionArgs::new()
                .with("num_paragraphs", self.num_paragraphs)
                .with("nth_paragraph", self.nth_paragraph)
                .with("first_word", self.first_word.as_str()),
        )
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let paragraphs: Vec<&str> = text.split("\n\n").collect();
        let count = paragraphs.iter().filter(|p| !p.trim().is_empty()).count() as i64;

        if self.nth_paragraph > count {
            return false;
        }
        let paragraph = paragraphs[(self.nth_paragraph - 1) as usize].trim();
        if paragraph.is_empty() {
            return false;
        }

        let expected: Vec<&str> = self.first_word.split_whitespace().collect();
        let words: Vec<String> = paragraph
            .split_whitespace()
            .map(|word| {
                word.chars()
                    .filter(|c| !c.is_ascii_punctuation())
                    .collect::<String>()
                    .to_lowercase()
            })
            .collect();
        if words.len() < expected.len() {
            return false;
        }

        let starts_with_word = words.iter().zip(&expected).all(|(word, want)| word == want);
        count == self.num_paragraphs && starts_with_word
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{rng, toolkit_detecting};
    use super::*;

    fn params() -> InstructionParams {
        InstructionParams::default()
    }

    #[test]
    fn test_sentence_count_at_least() {
        let checker = SentenceCount::build(
            &InstructionParams {
                num_sentences: Some(2),
                relation: Some("aspoň".to_string()),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("Prvá veta. Druhá veta. Tretia veta.", &toolkit));
        assert!(!checker.check_following("Len jedna veta.", &toolkit));
    }

    #[test]
    fn test_sentence_count_at_most_ignores_list_markers() {
        let checker = SentenceCount::build(
            &InstructionParams {
                num_sentences: Some(2),
                relation: Some("menej ako".to_string()),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("1. Prvý bod\n2. Druhý bod", &toolkit));
        assert!(!checker.check_following("Jedna. Dva. Tri.", &toolkit));
    }

    #[test]
    fn test_sentence_count_rejects_bad_relation() {
        let result = SentenceCount::build(
            &InstructionParams {
                relation: Some("presne".to_string()),
                ..params()
            },
            &mut rng(),
        );
        assert!(matches!(result, Err(InstructionError::InvalidRelation { .. })));
    }

    #[test]
    fn test_sentence_count_samples_threshold() {
        let mut rng = rng();
        for _ in 0..32 {
            let checker = SentenceCount::build(&params(), &mut rng).unwrap();
            assert!((1..=MAX_NUM_SENTENCES).contains(&checker.num_sentences));
        }
    }

    #[test]
    fn test_word_count() {
        let checker = WordCount::build(
            &InstructionParams {
                num_words: Some(5),
                relation: Some("menej ako".to_string()),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("Toto je krátka odpoveď.", &toolkit));
        assert!(!checker.check_following(
            "Toto je o niečo dlhšia odpoveď so siedmimi slovami.",
            &toolkit
        ));
    }

    #[test]
    fn test_word_count_alias_relation() {
        let checker = WordCount::build(
            &InstructionParams {
                num_words: Some(3),
                relation: Some("minimálne".to_string()),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        assert_eq!(checker.relation, ComparisonRelation::AtLeast);
        assert!(checker.description().contains("aspoň 3"));
    }

    #[test]
    fn test_word_count_blank_and_marker_only_text() {
        let toolkit = toolkit_detecting("sk");
        let at_least = WordCount::build(
            &InstructionParams {
                num_words: Some(1),
                relation: Some("aspoň".to_string()),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        assert!(!at_least.check_following("", &toolkit));
        assert!(!at_least.check_following("1. \n2. ", &toolkit));

        let at_most = WordCount::build(
            &InstructionParams {
                num_words: Some(1),
                relation: Some("menej ako".to_string()),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        assert!(at_most.check_following("", &toolkit));
        assert!(at_most.check_following("- \n* ", &toolkit));
    }

    #[test]
    fn test_paragraph_count() {
        let checker = ParagraphCount::build(
            &InstructionParams {
                num_paragraphs: Some(2),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("Prvý odsek.\n***\nDruhý odsek.", &toolkit));
        assert!(checker.check_following("***\nPrvý.\n***\nDruhý.\n***", &toolkit));
        assert!(!checker.check_following("Prvý.\n***\n\n***\nDruhý.", &toolkit));
        assert!(!checker.check_following("Iba jeden odsek.", &toolkit));
    }

    #[test]
    fn test_paragraph_count_empty_text() {
        let checker = ParagraphCount::build(
            &InstructionParams {
                num_paragraphs: Some(0),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        assert!(checker.check_following("", &toolkit_detecting("sk")));
    }

    #[test]
    fn test_paragraph_first_word() {
        let checker = ParagraphFirstWord::build(
            &InstructionParams {
                num_paragraphs: Some(2),
                nth_paragraph: Some(2),
                first_word: Some("Potom".to_string()),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        assert_eq!(checker.first_word, "potom");

        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("Najprv úvod.\n\nPotom, záver.", &toolkit));
        assert!(checker.check_following("Najprv úvod.\n\n\"Potom\" záver.", &toolkit));
        assert!(!checker.check_following("Najprv úvod.\n\nNakoniec záver.", &toolkit));
        assert!(!checker.check_following("Najprv.\n\nPotom.\n\nEšte.", &toolkit));
        assert!(!checker.check_following("Iba jeden odsek.", &toolkit));
    }

    #[test]
    fn test_paragraph_first_word_resamples_out_of_range_nth() {
        let mut rng = rng();
        for _ in 0..32 {
            let checker = ParagraphFirstWord::build(
                &InstructionParams {
                    num_paragraphs: Some(3),
                    nth_paragraph: Some(7),
                    ..params()
                },
                &mut rng,
            )
            .unwrap();
            assert!((1..=4).contains(&checker.nth_paragraph));
        }
    }

    #[test]
    fn test_paragraph_first_word_huge_count() {
        let checker = ParagraphFirstWord::build(
            &InstructionParams {
                num_paragraphs: Some(i64::MAX),
                ..params()
            },
            &mut rng(),
        )
        .unwrap();
        assert_eq!(checker.num_paragraphs, i64::MAX);
        assert!(checker.nth_paragraph >= 1);
    }

    #[test]
    fn test_args_keys() {
        let checker = ParagraphFirstWord::build(&params(), &mut rng()).unwrap();
        let args = checker.args().unwrap();
        assert_eq!(
            args.keys().collect::<Vec<_>>(),
            ParagraphFirstWord::ARGS_KEYS
        );
    }
}
