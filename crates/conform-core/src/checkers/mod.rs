//! The checker family.
//!
//! Each checker owns its realized parameters, renders a description and
//! validates candidate text. The set is closed: [`InstructionKind`] names
//! every checker and [`Checker`] holds a built one.
//!
//! ## Checker Independence
//!
//! - No checker calls into another checker
//! - No shared mutable state; validation never mutates parameters
//! - Language detection failures count as compliance (fail open)

mod case;
mod combination;
mod content;
mod format;
mod keywords;
mod language;
mod length;
mod punctuation;
mod startend;

pub use case::{AllCapsEnglish, AllLowercaseEnglish, CapitalWordFrequency};
pub use combination::{RepeatThenAnswer, TwoResponses};
pub use content::{PlaceholderCount, PostscriptPresence};
pub use format::{BulletCount, ConstrainedResponse, HighlightCount, JsonFormat, SectionCount, TitlePresence};
pub use keywords::{ForbiddenWords, KeywordFrequency, KeywordPresence, LetterFrequency};
pub use language::LanguageMatch;
pub use length::{ParagraphCount, ParagraphFirstWord, SentenceCount, WordCount};
pub use punctuation::NoCommas;
pub use startend::{EndsWithPhrase, QuotedResponse};

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use rand::Rng;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::params::{InstructionArgs, InstructionParams};
use crate::toolkit::Toolkit;
use crate::InstructionError;

/// Contract implemented by every checker.
pub trait Rule: Sized {
    /// Declared parameter names, in reporting order.
    const ARGS_KEYS: &'static [&'static str];

    /// Realize parameters, sampling the ones `params` leaves unset.
    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError>;

    /// The natural-language instruction.
    fn description(&self) -> String;

    /// Realized parameters, `None` for parameterless checkers.
    fn args(&self) -> Option<InstructionArgs>;

    /// Whether `text` complies.
    fn check_following(&self, text: &str, toolkit: &Toolkit) -> bool;
}

lazy_static! {
    /// Leading numbered or bulleted list markers, one per line.
    pub(crate) static ref LIST_MARKERS: Regex =
        Regex::new(r"(?m)(^\s*[\d]+\.\s*)|(^\s*[-*]\s*)").unwrap();
}

/// An explicit non-negative count, or a uniform sample from `low..=high`.
pub(crate) fn sample_count<R: Rng + ?Sized>(explicit: Option<i64>, rng: &mut R, low: i64, high: i64) -> i64 {
    match explicit {
        Some(value) if value >= 0 => value,
        _ => rng.gen_range(low..=high),
    }
}

/// Compile a literal, case-insensitive pattern.
pub(crate) fn literal_pattern(
    name: &'static str,
    literal: &str,
    whole_word: bool,
) -> Result<Regex, InstructionError> {
    let escaped = regex::escape(literal);
    let pattern = if whole_word {
        format!(r"\b{escaped}\b")
    } else {
        escaped
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| InstructionError::InvalidParameter {
            name,
            reason: e.to_string(),
        })
}

/// Render items as `"a", "b"`.
pub(crate) fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

macro_rules! checker_family {
    ($( $(#[$doc:meta])* $variant:ident => $id:literal, )+) => {
        /// Identifies one checker type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum InstructionKind {
            $( $(#[$doc])* $variant, )+
        }

        /// A checker with frozen parameters.
        #[derive(Debug, Clone)]
        pub enum Checker {
            $( $variant($variant), )+
        }

        impl InstructionKind {
            /// Every kind, in registry order.
            pub const ALL: &'static [InstructionKind] = &[ $( InstructionKind::$variant, )+ ];

            /// Stable public identifier, e.g. `keywords:existence`.
            pub fn id(self) -> &'static str {
                match self {
                    $( Self::$variant => $id, )+
                }
            }

            /// Declared parameter names, independent of any realization.
            pub fn args_keys(self) -> &'static [&'static str] {
                match self {
                    $( Self::$variant => <$variant as Rule>::ARGS_KEYS, )+
                }
            }

            /// Look a kind up by its public identifier.
            pub fn from_id(id: &str) -> Result<Self, InstructionError> {
                match id {
                    $( $id => Ok(Self::$variant), )+
                    _ => Err(InstructionError::UnknownInstruction(id.to_string())),
                }
            }
        }

        impl Checker {
            /// Realize a checker of `kind`.
            pub fn build<R: Rng + ?Sized>(
                kind: InstructionKind,
                params: &InstructionParams,
                rng: &mut R,
            ) -> Result<Self, InstructionError> {
                match kind {
                    $( InstructionKind::$variant => $variant::build(params, rng).map(Checker::$variant), )+
                }
            }

            pub fn kind(&self) -> InstructionKind {
                match self {
                    $( Self::$variant(_) => InstructionKind::$variant, )+
                }
            }

            pub fn description(&self) -> String {
                match self {
                    $( Self::$variant(checker) => checker.description(), )+
                }
            }

            pub fn args(&self) -> Option<InstructionArgs> {
                match self {
                    $( Self::$variant(checker) => checker.args(), )+
                }
            }

            pub fn check_following(&self, text: &str, toolkit: &Toolkit) -> bool {
                match self {
                    $( Self::$variant(checker) => checker.check_following(text, toolkit), )+
                }
            }
        }
    };
}

checker_family! {
    /// Whole response in a given language.
    LanguageMatch => "language:response_language",
    /// Number of sentences against a threshold.
    SentenceCount => "length_constraints:number_sentences",
    /// At least N `[placeholder]` spans.
    PlaceholderCount => "detectable_content:number_placeholders",
    /// Exactly N markdown `*` bullets.
    BulletCount => "detectable_format:number_bullet_lists",
    /// One of the fixed yes/no/maybe answers.
    ConstrainedResponse => "detectable_format:constrained_response",
    /// At least N `*highlighted*` spans.
    HighlightCount => "detectable_format:number_highlighted_sections",
    /// At least N `Sekcia X` sections.
    SectionCount => "detectable_format:multiple_sections",
    /// Exactly N paragraphs separated by `***`.
    ParagraphCount => "length_constraints:number_paragraphs",
    /// A postscript starting with a marker.
    PostscriptPresence => "detectable_content:postscript",
    /// Every keyword appears.
    KeywordPresence => "keywords:existence",
    /// One keyword appears a bounded number of times.
    KeywordFrequency => "keywords:frequency",
    /// Number of words against a threshold.
    WordCount => "length_constraints:number_words",
    /// Whole response is JSON.
    JsonFormat => "detectable_format:json_format",
    /// Paragraph count plus the first word of the nth paragraph.
    ParagraphFirstWord => "length_constraints:nth_paragraph_first_word",
    /// None of the words appear.
    ForbiddenWords => "keywords:forbidden_words",
    /// Two different responses separated by `******`.
    TwoResponses => "combination:two_responses",
    /// The prompt is repeated before the answer.
    RepeatThenAnswer => "combination:repeat_prompt",
    /// Response ends with a phrase.
    EndsWithPhrase => "startend:end_checker",
    /// A `<<title>>` is present.
    TitlePresence => "detectable_format:title",
    /// One letter appears a bounded number of times.
    LetterFrequency => "keywords:letter_frequency",
    /// English, all capitals.
    AllCapsEnglish => "change_case:english_capital",
    /// English, all lowercase.
    AllLowercaseEnglish => "change_case:english_lowercase",
    /// No commas.
    NoCommas => "punctuation:no_comma",
    /// Number of all-capital words against a threshold.
    CapitalWordFrequency => "change_case:capital_word_frequency",
    /// Response wrapped in double quotes.
    QuotedResponse => "startend:quotation",
}

impl InstructionKind {
    /// Whether this kind realizes any parameters.
    pub fn has_args(self) -> bool {
        !self.args_keys().is_empty()
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for InstructionKind {
    type Err = InstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

impl Serialize for InstructionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for InstructionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Self::from_id(&id).map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::rng;

    #[test]
    fn test_registry_has_every_kind_once() {
        assert_eq!(InstructionKind::ALL.len(), 25);
        for kind in InstructionKind::ALL {
            assert_eq!(InstructionKind::from_id(kind.id()).unwrap(), *kind);
        }
    }

    #[test]
    fn test_unknown_id() {
        let err = "detectable_format:haiku".parse::<InstructionKind>().unwrap_err();
        assert!(matches!(err, InstructionError::UnknownInstruction(_)));
    }

    #[test]
    fn test_every_kind_builds_with_defaults_except_repeat_prompt() {
        let mut rng = rng();
        for kind in InstructionKind::ALL {
            let result = Checker::build(*kind, &InstructionParams::default(), &mut rng);
            if *kind == InstructionKind::RepeatThenAnswer {
                assert!(matches!(result, Err(InstructionError::MissingParameter(_))));
            } else {
                let checker = result.unwrap();
                assert_eq!(checker.kind(), *kind);
                assert!(!checker.description().is_empty());
            }
        }
    }

    #[test]
    fn test_args_match_declared_keys() {
        let mut rng = rng();
        let params = InstructionParams {
            prompt_to_repeat: Some("Napíš báseň.".to_string()),
            ..Default::default()
        };
        for kind in InstructionKind::ALL {
            let checker = Checker::build(*kind, &params, &mut rng).unwrap();
            match checker.args() {
                Some(args) => assert_eq!(args.keys().collect::<Vec<_>>(), kind.args_keys()),
                None => assert!(!kind.has_args()),
            }
        }
    }

    #[test]
    fn test_kind_serializes_as_id() {
        let json = serde_json::to_string(&InstructionKind::NoCommas).unwrap();
        assert_eq!(json, "\"punctuation:no_comma\"");
        let kind: InstructionKind = serde_json::from_str("\"startend:quotation\"").unwrap();
        assert_eq!(kind, InstructionKind::QuotedResponse);
    }

    #[test]
    fn test_sample_count() {
        let mut rng = rng();
        assert_eq!(sample_count(Some(0), &mut rng, 1, 5), 0);
        assert_eq!(sample_count(Some(7), &mut rng, 1, 5), 7);
        for _ in 0..32 {
            let sampled = sample_count(Some(-1), &mut rng, 1, 5);
            assert!((1..=5).contains(&sampled));
        }
    }

    #[test]
    fn test_literal_pattern_escapes() {
        let pattern = literal_pattern("keyword", "a.b", false).unwrap();
        assert!(pattern.is_match("A.B"));
        assert!(!pattern.is_match("axb"));
    }
}
