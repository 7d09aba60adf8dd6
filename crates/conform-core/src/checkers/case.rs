//! Letter case constraints.

use rand::Rng;

use super::language::detected_as;
use super::Rule;
use crate::params::{InstructionArgs, InstructionParams};
use crate::relation::ComparisonRelation;
use crate::tokenizer::tokenize_words;
use crate::toolkit::Toolkit;
use crate::InstructionError;

const MAX_CAPITAL_FREQUENCY: i64 = 20;

/// At least one cased character, and none of them lowercase.
pub(crate) fn is_all_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

/// At least one cased character, and none of them uppercase.
pub(crate) fn is_all_lower(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            return false;
        }
        cased |= c.is_lowercase();
    }
    cased
}

/// English, in capital letters only.
#[derive(Debug, Clone, Default)]
pub struct AllCapsEnglish;

impl Rule for AllCapsEnglish {
    const ARGS_KEYS: &'static [&'static str] = &[];

    fn build<R: Rng + ?Sized>(_params: &InstructionParams, _rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self)
    }

    fn description(&self) -> String {
        "Celá tvoja odpoveď musí byť v angličtine, iba veľké písmená.".to_string()
    }

    fn args(&self) -> Option<InstructionArgs> {
        None
    }

    fn check_following(&self, text: &str, toolkit: &Toolkit) -> bool {
        is_all_upper(text) && detected_as(toolkit, text, "en")
    }
}

/// English, in lowercase letters only.
#[derive(Debug, Clone, Default)]
pub struct AllLowercaseEnglish;

impl Rule for AllLowercaseEnglish {
    const ARGS_KEYS: &'static [&'static str] = &[];

    fn build<R: Rng + ?Sized>(_params: &InstructionParams, _rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self)
    }

    fn description(&self) -> String {
        "Celá tvoja odpoveď musí byť v angličtine, iba malé písmená. \
         Veľké písmená nie sú povolené."
            .to_string()
    }

    fn args(&self) -> Option<InstructionArgs> {
        None
    }

    fn check_following(&self, text: &str, toolkit: &Toolkit) -> bool {
        is_all_lower(text) && detected_as(toolkit, text, "en")
    }
}

/// Number of all-capital words against a threshold.
///
/// Only a missing frequency is sampled; an explicit negative one is kept.
#[derive(Debug, Clone)]
pub struct CapitalWordFrequency {
    capital_frequency: i64,
    capital_relation: ComparisonRelation,
}

impl Rule for CapitalWordFrequency {
    const ARGS_KEYS: &'static [&'static str] = &["capital_frequency", "capital_relation"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let capital_frequency = params
            .capital_frequency
            .unwrap_or_else(|| rng.gen_range(1..=MAX_CAPITAL_FREQUENCY));
        let capital_relation = ComparisonRelation::resolve(params.capital_relation.as_deref(), rng)?;

        Ok(Self {
            capital_frequency,
            capital_relation,
        })
    }

    fn description(&self) -> String {
        format!(
            "Vo svojej odpovedi by sa slová napísané úplne veľkými písmenami mali objaviť {} {} krát.",
            self.capital_relation, self.capital_frequency
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(
            InstructionArgs::new()
                .with("capital_frequency", self.capital_frequency)
                .with("capital_relation", self.capital_relation.as_str()),
        )
    }

    fn check_following(&self, text: &str, toolkit: &Toolkit) -> bool {
        let capital_words = tokenize_words(toolkit.tokenizer(), text)
            .iter()
            .filter(|word| is_all_upper(word))
            .count() as i64;
        self.capital_relation.compare(capital_words, self.capital_frequency)
    }
}
