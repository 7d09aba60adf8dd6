//! Keyword constraints.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use super::{literal_pattern, quoted_list, sample_count, Rule};
use crate::params::{InstructionArgs, InstructionParams};
use crate::relation::ComparisonRelation;
use crate::toolkit::Toolkit;
use crate::vocabulary::{generate_keyword, generate_keywords};
use crate::InstructionError;

const NUM_KEYWORDS: usize = 2;
const MAX_KEYWORD_FREQUENCY: i64 = 3;
const MAX_LETTER_FREQUENCY: i64 = 20;
const ASCII_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Every keyword appears, case-insensitively.
#[derive(Debug, Clone)]
pub struct KeywordPresence {
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

impl Rule for KeywordPresence {
    const ARGS_KEYS: &'static [&'static str] = &["keywords"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let mut keywords = match &params.keywords {
            Some(keywords) if !keywords.is_empty() => keywords.clone(),
            _ => generate_keywords(rng, NUM_KEYWORDS),
        };
        keywords.sort();

        let patterns = keywords
            .iter()
            .map(|keyword| literal_pattern("keywords", keyword, false))
            .collect::<Result<_, _>>()?;

        Ok(Self { keywords, patterns })
    }

    fn description(&self) -> String {
        format!(
            "Zahrň kľúčové slová [{}] do svojej odpovede.",
            quoted_list(&self.keywords)
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(InstructionArgs::new().with("keywords", self.keywords.clone()))
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        self.patterns.iter().all(|pattern| pattern.is_match(text))
    }
}

/// One keyword appears a bounded number of times.
#[derive(Debug, Clone)]
pub struct KeywordFrequency {
    keyword: String,
    frequency: i64,
    relation: ComparisonRelation,
    pattern: Regex,
}

impl Rule for KeywordFrequency {
    const ARGS_KEYS: &'static [&'static str] = &["keyword", "frequency", "relation"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let keyword = match params.keyword.as_deref() {
            Some(keyword) if !keyword.is_empty() => keyword.trim().to_string(),
            _ => generate_keyword(rng),
        };
        let frequency = sample_count(params.frequency, rng, 1, MAX_KEYWORD_FREQUENCY);
        let relation = ComparisonRelation::resolve(params.relation.as_deref(), rng)?;
        let pattern = literal_pattern("keyword", &keyword, false)?;

        Ok(Self {
            keyword,
            frequency,
            relation,
            pattern,
        })
    }

    fn description(&self) -> String {
        format!(
            "V odpovedi sa musí slovo {} objaviť {} {} krát.",
            self.keyword, self.relation, self.frequency
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(
            InstructionArgs::new()
                .with("keyword", self.keyword.as_str())
                .with("frequency", self.frequency)
                .with("relation", self.relation.as_str()),
        )
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let occurrences = self.pattern.find_iter(text).count() as i64;
        self.relation.compare(occurrences, self.frequency)
    }
}

/// None of the words appear as whole words.
#[derive(Debug, Clone)]
pub struct ForbiddenWords {
    forbidden_words: Vec<String>,
    patterns: Vec<Regex>,
}

impl Rule for ForbiddenWords {
    const ARGS_KEYS: &'static [&'static str] = &["forbidden_words"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let mut forbidden_words = match &params.forbidden_words {
            Some(words) if !words.is_empty() => words.clone(),
            _ => generate_keywords(rng, NUM_KEYWORDS),
        };
        forbidden_words.sort();
        forbidden_words.dedup();

        let patterns = forbidden_words
            .iter()
            .map(|word| literal_pattern("forbidden_words", word, true))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            forbidden_words,
            patterns,
        })
    }

    fn description(&self) -> String {
        format!(
            "Nepoužívaj kľúčové slová [{}] vo svojej odpovedi.",
            quoted_list(&self.forbidden_words)
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(InstructionArgs::new().with("forbidden_words", self.forbidden_words.clone()))
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        !self.patterns.iter().any(|pattern| pattern.is_match(text))
    }
}

/// One ASCII letter appears a bounded number of times, ignoring case.
#[derive(Debug, Clone)]
pub struct LetterFrequency {
    letter: char,
    let_frequency: i64,
    let_relation: ComparisonRelation,
}

impl LetterFrequency {
    fn realize_letter<R: Rng + ?Sized>(given: Option<&str>, rng: &mut R) -> char {
        let mut chars = given.unwrap_or_default().chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_alphabetic() => letter.to_ascii_lowercase(),
            _ => {
                let letter = ASCII_LETTERS.choose(rng).copied().unwrap_or(b'a');
                (letter as char).to_ascii_lowercase()
            }
        }
    }
}

impl Rule for LetterFrequency {
    const ARGS_KEYS: &'static [&'static str] = &["letter", "let_frequency", "let_relation"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let letter = Self::realize_letter(params.letter.as_deref(), rng);
        let let_frequency = sample_count(params.let_frequency, rng, 1, MAX_LETTER_FREQUENCY);
        let let_relation = ComparisonRelation::resolve(params.let_relation.as_deref(), rng)?;

        Ok(Self {
            letter,
            let_frequency,
            let_relation,
        })
    }

    fn description(&self) -> String {
        format!(
            "Vo svojej odpovedi by sa písmeno {} malo objaviť {} {} krát.",
            self.letter, self.let_relation, self.let_frequency
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(
            InstructionArgs::new()
                .with("letter", self.letter.to_string())
                .with("let_frequency", self.let_frequency)
                .with("let_relation", self.let_relation.as_str()),
        )
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let occurrences = text
            .to_lowercase()
            .chars()
            .filter(|c| *c == self.letter)
            .count() as i64;
        self.let_relation.compare(occurrences, self.let_frequency)
    }
}
