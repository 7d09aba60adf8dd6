//! How the response starts and ends.

use rand::seq::SliceRandom;
use rand::Rng;

use super::Rule;
use crate::params::{InstructionArgs, InstructionParams};
use crate::toolkit::Toolkit;
use crate::InstructionError;

/// Phrases sampled when no end phrase is given.
pub const ENDING_OPTIONS: [&str; 3] = [
    "S pozdravom",
    "Potrebujete niečo ďalšie?",
    "Čakám na ďalšie otázky",
];

/// The response ends with a phrase, ignoring case, outer quotes and one
/// trailing period.
#[derive(Debug, Clone)]
pub struct EndsWithPhrase {
    end_phrase: String,
}

impl Rule for EndsWithPhrase {
    const ARGS_KEYS: &'static [&'static str] = &["end_phrase"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let end_phrase = match params.end_phrase.as_deref() {
            Some(phrase) => phrase.trim().to_string(),
            None => ENDING_OPTIONS
                .choose(rng)
                .copied()
                .unwrap_or(ENDING_OPTIONS[0])
                .to_string(),
        };
        Ok(Self { end_phrase })
    }

    fn description(&self) -> String {
        format!(
            "Ukonči svoju odpoveď touto presnou frázou {}. \
             Za touto frázou nesmú nasledovať žiadne ďalšie slová.",
            self.end_phrase
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(InstructionArgs::new().with("end_phrase", self.end_phrase.as_str()))
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let value = text.trim().trim_matches('"').to_lowercase();
        let value = value.strip_suffix('.').unwrap_or(&value);
        value.ends_with(&self.end_phrase.trim().to_lowercase())
    }
}

/// The whole response is wrapped in double quotes.
#[derive(Debug, Clone, Default)]
pub struct QuotedResponse;

impl Rule for QuotedResponse {
    const ARGS_KEYS: &'static [&'static str] = &[];

    fn build<R: Rng + ?Sized>(_params: &InstructionParams, _rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self)
    }

    fn description(&self) -> String {
        "Obal celú svoju odpoveď do úvodzoviek.".to_string()
    }

    fn args(&self) -> Option<InstructionArgs> {
        None
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let value = text.trim();
        value.chars().count() > 1 && value.starts_with('"') && value.ends_with('"')
    }
}
