//! Response language.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use super::Rule;
use crate::languages::{language_name, LANGUAGE_CODES};
use crate::params::{InstructionArgs, InstructionParams};
use crate::toolkit::Toolkit;
use crate::InstructionError;

/// Whether `text` is detected as `expected`.
///
/// A detection failure counts as a match and is logged.
pub(crate) fn detected_as(toolkit: &Toolkit, text: &str, expected: &str) -> bool {
    match toolkit.detector().detect(text) {
        Ok(code) => code == expected,
        Err(e) => {
            warn!(
                detector = toolkit.detector().name(),
                expected,
                error = %e,
                "language detection failed, assuming compliance"
            );
            true
        }
    }
}

/// The whole response is in one language.
#[derive(Debug, Clone)]
pub struct LanguageMatch {
    language: String,
}

impl Rule for LanguageMatch {
    const ARGS_KEYS: &'static [&'static str] = &["language"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let language = match params.language.as_deref() {
            Some(code) if language_name(code).is_some() => code.to_string(),
            Some(code) => return Err(InstructionError::UnsupportedLanguage(code.to_string())),
            None => LANGUAGE_CODES
                .choose(rng)
                .map(|(code, _)| code.to_string())
                .unwrap_or_else(|| "sk".to_string()),
        };
        Ok(Self { language })
    }

    fn description(&self) -> String {
        format!(
            "Celá tvoja odpoveď musí byť v jazyku {}, žiadny iný jazyk nie je povolený.",
            language_name(&self.language).unwrap_or(self.language.as_str())
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(InstructionArgs::new().with("language", self.language.as_str()))
    }

    fn check_following(&self, text: &str, toolkit: &Toolkit) -> bool {
        detected_as(toolkit, text, &self.language)
    }
}
