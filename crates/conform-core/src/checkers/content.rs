//! Detectable content: placeholders and postscripts.

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use super::{sample_count, Rule};
use crate::params::{InstructionArgs, InstructionParams};
use crate::toolkit::Toolkit;
use crate::InstructionError;

const MAX_NUM_PLACEHOLDERS: i64 = 4;

/// Markers a postscript may start with.
pub const POSTSCRIPT_MARKERS: [&str; 2] = ["P.S.", "P.P.S"];

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\[.*?\]").unwrap();
}

/// At least N square-bracketed placeholders such as `[adresa]`.
#[derive(Debug, Clone)]
pub struct PlaceholderCount {
    num_placeholders: i64,
}

impl Rule for PlaceholderCount {
    const ARGS_KEYS: &'static [&'static str] = &["num_placeholders"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self {
            num_placeholders: sample_count(params.num_placeholders, rng, 1, MAX_NUM_PLACEHOLDERS),
        })
    }

    fn description(&self) -> String {
        format!(
            "Odpoveď musí obsahovať aspoň {} zástupných symbolov reprezentovaných \
             hranatými zátvorkami, napríklad [adresa].",
            self.num_placeholders
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(InstructionArgs::new().with("num_placeholders", self.num_placeholders))
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        PLACEHOLDER.find_iter(text).count() as i64 >= self.num_placeholders
    }
}

/// A postscript starting with a marker, at the start of some line.
#[derive(Debug, Clone)]
pub struct PostscriptPresence {
    marker: String,
    pattern: Regex,
}

impl PostscriptPresence {
    fn pattern_for(marker: &str) -> Result<Regex, InstructionError> {
        let pattern = match marker {
            "P.S." => r"(?m)^\s*p\.\s?s\..*$".to_string(),
            "P.P.S" => r"(?m)^\s*p\.\s?p\.\s?s[.]?.*$".to_string(),
            other => format!(r"(?m)^\s*{}.*$", regex::escape(&other.to_lowercase())),
        };
        Regex::new(&pattern).map_err(|e| InstructionError::InvalidParameter {
            name: "postscript_marker",
            reason: e.to_string(),
        })
    }
}

impl Rule for PostscriptPresence {
    const ARGS_KEYS: &'static [&'static str] = &["postscript_marker"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let marker = match params.postscript_marker.as_deref() {
            Some(marker) => marker.trim().to_string(),
            None => POSTSCRIPT_MARKERS
                .choose(rng)
                .copied()
                .unwrap_or(POSTSCRIPT_MARKERS[0])
                .to_string(),
        };
        let pattern = Self::pattern_for(&marker)?;
        Ok(Self { marker, pattern })
    }

    fn description(&self) -> String {
        format!(
            "Na konci odpovede, prosím, explicitne pridaj postskriptum začínajúce slovom {}",
            self.marker
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(InstructionArgs::new().with("postscript_marker", self.marker.as_str()))
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        self.pattern.is_match(&text.to_lowercase())
    }
}
