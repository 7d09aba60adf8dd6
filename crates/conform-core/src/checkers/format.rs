//! Detectable format: bullets, highlights, sections, JSON and titles.

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use super::{quoted_list, sample_count, Rule};
use crate::params::{InstructionArgs, InstructionParams};
use crate::relation::ComparisonRelation;
use crate::toolkit::Toolkit;
use crate::InstructionError;

const MAX_NUM_BULLETS: i64 = 5;
const MAX_NUM_HIGHLIGHTS: i64 = 4;
const MAX_NUM_SECTIONS: i64 = 5;

/// Answers a constrained response may contain.
pub const RESPONSE_OPTIONS: [&str; 3] = ["Áno.", "Nie.", "Možno."];

/// Section splitters sampled when none is given.
pub const SECTION_SPLITTERS: [&str; 2] = ["Sekcia", "SEKCIA"];

const JSON_FENCES: [&str; 4] = ["```json", "```Json", "```JSON", "```"];

lazy_static! {
    static ref BULLET: Regex = Regex::new(r"(?m)^\s*\*[^\*].*$").unwrap();
    static ref HIGHLIGHT: Regex = Regex::new(r"\*[^\n\*]*\*").unwrap();
    static ref DOUBLE_HIGHLIGHT: Regex = Regex::new(r"\*\*[^\n\*]*\*\*").unwrap();
    static ref TITLE: Regex = Regex::new(r"<<[^\n]+>>").unwrap();
}

/// Exactly N markdown `*` bullets.
#[derive(Debug, Clone)]
pub struct BulletCount {
    num_bullets: i64,
}

impl Rule for BulletCount {
    const ARGS_KEYS: &'static [&'static str] = &["num_bullets"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self {
            num_bullets: sample_count(params.num_bullets, rng, 1, MAX_NUM_BULLETS),
        })
    }

    fn description(&self) -> String {
        format!(
            "Tvoja odpoveď musí obsahovať presne {} bodov zoznamu. \
             Použi body zoznamu v Markdowne, napríklad:\n\
             * Toto je bod 1. \n\
             * Toto je bod 2",
            self.num_bullets
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(InstructionArgs::new().with("num_bullets", self.num_bullets))
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        BULLET.find_iter(text).count() as i64 == self.num_bullets
    }
}

/// Contains one of [`RESPONSE_OPTIONS`].
#[derive(Debug, Clone, Default)]
pub struct ConstrainedResponse;

impl Rule for ConstrainedResponse {
    const ARGS_KEYS: &'static [&'static str] = &[];

    fn build<R: Rng + ?Sized>(_params: &InstructionParams, _rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self)
    }

    fn description(&self) -> String {
        format!(
            "Odpovedz jednou z nasledujúcich možností: ({})",
            quoted_list(&RESPONSE_OPTIONS)
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        None
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let value = text.trim();
        RESPONSE_OPTIONS.iter().any(|option| value.contains(option))
    }
}

/// At least N highlighted spans, `*like this*` or `**like this**`.
///
/// The relation is realized and reported, but the check is always
/// "at least".
#[derive(Debug, Clone)]
pub struct HighlightCount {
    num_highlights: i64,
    relation: ComparisonRelation,
}

impl Rule for HighlightCount {
    const ARGS_KEYS: &'static [&'static str] = &["num_highlights", "relation"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let num_highlights = sample_count(params.num_highlights, rng, 1, MAX_NUM_HIGHLIGHTS);
        let relation = ComparisonRelation::resolve(params.relation.as_deref(), rng)?;
        Ok(Self {
            num_highlights,
            relation,
        })
    }

    fn description(&self) -> String {
        format!(
            "Zvýrazni {} {} sekcií vo svojej odpovedi pomocou markdownu, napr. *zvýraznená sekcia*.",
            self.relation, self.num_highlights
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(
            InstructionArgs::new()
                .with("num_highlights", self.num_highlights)
                .with("relation", self.relation.as_str()),
        )
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let single = HIGHLIGHT
            .find_iter(text)
            .filter(|m| !m.as_str().trim_matches('*').trim().is_empty())
            .count();
        let double = DOUBLE_HIGHLIGHT
            .find_iter(text)
            .filter(|m| {
                let inner = m.as_str();
                let inner = inner.strip_prefix("**").unwrap_or(inner);
                let inner = inner.strip_suffix("**").unwrap_or(inner);
                !inner.trim().is_empty()
            })
            .count();

        (single + double) as i64 >= self.num_highlights
    }
}

/// At least N sections, each introduced by `<splitter> <number>`.
#[derive(Debug, Clone)]
pub struct SectionCount {
    section_spliter: String,
    num_sections: i64,
    relation: ComparisonRelation,
    pattern: Regex,
}

impl Rule for SectionCount {
    const ARGS_KEYS: &'static [&'static str] = &["section_spliter", "num_sections", "relation"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, rng: &mut R) -> Result<Self, InstructionError> {
        let section_spliter = match params.section_spliter.as_deref() {
            Some(splitter) => splitter.trim().to_string(),
            None => SECTION_SPLITTERS
                .choose(rng)
                .copied()
                .unwrap_or(SECTION_SPLITTERS[0])
                .to_string(),
        };
        let num_sections = sample_count(params.num_sections, rng, 1, MAX_NUM_SECTIONS);
        let relation = ComparisonRelation::resolve(params.relation.as_deref(), rng)?;

        let pattern = Regex::new(&format!(r"\s?{}\s?\d+\s?", regex::escape(&section_spliter)))
            .map_err(|e| InstructionError::InvalidParameter {
                name: "section_spliter",
                reason: e.to_string(),
            })?;

        Ok(Self {
            section_spliter,
            num_sections,
            relation,
            pattern,
        })
    }

    fn description(&self) -> String {
        let splitter = &self.section_spliter;
        format!(
            "Tvoja odpoveď musí mať {} {} sekcií. \
             Označuj začiatok každej sekcie slovom {splitter} X, napríklad:\n\
             {splitter} 1\n\
             [obsah sekcie 1]\n\
             {splitter} 2\n\
             [obsah sekcie 2]",
            self.relation, self.num_sections
        )
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(
            InstructionArgs::new()
                .with("section_spliter", self.section_spliter.as_str())
                .with("num_sections", self.num_sections)
                .with("relation", self.relation.as_str()),
        )
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let sections = self.pattern.split(text).count() as i64 - 1;
        sections >= self.num_sections
    }
}

/// Whole response parses as JSON, optionally inside a code fence.
#[derive(Debug, Clone, Default)]
pub struct JsonFormat;

impl Rule for JsonFormat {
    const ARGS_KEYS: &'static [&'static str] = &[];

    fn build<R: Rng + ?Sized>(_params: &InstructionParams, _rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self)
    }

    fn description(&self) -> String {
        "Celý výstup musí byť vo formáte JSON.".to_string()
    }

    fn args(&self) -> Option<InstructionArgs> {
        None
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let mut value = text.trim();
        for fence in JSON_FENCES {
            value = value.strip_prefix(fence).unwrap_or(value);
        }
        let value = value.strip_suffix("```").unwrap_or(value).trim();

        serde_json::from_str::<serde_json::Value>(value).is_ok()
    }
}

/// A non-empty `<<title>>` somewhere in the response.
#[derive(Debug, Clone, Default)]
pub struct TitlePresence;

impl Rule for TitlePresence {
    const ARGS_KEYS: &'static [&'static str] = &[];

    fn build<R: Rng + ?Sized>(_params: &InstructionParams, _rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self)
    }

    fn description(&self) -> String {
        "Tvoja odpoveď musí obsahovať nadpis obalený v dvojitých uhlových zátvorkách, \
         napríklad <<báseň o radosti>>."
            .to_string()
    }

    fn args(&self) -> Option<InstructionArgs> {
        None
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        TITLE.find_iter(text).any(|m| {
            !m.as_str()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .trim()
                .is_empty()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{rng, toolkit_detecting};
    use super::*;

    #[test]
    fn test_bullets_exact() {
        let checker = BulletCount::build(
            &InstructionParams {
                num_bullets: Some(2),
                ..Default::default()
            },
            &mut rng(),
        )
        .unwrap();
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("Zoznam:\n* prvý\n* druhý", &toolkit));
        assert!(!checker.check_following("* prvý\n* druhý\n* tretí", &toolkit));
        assert!(!checker.check_following("- prvý\n- druhý", &toolkit));
        assert!(checker.check_following("* prvý\n* druhý\n**tučné**", &toolkit));
    }

    #[test]
    fn test_constrained_response() {
        let checker = ConstrainedResponse::build(&InstructionParams::default(), &mut rng()).unwrap();
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("Moja odpoveď je Áno.", &toolkit));
        assert!(checker.check_following("  Možno.  ", &toolkit));
        assert!(!checker.check_following("Áno", &toolkit));
        assert!(checker.args().is_none());
        assert!(checker.description().contains("\"Nie.\""));
    }

    #[test]
    fn test_highlights() {
        let checker = HighlightCount::build(
            &InstructionParams {
                num_highlights: Some(2),
                relation: Some("menej ako".to_string()),
                ..Default::default()
            },
            &mut rng(),
        )
        .unwrap();
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("*prvá* a **druhá**", &toolkit));
        assert!(checker.check_following("*jedna* potom *dva* potom *tri*", &toolkit));
        assert!(!checker.check_following("*jedna* a ** ** prázdne", &toolkit));
    }

    #[test]
    fn test_sections() {
        let checker = SectionCount::build(
            &InstructionParams {
                section_spliter: Some(" Sekcia ".to_string()),
                num_sections: Some(2),
                relation: Some("aspoň".to_string()),
                ..Default::default()
            },
            &mut rng(),
        )
        .unwrap();
        assert_eq!(checker.section_spliter, "Sekcia");

        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("Sekcia 1\nÚvod\nSekcia 2\nJadro", &toolkit));
        assert!(!checker.check_following("Sekcia 1\nIba úvod", &toolkit));
        assert!(!checker.check_following("Sekcia A\nÚvod\nSekcia B\nJadro", &toolkit));
    }

    #[test]
    fn test_sections_sampled_splitter() {
        let checker = SectionCount::build(&InstructionParams::default(), &mut rng()).unwrap();
        assert!(SECTION_SPLITTERS.contains(&checker.section_spliter.as_str()));
        assert!(checker.description().contains(&format!("{} 2", checker.section_spliter)));
    }

    #[test]
    fn test_json() {
        let checker = JsonFormat;
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("{\"a\": 1}", &toolkit));
        assert!(checker.check_following("```json\n{\"a\": [1, 2]}\n```", &toolkit));
        assert!(checker.check_following("```JSON\n[true]\n```", &toolkit));
        assert!(!checker.check_following("{\"a\": 1,}", &toolkit));
        assert!(!checker.check_following("Tu je JSON: {\"a\": 1}", &toolkit));
    }

    #[test]
    fn test_title() {
        let checker = TitlePresence;
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("<<Báseň o radosti>>\nText", &toolkit));
        assert!(!checker.check_following("<<   >>\nText", &toolkit));
        assert!(!checker.check_following("Bez nadpisu", &toolkit));
    }
}
