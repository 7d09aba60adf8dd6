//! Comparison relations used by count-based instructions.
//!
//! Only two relations exist. The literals are the ones rendered into
//! instruction descriptions, so they are in the instructions' target
//! language: "aspoň" (at least) and "menej ako" (at most). One alias,
//! "minimálne", is accepted for "aspoň".

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::InstructionError;

/// Literal for [`ComparisonRelation::AtLeast`].
pub const AT_LEAST: &str = "aspoň";

/// Literal for [`ComparisonRelation::AtMost`].
pub const AT_MOST: &str = "menej ako";

/// The only accepted synonym. It maps to [`AT_LEAST`].
pub const AT_LEAST_ALIAS: &str = "minimálne";

/// The canonical literals, in declaration order.
pub const RELATION_LITERALS: [&str; 2] = [AT_LEAST, AT_MOST];

/// A two-valued relation between a measured quantity and a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ComparisonRelation {
    AtLeast,
    AtMost,
}

impl ComparisonRelation {
    /// Map the alias to the canonical "at least" literal.
    ///
    /// Every other input, including `None`, passes through unchanged.
    pub fn normalize(token: Option<&str>) -> Option<&str> {
        match token {
            Some(AT_LEAST_ALIAS) => Some(AT_LEAST),
            other => other,
        }
    }

    /// Parse a canonical literal (after alias normalization).
    pub fn parse(token: &str) -> Result<Self, InstructionError> {
        match Self::normalize(Some(token)) {
            Some(AT_LEAST) => Ok(Self::AtLeast),
            Some(AT_MOST) => Ok(Self::AtMost),
            _ => Err(InstructionError::InvalidRelation {
                given: token.to_string(),
            }),
        }
    }

    /// Resolve an optional literal, choosing uniformly when it is unset.
    pub fn resolve<R: Rng + ?Sized>(
        token: Option<&str>,
        rng: &mut R,
    ) -> Result<Self, InstructionError> {
        match token {
            None => Ok(if rng.gen_bool(0.5) {
                Self::AtLeast
            } else {
                Self::AtMost
            }),
            Some(token) => Self::parse(token),
        }
    }

    /// The literal rendered into descriptions and reported in args.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtLeast => AT_LEAST,
            Self::AtMost => AT_MOST,
        }
    }

    /// Whether `actual` satisfies this relation against `threshold`.
    pub fn compare(&self, actual: i64, threshold: i64) -> bool {
        match self {
            Self::AtLeast => actual >= threshold,
            Self::AtMost => actual <= threshold,
        }
    }
}

impl fmt::Display for ComparisonRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ComparisonRelation {
    type Error = InstructionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ComparisonRelation> for String {
    fn from(value: ComparisonRelation) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_normalize_alias_only() {
        assert_eq!(ComparisonRelation::normalize(Some("minimálne")), Some(AT_LEAST));
        assert_eq!(ComparisonRelation::normalize(Some("menej ako")), Some(AT_MOST));
        assert_eq!(ComparisonRelation::normalize(Some("najviac")), Some("najviac"));
        assert_eq!(ComparisonRelation::normalize(None), None);
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(ComparisonRelation::parse("aspoň").unwrap(), ComparisonRelation::AtLeast);
        assert_eq!(ComparisonRelation::parse("minimálne").unwrap(), ComparisonRelation::AtLeast);
        assert_eq!(ComparisonRelation::parse("menej ako").unwrap(), ComparisonRelation::AtMost);
    }

    #[test]
    fn test_parse_unknown_names_value() {
        let err = ComparisonRelation::parse("presne").unwrap_err();
        assert!(err.to_string().contains("presne"));
    }

    #[test]
    fn test_resolve_unset_yields_both() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut seen_least = false;
        let mut seen_most = false;
        for _ in 0..64 {
            match ComparisonRelation::resolve(None, &mut rng).unwrap() {
                ComparisonRelation::AtLeast => seen_least = true,
                ComparisonRelation::AtMost => seen_most = true,
            }
        }
        assert!(seen_least && seen_most);
    }

    #[test]
    fn test_threshold_boundary_satisfies_both() {
        assert!(ComparisonRelation::AtLeast.compare(3, 3));
        assert!(ComparisonRelation::AtMost.compare(3, 3));
        assert!(!ComparisonRelation::AtLeast.compare(2, 3));
        assert!(!ComparisonRelation::AtMost.compare(4, 3));
    }

    #[test]
    fn test_serde_uses_literals() {
        let json = serde_json::to_string(&ComparisonRelation::AtMost).unwrap();
        assert_eq!(json, "\"menej ako\"");
        let parsed: ComparisonRelation = serde_json::from_str("\"minimálne\"").unwrap();
        assert_eq!(parsed, ComparisonRelation::AtLeast);
        assert!(serde_json::from_str::<ComparisonRelation>("\"viac\"").is_err());
    }
}
