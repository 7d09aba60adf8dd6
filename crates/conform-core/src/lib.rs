//! # conform-core
//!
//! Verifiable instruction checkers for language-model responses.
//!
//! This crate answers one question per instruction: did the response
//! follow it? Each instruction is built once from explicit parameters,
//! with missing parameters sampled from an injected random source, and
//! then checks any number of responses.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same parameters and seed produce the same instruction
//! 2. **No LLM calls**: Every check is rule-based
//! 3. **Fail open**: A response whose language cannot be detected is not penalized
//! 4. **Closed set**: Every checker is listed in [`InstructionKind`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use conform_core::{Instruction, InstructionKind, InstructionParams};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let mut instruction = Instruction::new(InstructionKind::NoCommas);
//! let description = instruction.build_description(&InstructionParams::default(), &mut rng)?;
//!
//! assert!(instruction.check_following("Bez čiarok.")?);
//! ```

pub mod checkers;
pub mod detector;
pub mod evaluation;
pub mod instruction;
pub mod languages;
pub mod params;
pub mod relation;
pub mod sentences;
pub mod tokenizer;
pub mod toolkit;
pub mod vocabulary;

// Re-export main types at crate root
pub use checkers::{Checker, InstructionKind, Rule};
pub use detector::{DetectionError, LanguageDetector, WhatlangDetector};
pub use evaluation::{
    evaluate_record, verify_suite, InputRecord, InstructionOutcome, InstructionSpec,
    InstructionSuite, ResponseRecord, ResponseReport, SuiteError,
};
pub use instruction::Instruction;
pub use params::{ArgValue, InstructionArgs, InstructionParams};
pub use relation::ComparisonRelation;
pub use sentences::split_into_sentences;
pub use tokenizer::{Tokenization, Tokenizer, UnicodeTokenizer};
pub use toolkit::Toolkit;

use thiserror::Error;

/// Errors raised while building or querying an instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstructionError {
    #[error("unsupported relation `{given}`, expected one of {:?}", relation::RELATION_LITERALS)]
    InvalidRelation { given: String },

    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unsupported language code `{0}`")]
    UnsupportedLanguage(String),

    #[error("unknown instruction id `{0}`")]
    UnknownInstruction(String),

    #[error("instruction `{0}` has not been built")]
    NotBuilt(String),

    #[error("instruction `{0}` is already built")]
    AlreadyBuilt(String),
}
