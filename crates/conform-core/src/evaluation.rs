//! Evaluating responses against instruction lists.
//!
//! A record pairs a prompt with the instruction ids and keyword arguments
//! it was written with. [`evaluate_record`] builds each instruction and
//! checks one response against all of them.

use std::path::Path;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::checkers::InstructionKind;
use crate::instruction::Instruction;
use crate::params::{InstructionArgs, InstructionParams};
use crate::toolkit::Toolkit;
use crate::InstructionError;

/// Errors loading an instruction suite.
#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Failed to read suite file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse suite: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// One instruction in a suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionSpec {
    pub id: String,

    #[serde(default)]
    pub kwargs: InstructionParams,
}

/// A prompt and the instructions a response to it must follow.
///
/// Suites are written in YAML (or JSON, which YAML accepts):
///
/// ```yaml
/// prompt: Napíš krátku báseň o jeseni.
/// instructions:
///   - id: punctuation:no_comma
///   - id: keywords:existence
///     kwargs:
///       keywords: [lístie, vietor]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructionSuite {
    #[serde(default)]
    pub prompt: String,

    pub instructions: Vec<InstructionSpec>,
}

impl InstructionSuite {
    /// Parse a suite from YAML or JSON.
    pub fn from_yaml(yaml: &str) -> Result<Self, SuiteError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a suite file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// The suite as an input record without a key.
    pub fn to_record(&self) -> InputRecord {
        InputRecord {
            key: None,
            prompt: self.prompt.clone(),
            instruction_id_list: self.instructions.iter().map(|i| i.id.clone()).collect(),
            kwargs: self.instructions.iter().map(|i| i.kwargs.clone()).collect(),
        }
    }
}

/// One line of an input JSONL file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<u64>,

    pub prompt: String,

    #[serde(default)]
    pub instruction_id_list: Vec<String>,

    /// Keyword arguments, parallel to `instruction_id_list`.
    #[serde(default)]
    pub kwargs: Vec<InstructionParams>,
}

/// One line of a response JSONL file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub prompt: String,

    /// `None` when generation failed.
    pub response: Option<String>,
}

/// Result of checking one instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructionOutcome {
    pub instruction_id: String,
    pub description: String,
    pub args: Option<InstructionArgs>,
    pub followed: bool,
}

/// Result of checking one response against its record.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<u64>,
    pub prompt: String,
    pub response: Option<String>,
    pub follow_all_instructions: bool,
    pub outcomes: Vec<InstructionOutcome>,
    pub evaluated_at: DateTime<Utc>,
}

impl ResponseReport {
    /// Number of instructions followed.
    pub fn followed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.followed).count()
    }
}

/// Build every instruction of `record` and check `response` against them.
///
/// A missing or blank response follows nothing. The repeat-prompt kind
/// defaults its `prompt_to_repeat` to the record's prompt.
pub fn evaluate_record<R: Rng + ?Sized>(
    record: &InputRecord,
    response: Option<&str>,
    toolkit: &Toolkit,
    rng: &mut R,
) -> Result<ResponseReport, InstructionError> {
    let response = response.filter(|r| !r.trim().is_empty());
    let mut outcomes = Vec::with_capacity(record.instruction_id_list.len());

    for (index, id) in record.instruction_id_list.iter().enumerate() {
        let kind = InstructionKind::from_id(id)?;
        let mut params = record.kwargs.get(index).cloned().unwrap_or_default();
        if kind == InstructionKind::RepeatThenAnswer && params.prompt_to_repeat.is_none() {
            params.prompt_to_repeat = Some(record.prompt.clone());
        }

        let mut instruction = Instruction::with_id(id.as_str(), kind).with_toolkit(toolkit.clone());
        let description = instruction.build_description(&params, rng)?;
        let followed = match response {
            Some(text) => instruction.check_following(text)?,
            None => false,
        };
        debug!(instruction_id = %id, followed, "instruction checked");

        outcomes.push(InstructionOutcome {
            instruction_id: id.clone(),
            description,
            args: instruction.get_instruction_args()?,
            followed,
        });
    }

    let follow_all_instructions = outcomes.iter().all(|o| o.followed);
    Ok(ResponseReport {
        key: record.key,
        prompt: record.prompt.clone(),
        response: response.map(str::to_string),
        follow_all_instructions,
        outcomes,
        evaluated_at: Utc::now(),
    })
}

/// Check one response against a suite.
pub fn verify_suite<R: Rng + ?Sized>(
    suite: &InstructionSuite,
    response: &str,
    toolkit: &Toolkit,
    rng: &mut R,
) -> Result<ResponseReport, InstructionError> {
    let report = evaluate_record(&suite.to_record(), Some(response), toolkit, rng)?;
    info!(
        instructions = report.outcomes.len(),
        followed = report.followed_count(),
        "suite verified"
    );
    Ok(report)
}
