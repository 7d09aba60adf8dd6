//! The build-once instruction lifecycle.

use rand::Rng;
use tracing::debug;

use crate::checkers::{Checker, InstructionKind};
use crate::params::{InstructionArgs, InstructionParams};
use crate::toolkit::Toolkit;
use crate::InstructionError;

#[derive(Debug, Clone)]
enum BuildState {
    Unbuilt,
    Built { checker: Checker, description: String },
}

/// One instruction, identified by an id and a checker kind.
///
/// An instruction starts unbuilt. [`Instruction::build_description`]
/// realizes its parameters exactly once; after that it can check any
/// number of responses. Querying an unbuilt instruction, or building it a
/// second time, is an error.
#[derive(Debug, Clone)]
pub struct Instruction {
    id: String,
    kind: InstructionKind,
    toolkit: Toolkit,
    state: BuildState,
}

impl Instruction {
    /// Create an unbuilt instruction whose id is the kind's public id.
    pub fn new(kind: InstructionKind) -> Self {
        Self::with_id(kind.id(), kind)
    }

    /// Create an unbuilt instruction with a caller-chosen id.
    pub fn with_id(id: impl Into<String>, kind: InstructionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            toolkit: Toolkit::shared(),
            state: BuildState::Unbuilt,
        }
    }

    /// Look the kind up by its public id.
    pub fn from_id(id: &str) -> Result<Self, InstructionError> {
        Ok(Self::with_id(id, InstructionKind::from_id(id)?))
    }

    /// Validate with `toolkit` instead of the shared one.
    pub fn with_toolkit(mut self, toolkit: Toolkit) -> Self {
        self.toolkit = toolkit;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> InstructionKind {
        self.kind
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, BuildState::Built { .. })
    }

    /// The description rendered at build time.
    pub fn description(&self) -> Option<&str> {
        match &self.state {
            BuildState::Built { description, .. } => Some(description),
            BuildState::Unbuilt => None,
        }
    }

    /// The built checker.
    pub fn checker(&self) -> Result<&Checker, InstructionError> {
        match &self.state {
            BuildState::Built { checker, .. } => Ok(checker),
            BuildState::Unbuilt => Err(InstructionError::NotBuilt(self.id.clone())),
        }
    }

    /// Realize parameters and return the natural-language description.
    ///
    /// Parameters left unset in `params` are sampled from `rng`.
    pub fn build_description<R: Rng + ?Sized>(
        &mut self,
        params: &InstructionParams,
        rng: &mut R,
    ) -> Result<String, InstructionError> {
        if self.is_built() {
            return Err(InstructionError::AlreadyBuilt(self.id.clone()));
        }

        let checker = Checker::build(self.kind, params, rng)?;
        let description = checker.description();
        debug!(
            instruction_id = %self.id,
            args = ?checker.args(),
            "instruction built"
        );

        self.state = BuildState::Built {
            checker,
            description: description.clone(),
        };
        Ok(description)
    }

    /// The realized parameters, `None` for parameterless kinds.
    pub fn get_instruction_args(&self) -> Result<Option<InstructionArgs>, InstructionError> {
        Ok(self.checker()?.args())
    }

    /// The declared parameter names. Available before building.
    pub fn get_instruction_args_keys(&self) -> &'static [&'static str] {
        self.kind.args_keys()
    }

    /// Whether `text` follows this instruction.
    pub fn check_following(&self, text: &str) -> Result<bool, InstructionError> {
        Ok(self.checker()?.check_following(text, &self.toolkit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::test_support::{rng, toolkit_detecting};
    use crate::params::ArgValue;

    #[test]
    fn test_unbuilt_instruction_errors() {
        let instruction = Instruction::new(InstructionKind::NoCommas);
        assert!(!instruction.is_built());
        assert!(instruction.description().is_none());
        assert_eq!(
            instruction.check_following("text"),
            Err(InstructionError::NotBuilt("punctuation:no_comma".to_string()))
        );
        assert!(matches!(
            instruction.get_instruction_args(),
            Err(InstructionError::NotBuilt(_))
        ));
    }

    #[test]
    fn test_args_keys_before_build() {
        let instruction = Instruction::new(InstructionKind::SentenceCount);
        assert_eq!(instruction.get_instruction_args_keys(), &["num_sentences", "relation"]);
    }

    #[test]
    fn test_build_then_check() {
        let mut instruction = Instruction::from_id("keywords:existence")
            .unwrap()
            .with_toolkit(toolkit_detecting("sk"));
        let params = InstructionParams {
            keywords: Some(vec!["mesto".to_string()]),
            ..Default::default()
        };
        let description = instruction.build_description(&params, &mut rng()).unwrap();
        assert!(description.contains("mesto"));
        assert_eq!(instruction.description(), Some(description.as_str()));

        assert!(instruction.check_following("Bývam v meste. Mesto je veľké.").unwrap());
        assert!(!instruction.check_following("Bývam na dedine.").unwrap());

        let args = instruction.get_instruction_args().unwrap().unwrap();
        assert_eq!(
            args.get("keywords"),
            Some(&ArgValue::List(vec!["mesto".to_string()]))
        );
    }

    #[test]
    fn test_second_build_is_rejected() {
        let mut instruction = Instruction::new(InstructionKind::TitlePresence);
        let mut rng = rng();
        instruction
            .build_description(&InstructionParams::default(), &mut rng)
            .unwrap();
        let err = instruction
            .build_description(&InstructionParams::default(), &mut rng)
            .unwrap_err();
        assert_eq!(err, InstructionError::AlreadyBuilt("detectable_format:title".to_string()));
    }

    #[test]
    fn test_failed_build_stays_unbuilt() {
        let mut instruction = Instruction::new(InstructionKind::RepeatThenAnswer);
        assert!(instruction
            .build_description(&InstructionParams::default(), &mut rng())
            .is_err());
        assert!(!instruction.is_built());
    }

    #[test]
    fn test_parameterless_args_are_none() {
        let mut instruction = Instruction::new(InstructionKind::JsonFormat);
        instruction
            .build_description(&InstructionParams::default(), &mut rng())
            .unwrap();
        assert_eq!(instruction.get_instruction_args().unwrap(), None);
    }

    #[test]
    fn test_same_seed_same_description() {
        let build = || {
            let mut instruction = Instruction::new(InstructionKind::LetterFrequency);
            instruction
                .build_description(&InstructionParams::default(), &mut rng())
                .unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_custom_id() {
        let instruction = Instruction::with_id("0:keywords:existence", InstructionKind::KeywordPresence);
        assert_eq!(instruction.id(), "0:keywords:existence");
        assert!(Instruction::from_id("nope").is_err());
    }
}
