//! Combined instructions: two responses, and repeat-then-answer.

use rand::Rng;

use super::Rule;
use crate::params::{InstructionArgs, InstructionParams};
use crate::toolkit::Toolkit;
use crate::InstructionError;

const RESPONSE_SEPARATOR: &str = "******";

/// Two different responses separated by six asterisks.
#[derive(Debug, Clone, Default)]
pub struct TwoResponses;

impl Rule for TwoResponses {
    const ARGS_KEYS: &'static [&'static str] = &[];

    fn build<R: Rng + ?Sized>(_params: &InstructionParams, _rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self)
    }

    fn description(&self) -> String {
        "Daj dve rôzne odpovede. Odpovede a len odpovede musia byť oddelené \
         šiestimi hviezdičkami: ******."
            .to_string()
    }

    fn args(&self) -> Option<InstructionArgs> {
        None
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        let pieces: Vec<&str> = text.split(RESPONSE_SEPARATOR).collect();
        let last = pieces.len() - 1;
        let mut responses = Vec::with_capacity(2);

        for (index, piece) in pieces.iter().enumerate() {
            let piece = piece.trim();
            if piece.is_empty() {
                if index != 0 && index != last {
                    return false;
                }
            } else {
                responses.push(piece);
            }
        }

        responses.len() == 2 && responses[0] != responses[1]
    }
}

/// The response starts by repeating the prompt verbatim.
#[derive(Debug, Clone)]
pub struct RepeatThenAnswer {
    prompt_to_repeat: String,
}

impl Rule for RepeatThenAnswer {
    const ARGS_KEYS: &'static [&'static str] = &["prompt_to_repeat"];

    fn build<R: Rng + ?Sized>(params: &InstructionParams, _rng: &mut R) -> Result<Self, InstructionError> {
        match params.prompt_to_repeat.as_deref() {
            Some(prompt) if !prompt.is_empty() => Ok(Self {
                prompt_to_repeat: prompt.to_string(),
            }),
            _ => Err(InstructionError::MissingParameter("prompt_to_repeat")),
        }
    }

    fn description(&self) -> String {
        "Najprv zopakuj požiadavku bez zmeny, potom daj svoju odpoveď (nič nehovor \
         pred zopakovaním požiadavky; požiadavka, ktorú je potrebné zopakovať, \
         nezahŕňa túto vetu)."
            .to_string()
    }

    fn args(&self) -> Option<InstructionArgs> {
        Some(InstructionArgs::new().with("prompt_to_repeat", self.prompt_to_repeat.as_str()))
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        text.trim()
            .to_lowercase()
            .starts_with(&self.prompt_to_repeat.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{rng, toolkit_detecting};
    use super::*;

    #[test]
    fn test_two_responses() {
        let checker = TwoResponses;
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("Prvá odpoveď.\n******\nDruhá odpoveď.", &toolkit));
        assert!(checker.check_following("******\nPrvá.\n******\nDruhá.\n******", &toolkit));
        assert!(!checker.check_following("Rovnaká.\n******\nRovnaká.", &toolkit));
        assert!(!checker.check_following("Jedna.\n******\n\n******\nDve.", &toolkit));
        assert!(!checker.check_following("Bez oddeľovača.", &toolkit));
    }

    #[test]
    fn test_repeat_requires_prompt() {
        let err = RepeatThenAnswer::build(&InstructionParams::default(), &mut rng()).unwrap_err();
        assert!(matches!(err, InstructionError::MissingParameter("prompt_to_repeat")));

        let err = RepeatThenAnswer::build(
            &InstructionParams {
                prompt_to_repeat: Some(String::new()),
                ..Default::default()
            },
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, InstructionError::MissingParameter(_)));
    }

    #[test]
    fn test_repeat_then_answer() {
        let checker = RepeatThenAnswer::build(
            &InstructionParams {
                prompt_to_repeat: Some("Napíš báseň o jeseni.".to_string()),
                ..Default::default()
            },
            &mut rng(),
        )
        .unwrap();
        let toolkit = toolkit_detecting("sk");
        assert!(checker.check_following("  napíš báseň o jeseni. Listy padajú...", &toolkit));
        assert!(!checker.check_following("Tu je báseň: Napíš báseň o jeseni.", &toolkit));
        assert!(checker.description().starts_with("Najprv zopakuj"));
    }
}
