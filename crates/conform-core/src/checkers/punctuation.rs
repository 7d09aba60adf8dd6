//! Punctuation constraints.

use rand::Rng;

use super::Rule;
use crate::params::{InstructionArgs, InstructionParams};
use crate::toolkit::Toolkit;
use crate::InstructionError;

/// No commas anywhere in the response.
#[derive(Debug, Clone, Default)]
pub struct NoCommas;

impl Rule for NoCommas {
    const ARGS_KEYS: &'static [&'static str] = &[];

    fn build<R: Rng + ?Sized>(_params: &InstructionParams, _rng: &mut R) -> Result<Self, InstructionError> {
        Ok(Self)
    }

    fn description(&self) -> String {
        "Vo celej odpovedi sa zdržiavaj používania čiarok.".to_string()
    }

    fn args(&self) -> Option<InstructionArgs> {
        None
    }

    fn check_following(&self, text: &str, _toolkit: &Toolkit) -> bool {
        !text.contains(',')
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::toolkit_detecting;
    use super::*;

    #[test]
    fn test_no_commas() {
        let toolkit = toolkit_detecting("sk");
        assert!(NoCommas.check_following("Bez čiarok tu.", &toolkit));
        assert!(!NoCommas.check_following("Áno, je tu čiarka.", &toolkit));
        assert!(NoCommas.check_following("", &toolkit));
    }
}
