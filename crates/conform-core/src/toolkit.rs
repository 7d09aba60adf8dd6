//! Shared text-analysis collaborators.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::detector::{LanguageDetector, WhatlangDetector};
use crate::tokenizer::{Tokenizer, UnicodeTokenizer};

lazy_static! {
    static ref SHARED: Toolkit = Toolkit::new(
        Arc::new(UnicodeTokenizer::new()),
        Arc::new(WhatlangDetector::new()),
    );
}

/// The tokenizer and language detector checkers validate with.
///
/// Cloning is cheap; both collaborators are shared and read-only.
#[derive(Clone)]
pub struct Toolkit {
    tokenizer: Arc<dyn Tokenizer>,
    detector: Arc<dyn LanguageDetector>,
}

impl Toolkit {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, detector: Arc<dyn LanguageDetector>) -> Self {
        Self {
            tokenizer,
            detector,
        }
    }

    /// The process-wide default toolkit, created on first use.
    pub fn shared() -> Self {
        SHARED.clone()
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    pub fn detector(&self) -> &dyn LanguageDetector {
        self.detector.as_ref()
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::shared()
    }
}

impl fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolkit")
            .field("tokenizer", &self.tokenizer.name())
            .field("detector", &self.detector.name())
            .finish()
    }
}
