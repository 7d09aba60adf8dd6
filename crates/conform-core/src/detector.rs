//! Language identification.
//!
//! Checkers that depend on the response language call a
//! [`LanguageDetector`]. When detection fails they assume the response is
//! compliant, so a detector should return an error rather than guess when it
//! has nothing to go on.

use thiserror::Error;

/// Errors from language detection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("no language could be detected")]
    Undetermined,

    #[error("detected language `{0}` has no ISO 639-1 code")]
    Unmapped(String),
}

/// Best-guess language identification.
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text` as an ISO 639-1 code.
    fn detect(&self, text: &str) -> Result<String, DetectionError>;

    /// Name for logs.
    fn name(&self) -> &str;
}

/// Trigram-based detector backed by `whatlang`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String, DetectionError> {
        let info = whatlang::detect(text).ok_or(DetectionError::Undetermined)?;
        let code = info.lang().code();
        iso_639_1(code)
            .map(str::to_string)
            .ok_or_else(|| DetectionError::Unmapped(code.to_string()))
    }

    fn name(&self) -> &str {
        "whatlang"
    }
}

/// Map an ISO 639-3 code to its ISO 639-1 equivalent.
fn iso_639_1(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_english_prose() {
        let detector = WhatlangDetector::new();
        let text = "The quick brown fox jumps over the lazy dog while the farmer \
                    watches from the porch and drinks his morning coffee.";
        assert_eq!(detector.detect(text).unwrap(), "en");
    }

    #[test]
    fn test_no_letters_is_undetermined() {
        let detector = WhatlangDetector::new();
        assert_eq!(detector.detect(""), Err(DetectionError::Undetermined));
        assert_eq!(detector.detect("12345 !!!"), Err(DetectionError::Undetermined));
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(iso_639_1("slk"), Some("sk"));
        assert_eq!(iso_639_1("pes"), Some("fa"));
        assert_eq!(iso_639_1("xyz"), None);
    }
}
