//! Driver configuration.

use std::time::Duration;

use crate::providers::CompletionConfig;
use crate::retry::RetryPolicy;

/// Default source language for translation.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "English";

/// Default target language for translation.
pub const DEFAULT_TARGET_LANGUAGE: &str = "Slovak";

/// Settings shared by the generation and translation drivers.
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    pub completion: CompletionConfig,
    pub retry: RetryPolicy,
}

impl DriverConfig {
    pub fn new(completion: CompletionConfig, retry: RetryPolicy) -> Self {
        Self { completion, retry }
    }
}

/// Language pair for the translation driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationConfig {
    pub source_language: String,
    pub target_language: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

impl TranslationConfig {
    /// The system prompt sent with every record.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a translation engine. You will receive a JSON object. \
             Translate all string values from {} into {}. Keep all JSON keys unchanged. \
             Do not translate keys, only values. Preserve the original JSON structure \
             exactly, including nested objects and arrays. Return only valid JSON with \
             no extra explanation.",
            self.source_language, self.target_language
        )
    }
}

/// Parse a human-readable duration such as `500ms`, `2s` or `1m 30s`.
pub fn parse_duration(value: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration(" 250ms ").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("1m 30s").unwrap(), Duration::from_secs(90));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_system_prompt_names_languages() {
        let prompt = TranslationConfig::default().system_prompt();
        assert!(prompt.contains("from English into Slovak"));

        let czech = TranslationConfig {
            source_language: "English".to_string(),
            target_language: "Czech".to_string(),
        };
        assert!(czech.system_prompt().contains("into Czech"));
    }

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.completion.model, "gpt-4o-mini");
    }
}
