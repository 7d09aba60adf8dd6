//! # conform-runtime
//!
//! Text-completion drivers for building conform benchmark data.
//!
//! The checkers in `conform-core` are fully deterministic and never call a
//! model. This crate holds the two programs that do:
//!
//! - [`generate_responses`]: one model response per prompt
//! - [`translate_records`]: translate every string value of a record,
//!   keeping keys and structure
//!
//! Both read JSONL, retry transient provider failures with exponential
//! backoff, and write JSONL.
//!
//! ## Example
//!
//! ```rust,ignore
//! use conform_runtime::{generate_responses, DriverConfig, OpenAiProvider};
//!
//! let provider = OpenAiProvider::from_env()?;
//! let input = tokio::io::BufReader::new(tokio::fs::File::open("prompts.jsonl").await?);
//! let output = tokio::fs::File::create("responses.jsonl").await?;
//!
//! let summary = generate_responses(&provider, &DriverConfig::default(), input, output).await?;
//! ```

pub mod config;
pub mod drivers;
pub mod providers;
pub mod retry;

pub use config::{parse_duration, DriverConfig, TranslationConfig};
pub use drivers::{
    generate_responses, merge_translation, translate_records, DriverError, DriverSummary,
    ShapeMismatch,
};
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
};
pub use retry::RetryPolicy;

#[cfg(feature = "openai")]
pub use providers::OpenAiProvider;
