//! Line-oriented JSONL drivers.
//!
//! Both drivers read one JSON object per non-blank line, call the
//! completion provider with retry, and write one JSON object per line.

mod generate;
mod translate;

pub use generate::generate_responses;
pub use translate::{merge_translation, translate_records, ShapeMismatch};

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::providers::ProviderError;

/// Errors that stop a driver run.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: invalid JSON - {source}")]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {line}: expected a JSON object")]
    NotAnObject { line: usize },

    #[error("Line {line}: translation failed - {source}")]
    Translation {
        line: usize,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// What a driver run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSummary {
    /// Records read and written
    pub records: usize,

    /// Records whose completion failed after all retries
    pub failures: usize,
}

/// Parse one input line as a JSON object.
fn parse_object(line: usize, text: &str) -> Result<serde_json::Value, DriverError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|source| DriverError::InvalidJson { line, source })?;
    if !value.is_object() {
        return Err(DriverError::NotAnObject { line });
    }
    Ok(value)
}

/// Write `value` as one JSON line.
async fn write_json_line<W, T>(writer: &mut W, value: &T) -> Result<(), DriverError>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let mut encoded = serde_json::to_string(value)?;
    encoded.push('\n');
    writer.write_all(encoded.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::providers::{
        ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
    };

    /// Provider that replays scripted replies and records every request.
    #[derive(Default)]
    pub struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        pub requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            self.requests.lock().unwrap().push(messages);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::HttpError("script exhausted".to_string())))?;
            Ok(CompletionResponse {
                content: reply,
                usage: TokenUsage::default(),
                model: config.model.clone(),
                stop_reason: Some("stop".to_string()),
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}
