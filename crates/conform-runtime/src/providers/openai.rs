//! OpenAI-compatible chat completion provider.
//!
//! Works against api.openai.com and any server exposing the same
//! `/chat/completions` endpoint (vLLM, llama.cpp, Ollama, ...).

use super::{
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable name for the API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const CREDENTIAL_NAME: &str = "OpenAI API key";

/// OpenAI-compatible provider.
pub struct OpenAiProvider {
    credential: ApiCredential,
    base_url: String,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_credential(ApiCredential::new(
            api_key,
            CredentialSource::Programmatic,
            CREDENTIAL_NAME,
        ))
    }

    pub fn with_credential(credential: ApiCredential) -> Self {
        tracing::debug!(
            credential = credential.name(),
            source = %credential.source(),
            "credential loaded"
        );
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, ProviderError> {
        Ok(Self::with_credential(ApiCredential::from_env(
            OPENAI_API_KEY_ENV,
            CREDENTIAL_NAME,
        )?))
    }

    /// Use `api_key` when given, else `OPENAI_API_KEY`.
    pub fn from_arg_or_env(api_key: Option<String>) -> Result<Self, ProviderError> {
        Ok(Self::with_credential(ApiCredential::from_arg_or_env(
            api_key,
            OPENAI_API_KEY_ENV,
            CREDENTIAL_NAME,
        )?))
    }

    /// Set custom base URL, e.g. `http://localhost:8000/v1`.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self, ProviderError> {
        let url = url.into();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ProviderError::NotConfigured(
                "base_url must start with http:// or https://".to_string(),
            ));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn get_client(&self) -> &reqwest::Client {
        static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
        CLIENT.get_or_init(reqwest::Client::new)
    }
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat completion response body.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Map a non-success status to a provider error.
fn status_error(status: u16, body: &str, retry_after: Option<Duration>) -> ProviderError {
    match status {
        429 => ProviderError::RateLimited { retry_after },
        401 | 403 => ProviderError::AuthError,
        _ => {
            let message = serde_json::from_str::<ApiErrorBody>(body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| body.trim().to_string());
            ProviderError::ApiError { status, message }
        }
    }
}

fn into_completion(body: ChatCompletionResponse, requested_model: &str) -> Result<CompletionResponse, ProviderError> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ParseError("response has no choices".to_string()))?;
    let usage = body
        .usage
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();
    let model = if body.model.is_empty() {
        requested_model.to_string()
    } else {
        body.model
    };

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        usage,
        model,
        stop_reason: choice.finish_reason,
    })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatCompletionRequest {
            model: &config.model,
            messages: &messages,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        // Only expose the credential here, at the point of use
        let response = self
            .get_client()
            .post(self.endpoint())
            .bearer_auth(self.credential.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body, retry_after));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        into_completion(body, &config.model)
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "openai"
    }
}
