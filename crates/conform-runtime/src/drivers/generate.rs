use conform_core::ResponseRecord;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{parse_object, write_json_line, DriverError, DriverSummary};
use crate::config::DriverConfig;
use crate::providers::{ChatMessage, LlmProvider};

/// Generate one response per prompt.
///
/// Each input line must be a JSON object; its `prompt` field (empty when
/// missing) is sent as a single user message. A prompt whose completion
/// still fails after all retries is written with `"response": null` and
/// the run continues. Invalid JSON stops the run.
pub async fn generate_responses<R, W>(
    provider: &dyn LlmProvider,
    config: &DriverConfig,
    reader: R,
    mut writer: W,
) -> Result<DriverSummary, DriverError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = DriverSummary::default();
    let mut lines = reader.lines();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.is_empty() {
            continue;
        }

        let record = parse_object(line_number, &line)?;
        let prompt = record
            .get("prompt")
            .and_then(|p| p.as_str())
            .unwrap_or_default()
            .to_string();

        let request = prompt.as_str();
        let completion = config
            .retry
            .run("generate", move || {
                provider.complete(vec![ChatMessage::user(request)], &config.completion)
            })
            .await;

        let response = match completion {
            Ok(completion) => {
                tracing::debug!(
                    line = line_number,
                    tokens = completion.usage.total(),
                    stop_reason = ?completion.stop_reason,
                    "completion received"
                );
                Some(completion.content)
            }
            Err(e) => {
                tracing::error!(
                    line = line_number,
                    provider = provider.name(),
                    attempts = config.retry.attempts,
                    error = %e,
                    "completion failed after all attempts"
                );
                summary.failures += 1;
                None
            }
        };

        write_json_line(&mut writer, &ResponseRecord { prompt, response }).await?;
        summary.records += 1;
        tracing::info!(line = line_number, "processed line");
    }

    writer.flush().await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::test_support::ScriptedProvider;
    use crate::providers::ProviderError;
    use crate::retry::RetryPolicy;
    use std::time::Duration;

    fn config(attempts: usize) -> DriverConfig {
        DriverConfig {
            retry: RetryPolicy::new(attempts, Duration::from_millis(1)),
            ..Default::default()
        }
    }

    fn output_lines(out: Vec<u8>) -> Vec<serde_json::Value> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_generates_one_line_per_prompt() {
        let provider = ScriptedProvider::new(vec![Ok("Ahoj!".to_string()), Ok("Dobre.".to_string())]);
        let input = "{\"key\": 1, \"prompt\": \"Pozdrav ma.\"}\n\n{\"prompt\": \"Ako sa máš?\"}\n";
        let mut out = Vec::new();

        let summary = generate_responses(&provider, &config(3), input.as_bytes(), &mut out)
            .await
            .unwrap();

        assert_eq!(summary, DriverSummary { records: 2, failures: 0 });
        let lines = output_lines(out);
        assert_eq!(lines[0], serde_json::json!({"prompt": "Pozdrav ma.", "response": "Ahoj!"}));
        assert_eq!(lines[1]["prompt"], "Ako sa máš?");

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0], vec![ChatMessage::user("Pozdrav ma.")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_then_writes_null() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::HttpError("reset".to_string())),
            Err(ProviderError::RateLimited { retry_after: None }),
            Ok("Neskoro, ale predsa.".to_string()),
            Err(ProviderError::HttpError("down".to_string())),
            Err(ProviderError::HttpError("down".to_string())),
            Err(ProviderError::HttpError("down".to_string())),
        ]);
        let input = "{\"prompt\": \"Prvý\"}\n{\"prompt\": \"Druhý\"}\n";
        let mut out = Vec::new();

        let summary = generate_responses(&provider, &config(3), input.as_bytes(), &mut out)
            .await
            .unwrap();

        assert_eq!(summary, DriverSummary { records: 2, failures: 1 });
        assert_eq!(provider.request_count(), 6);
        let lines = output_lines(out);
        assert_eq!(lines[0]["response"], "Neskoro, ale predsa.");
        assert!(lines[1]["response"].is_null());
    }

    #[tokio::test]
    async fn test_missing_prompt_is_empty() {
        let provider = ScriptedProvider::new(vec![Ok("?".to_string())]);
        let mut out = Vec::new();

        generate_responses(&provider, &config(1), "{\"key\": 5}\n".as_bytes(), &mut out)
            .await
            .unwrap();

        assert_eq!(output_lines(out)[0]["prompt"], "");
    }

    #[tokio::test]
    async fn test_invalid_json_stops_run() {
        let provider = ScriptedProvider::new(vec![Ok("ok".to_string())]);
        let input = "{\"prompt\": \"a\"}\nnot json\n{\"prompt\": \"b\"}\n";
        let mut out = Vec::new();

        let err = generate_responses(&provider, &config(1), input.as_bytes(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, DriverError::InvalidJson { line: 2, .. }));
        assert_eq!(provider.request_count(), 1);
    }
}
