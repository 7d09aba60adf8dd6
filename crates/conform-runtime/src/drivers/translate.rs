use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{parse_object, write_json_line, DriverError, DriverSummary};
use crate::config::{DriverConfig, TranslationConfig};
use crate::providers::{ChatMessage, LlmProvider, ProviderError};

/// A translated value whose structure differs from the original.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("translated value differs in shape at `{path}`")]
pub struct ShapeMismatch {
    pub path: String,
}

/// Overlay the string leaves of `translated` onto `original`.
///
/// Objects must have the same keys and arrays the same length. Only
/// strings are taken from `translated`; numbers, booleans and nulls keep
/// their original values.
pub fn merge_translation(original: &Value, translated: Value) -> Result<Value, ShapeMismatch> {
    merge_at(original, translated, "$")
}

fn merge_at(original: &Value, translated: Value, path: &str) -> Result<Value, ShapeMismatch> {
    let mismatch = || ShapeMismatch {
        path: path.to_string(),
    };

    match (original, translated) {
        (Value::Object(original), Value::Object(mut translated)) => {
            if original.len() != translated.len() {
                return Err(mismatch());
            }
            let mut merged = serde_json::Map::with_capacity(original.len());
            for (key, value) in original {
                let candidate = translated.remove(key).ok_or_else(mismatch)?;
                merged.insert(key.clone(), merge_at(value, candidate, &format!("{path}.{key}"))?);
            }
            Ok(Value::Object(merged))
        }
        (Value::Array(original), Value::Array(translated)) => {
            if original.len() != translated.len() {
                return Err(mismatch());
            }
            original
                .iter()
                .zip(translated)
                .enumerate()
                .map(|(i, (value, candidate))| merge_at(value, candidate, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        (Value::String(_), Value::String(text)) => Ok(Value::String(text)),
        (Value::String(_), _) | (Value::Object(_), _) | (Value::Array(_), _) => Err(mismatch()),
        (leaf, _) => Ok(leaf.clone()),
    }
}

/// Strip a Markdown code fence around a reply, if any.
fn unfence(reply: &str) -> &str {
    let reply = reply.trim();
    match reply.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => reply,
    }
}

/// Translate one record, retrying transport failures and malformed replies.
async fn translate_one(
    provider: &dyn LlmProvider,
    config: &DriverConfig,
    system_prompt: &str,
    record: &Value,
) -> Result<Value, ProviderError> {
    let text = serde_json::to_string(record).map_err(|e| ProviderError::ParseError(e.to_string()))?;
    let completion = &config.completion.clone().with_temperature(0.0);
    let text = text.as_str();

    config
        .retry
        .run("translate", move || async move {
            let messages = vec![ChatMessage::system(system_prompt), ChatMessage::user(text)];
            let reply = provider.complete(messages, completion).await?;
            tracing::debug!(
                tokens = reply.usage.total(),
                stop_reason = ?reply.stop_reason,
                "translation received"
            );
            let translated: Value = serde_json::from_str(unfence(&reply.content))
                .map_err(|e| ProviderError::ParseError(format!("reply is not JSON: {e}")))?;
            merge_translation(record, translated).map_err(|e| ProviderError::ParseError(e.to_string()))
        })
        .await
}

/// Translate every string value of every record.
///
/// Keys and non-string values are preserved verbatim. A record that
/// cannot be translated after all retries stops the run.
pub async fn translate_records<R, W>(
    provider: &dyn LlmProvider,
    config: &DriverConfig,
    translation: &TranslationConfig,
    reader: R,
    mut writer: W,
) -> Result<DriverSummary, DriverError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let system_prompt = translation.system_prompt();
    let mut summary = DriverSummary::default();
    let mut lines = reader.lines();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.is_empty() {
            continue;
        }

        let record = parse_object(line_number, &line)?;
        let translated = translate_one(provider, config, &system_prompt, &record)
            .await
            .map_err(|source| DriverError::Translation {
                line: line_number,
                source,
            })?;

        write_json_line(&mut writer, &translated).await?;
        summary.records += 1;
        tracing::info!(line = line_number, "translated line");
    }

    writer.flush().await?;
    Ok(summary)
}
