//! Response object decoding.

use std::fmt::Display;

use futures::{Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};
use ugt_protocols::{status_fragment, FragmentStream, ProviderError, StreamSignal};

use crate::provider::SOURCE;
use crate::scanner::JsonObjectScanner;
use crate::types::GenerateContentResponse;

/// Turn the streamed body into fragments.
pub fn object_fragments<B, T, E>(bytes: B) -> FragmentStream
where
    B: Stream<Item = Result<T, E>> + Send + 'static,
    T: AsRef<[u8]> + Send,
    E: Display + Send,
{
    Box::pin(async_stream::stream! {
        let mut bytes = Box::pin(bytes);
        let mut scanner = JsonObjectScanner::new();
        let mut objects = 0usize;

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    yield Err(ProviderError::StreamError(err.to_string()));
                    return;
                }
            };
            scanner.push(chunk.as_ref());
            for object in scanner.drain() {
                objects += 1;
                for text in object_texts(object) {
                    yield Ok(StreamSignal::Fragment(text));
                }
            }
        }

        if !scanner.remainder().is_empty() {
            warn!(remainder = %scanner.remainder(), "Gemini stream ended with unparsed data");
        }
        debug!(objects, "Gemini stream closed");
    })
}

/// Texts carried by one streamed object.
pub fn object_texts(object: Value) -> Vec<String> {
    match serde_json::from_value::<GenerateContentResponse>(object) {
        Ok(response) => response_texts(response),
        Err(err) => {
            warn!(error = %err, "Skipping unrecognised Gemini object");
            Vec::new()
        }
    }
}

/// Part texts of the first candidate, then any status note.
pub fn response_texts(response: GenerateContentResponse) -> Vec<String> {
    let mut texts = Vec::new();

    if let Some(candidate) = response.candidates.into_iter().next() {
        let parts = candidate.content.map(|content| content.parts).unwrap_or_default();
        for text in parts.into_iter().filter_map(|part| part.text) {
            if !text.is_empty() {
                texts.extend(part_texts(text));
            }
        }
        if let Some(message) = candidate.finish_reason.as_deref().and_then(finish_status) {
            texts.push(status_fragment(SOURCE, &message));
        }
    }

    if let Some(error) = response.error {
        let message = error
            .message
            .unwrap_or_else(|| "Unknown Gemini error".to_string());
        texts.push(status_fragment(SOURCE, &format!("Error: {}", message)));
    }
    texts
}

/// A part is sometimes a JSON array of `{"ugt_x": "..."}` objects, with or
/// without a leading `json` marker. Its string values are emitted one by
/// one, in the order the model wrote them; anything else is emitted
/// literally.
pub fn part_texts(text: String) -> Vec<String> {
    let trimmed = text.trim();
    let payload = trimmed
        .strip_prefix("json")
        .map(str::trim_start)
        .unwrap_or(trimmed);

    if payload.starts_with('[') && payload.ends_with(']') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(payload) {
            let inner: Vec<String> = items
                .iter()
                .filter_map(Value::as_object)
                .flat_map(|item| item.values())
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            if !inner.is_empty() {
                return inner;
            }
        }
    }
    vec![text]
}

/// Status note for a finish reason other than a normal stop.
pub fn finish_status(reason: &str) -> Option<String> {
    match reason {
        "STOP" => None,
        "SAFETY" => Some("Content blocked: SAFETY".to_string()),
        other => Some(format!("Stream ended by Gemini: {}", other)),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
