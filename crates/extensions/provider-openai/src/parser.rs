//! Response parsing.

use ugt_protocols::{status_fragment, ProviderError};

use crate::api::{ApiResponse, StreamChunk};
use crate::provider::SOURCE;

/// Texts carried by one `data:` payload: the delta content, then a status
/// fragment if the choice ended abnormally.
pub fn parse_stream_data(data: &str) -> Result<Vec<String>, serde_json::Error> {
    let chunk: StreamChunk = serde_json::from_str(data)?;
    Ok(parse_stream_chunk(chunk))
}

pub fn parse_stream_chunk(chunk: StreamChunk) -> Vec<String> {
    let Some(choice) = chunk.choices.into_iter().next() else {
        return Vec::new();
    };

    let mut texts = Vec::new();
    if let Some(content) = choice.delta.content.filter(|c| !c.is_empty()) {
        texts.push(content);
    }
    if let Some(message) = choice.finish_reason.as_deref().and_then(finish_status) {
        texts.push(status_fragment(SOURCE, &message));
    }
    texts
}

/// Whole text of a non-streaming response.
pub fn parse_response(response: ApiResponse) -> Result<String, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("OpenAI response has no choices".to_string()))?;

    let mut text = choice.message.content.unwrap_or_default();
    if let Some(message) = choice.finish_reason.as_deref().and_then(finish_status) {
        text.push_str(&status_fragment(SOURCE, &message));
    }
    Ok(text)
}

/// Status note for a finish reason that cut the answer short.
pub fn finish_status(reason: &str) -> Option<String> {
    match reason {
        "content_filter" => Some("Content blocked: content_filter".to_string()),
        "length" => Some("Response truncated: length".to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
