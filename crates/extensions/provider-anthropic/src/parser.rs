//! Response parsing.

use ugt_protocols::{status_fragment, ProviderError};

use crate::api::{ApiResponse, StreamEvent};
use crate::provider::SOURCE;

/// Texts carried by one `data:` payload.
pub fn parse_stream_data(data: &str) -> Result<Vec<String>, serde_json::Error> {
    let event: StreamEvent = serde_json::from_str(data)?;
    Ok(parse_stream_event(event))
}

pub fn parse_stream_event(event: StreamEvent) -> Vec<String> {
    let mut texts = Vec::new();
    match event {
        StreamEvent::ContentBlockStart { content_block } => {
            texts.extend(content_block.text.filter(|t| !t.is_empty()));
        }
        StreamEvent::ContentBlockDelta { delta } => {
            texts.extend(delta.text.filter(|t| !t.is_empty()));
        }
        StreamEvent::MessageDelta { delta } => {
            texts.extend(delta.text.filter(|t| !t.is_empty()));
            if let Some(message) = delta.stop_reason.as_deref().and_then(stop_status) {
                texts.push(status_fragment(SOURCE, &message));
            }
        }
        StreamEvent::Error { error } => {
            let message = error
                .message
                .unwrap_or_else(|| "Unknown Anthropic error".to_string());
            texts.push(status_fragment(SOURCE, &format!("Error: {}", message)));
        }
        StreamEvent::Other => {}
    }
    texts
}

/// Whole text of a non-streaming response.
pub fn parse_response(response: ApiResponse) -> Result<String, ProviderError> {
    if response.content.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "Anthropic response has no content".to_string(),
        ));
    }

    let mut text: String = response
        .content
        .into_iter()
        .filter_map(|block| block.text)
        .collect();
    if let Some(message) = response.stop_reason.as_deref().and_then(stop_status) {
        text.push_str(&status_fragment(SOURCE, &message));
    }
    Ok(text)
}

/// Status note for a stop reason that cut the answer short.
pub fn stop_status(reason: &str) -> Option<String> {
    match reason {
        "refusal" => Some("Content blocked: refusal".to_string()),
        "max_tokens" => Some("Response truncated: max_tokens".to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
