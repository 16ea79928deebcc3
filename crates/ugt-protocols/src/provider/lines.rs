//! Line framing for line-oriented (SSE) provider streams.

use std::fmt::Display;

use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use super::FragmentStream;
use crate::error::ProviderError;
use crate::types::StreamSignal;

/// Terminal payload of an SSE stream.
pub const SSE_DONE: &str = "[DONE]";

/// Splits a chunked byte stream into complete lines.
///
/// Partial lines, including multi-byte UTF-8 sequences cut by a chunk
/// boundary, are kept until the rest arrives.
#[derive(Debug, Default)]
pub struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(decode_line(&line[..line.len() - 1]));
        }
        lines
    }

    /// Flush whatever is left once the transport closes.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(decode_line(&rest))
    }
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\r')
        .to_string()
}

/// Payload of an SSE `data:` line, if `line` is one.
pub fn sse_data(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim)
}

/// Turn an SSE byte stream into fragments.
///
/// `parse` receives each `data:` payload and returns the text it carries.
/// `[DONE]` ends the stream; payloads that fail to parse are logged and
/// skipped. A transport error is yielded once and ends the stream.
pub fn sse_fragments<B, T, E, F>(source: &'static str, bytes: B, parse: F) -> FragmentStream
where
    B: Stream<Item = Result<T, E>> + Send + 'static,
    T: AsRef<[u8]> + Send,
    E: Display + Send,
    F: Fn(&str) -> Result<Vec<String>, serde_json::Error> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut bytes = Box::pin(bytes);
        let mut decoder = LineDecoder::new();
        let mut received = 0usize;

        loop {
            let (lines, ended) = match bytes.next().await {
                Some(Ok(chunk)) => {
                    received += chunk.as_ref().len();
                    (decoder.push(chunk.as_ref()), false)
                }
                Some(Err(err)) => {
                    yield Err(ProviderError::StreamError(err.to_string()));
                    return;
                }
                None => (decoder.finish().into_iter().collect::<Vec<_>>(), true),
            };

            for line in lines {
                let Some(data) = sse_data(&line) else {
                    continue;
                };
                if data.is_empty() {
                    continue;
                }
                if data == SSE_DONE {
                    debug!(provider = source, bytes = received, "Stream done marker received");
                    return;
                }
                match parse(data) {
                    Ok(texts) => {
                        for text in texts {
                            yield Ok(StreamSignal::Fragment(text));
                        }
                    }
                    Err(err) => warn!(provider = source, error = %err, line = %data, "Skipping unparseable stream line"),
                }
            }

            if ended {
                debug!(provider = source, bytes = received, "Stream closed");
                return;
            }
        }
    })
}

#[cfg(test)]
#[path = "lines_tests.rs"]
mod tests;
