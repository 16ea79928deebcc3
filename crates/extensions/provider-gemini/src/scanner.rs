//! Incremental scanner for a streamed JSON array of objects.
//!
//! The body looks like `[{...}\n,{...}\n]` and arrives in arbitrary
//! chunks. The scanner keeps the unconsumed text, skips the array
//! punctuation between objects and hands out one top-level object at a
//! time.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Largest unfinished candidate kept before it is given up on.
pub const MAX_CANDIDATE_BYTES: usize = 4 * 1024 * 1024;

/// Length of the text sample kept in a [`MalformedChunk`].
const SNIPPET_CHARS: usize = 120;

/// A candidate object that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed stream object: {reason} (near {snippet:?})")]
pub struct MalformedChunk {
    pub reason: String,
    pub snippet: String,
}

impl MalformedChunk {
    fn new(reason: impl Into<String>, text: &str) -> Self {
        Self {
            reason: reason.into(),
            snippet: text.chars().take(SNIPPET_CHARS).collect(),
        }
    }
}

/// Result of one scan step. `consumed` counts the bytes removed from the
/// buffer, skipped separators included.
#[derive(Debug)]
pub enum ScanOutcome {
    Object { json: Value, consumed: usize },
    NeedMore,
    Discard { consumed: usize, error: MalformedChunk },
}

#[derive(Debug, Default)]
pub struct JsonObjectScanner {
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence.
    pending: Vec<u8>,
}

impl JsonObjectScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw body bytes.
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);

        let mut start = 0;
        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    start = self.pending.len();
                    break;
                }
                Err(err) => {
                    let valid = start + err.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending[start..valid]));
                    match err.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            start = valid + len;
                        }
                        None => {
                            start = valid;
                            break;
                        }
                    }
                }
            }
        }
        self.pending.drain(..start);
    }

    /// Take the next object off the buffer, if one is complete.
    pub fn next_outcome(&mut self) -> ScanOutcome {
        let Some(skipped) = self.buffer.find('{') else {
            // Only separators, brackets or junk so far.
            self.buffer.clear();
            return ScanOutcome::NeedMore;
        };
        self.buffer.drain(..skipped);

        let Some(end) = find_object_end(&self.buffer) else {
            if self.buffer.len() > MAX_CANDIDATE_BYTES {
                let cut = self.buffer[1..]
                    .find('{')
                    .map(|pos| pos + 1)
                    .unwrap_or(self.buffer.len());
                let error = MalformedChunk::new(
                    format!("unterminated object larger than {} bytes", MAX_CANDIDATE_BYTES),
                    &self.buffer,
                );
                self.buffer.drain(..cut);
                return ScanOutcome::Discard {
                    consumed: skipped + cut,
                    error,
                };
            }
            return ScanOutcome::NeedMore;
        };

        match parse_candidate(&self.buffer[..end]) {
            Ok((json, used)) => {
                self.buffer.drain(..used);
                ScanOutcome::Object {
                    json,
                    consumed: skipped + used,
                }
            }
            Err(error) => {
                self.buffer.drain(..end);
                ScanOutcome::Discard {
                    consumed: skipped + end,
                    error,
                }
            }
        }
    }

    /// Every object currently available. Discarded candidates are logged.
    pub fn drain(&mut self) -> Vec<Value> {
        let mut objects = Vec::new();
        loop {
            match self.next_outcome() {
                ScanOutcome::Object { json, .. } => objects.push(json),
                ScanOutcome::Discard { consumed, error } => {
                    warn!(consumed, error = %error, "Discarding malformed Gemini stream object");
                }
                ScanOutcome::NeedMore => return objects,
            }
        }
    }

    /// Unconsumed text, for diagnostics once the body has ended.
    pub fn remainder(&self) -> &str {
        self.buffer.trim()
    }
}

/// Byte offset just past the `}` closing the object that starts at
/// `text[0]`. Braces inside string literals are ignored.
fn find_object_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, byte) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a candidate. When only a prefix is valid JSON, that prefix is
/// used and its length returned.
fn parse_candidate(candidate: &str) -> Result<(Value, usize), MalformedChunk> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(json) => Ok((json, candidate.len())),
        Err(err) => {
            let mut values = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();
            match values.next() {
                Some(Ok(json)) if values.byte_offset() < candidate.len() => {
                    Ok((json, values.byte_offset()))
                }
                _ => Err(MalformedChunk::new(err.to_string(), candidate)),
            }
        }
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
