//! # UGT Provider - Gemini
//!
//! Google Gemini adapter. The streaming endpoint answers with one JSON
//! array of response objects rather than SSE lines, so the body is cut
//! into objects by [`JsonObjectScanner`].

mod client;
mod parser;
mod provider;
mod scanner;
mod types;

pub use provider::{GeminiProvider, DEFAULT_BASE_URL};
pub use scanner::{JsonObjectScanner, MalformedChunk, ScanOutcome, MAX_CANDIDATE_BYTES};
pub use types::*;
