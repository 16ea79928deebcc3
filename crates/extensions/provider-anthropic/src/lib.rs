//! Anthropic messages adapter for UGT.

mod api;
mod parser;
mod provider;

pub use provider::{max_tokens_for, AnthropicProvider, API_VERSION, DEFAULT_API_URL};
