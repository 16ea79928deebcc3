//! OpenAI chat completions adapter for UGT.

mod api;
mod parser;
mod provider;

pub use provider::{OpenAiProvider, DEFAULT_API_URL};
