//! # UGT Protocols
//!
//! Shared definitions for the UGT selection translator.
//! Contains types, error enums and the provider trait; the translation
//! pipeline itself lives in `ugt-core`.
//!
//! ## Core Items
//!
//! - [`TranslationProvider`] - Trait implemented by each provider adapter
//! - [`StreamSignal`] - What an adapter yields while a response streams in
//! - [`SegmentId`] - Opaque id shared by a placeholder and its wire tag
//! - [`SessionEvent`] - Upward signals emitted by a running translation

pub mod error;
pub mod events;
pub mod provider;
pub mod types;

pub use error::{ErrorKind, ProviderError, TranslationError};
pub use events::SessionEvent;
pub use provider::{FragmentStream, PromptRequest, TranslationProvider};
pub use types::*;
