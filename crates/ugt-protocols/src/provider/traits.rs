//! Translation provider trait definition.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use super::PromptRequest;
use crate::error::ProviderError;
use crate::types::{ProviderKind, StreamSignal};

/// Core trait for provider adapters.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Returns the provider ID used as registry key.
    fn id(&self) -> &str {
        self.kind().as_str()
    }

    fn default_model(&self) -> &str {
        self.kind().default_model()
    }

    /// Send the prompt and return the whole response text.
    async fn complete(&self, request: PromptRequest) -> Result<String, ProviderError>;

    /// Send the prompt and stream the response as fragments.
    ///
    /// Fails fast on a non-success HTTP status; later transport failures
    /// arrive as `Err` items on the stream.
    async fn stream(&self, request: PromptRequest) -> Result<FragmentStream, ProviderError>;
}

/// Stream of adapter signals.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<StreamSignal, ProviderError>> + Send>>;
