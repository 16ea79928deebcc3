//! Stream signals produced by provider adapters.

use super::TAG_PREFIX;

/// One item of an adapter's output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    /// Newly-arrived text. No boundary guarantees.
    Fragment(String),
    /// Synthetic stall heartbeat; carries no content.
    KeepAlive,
}

impl StreamSignal {
    pub fn fragment(text: impl Into<String>) -> Self {
        Self::Fragment(text.into())
    }

    pub fn as_fragment(&self) -> Option<&str> {
        match self {
            Self::Fragment(text) => Some(text),
            Self::KeepAlive => None,
        }
    }
}

/// Wrap a provider note in the segment tag format so it flows through the
/// same reassembly path: `<ugt_status_gemini>[message]</ugt_status_gemini>`.
pub fn status_fragment(source: &str, message: &str) -> String {
    format!(
        "<{prefix}status_{source}>[{message}]</{prefix}status_{source}>",
        prefix = TAG_PREFIX
    )
}
