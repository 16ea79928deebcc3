//! Upward signals emitted by a running translation session.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::types::{ProviderKind, SegmentId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Started {
        provider: ProviderKind,
        model: String,
        segments: usize,
    },
    /// A placeholder now shows `content`.
    SegmentUpdated { id: SegmentId, content: String },
    /// Received text not yet consumed by a complete span, after each
    /// fragment. Empty once everything so far has been applied.
    Preview { buffered: String },
    /// Provider note carried in a status tag.
    Status { source: String, message: String },
    /// The transport is open but silent.
    KeepAlive,
    /// No activity for the probe threshold; the host may answer with a
    /// status reply.
    StatusCheck,
    /// Untagged trailing text shown after the last translated segment.
    Overflow { after: SegmentId, text: String },
    /// Untagged trailing text dropped because nothing was translated.
    OverflowDiscarded { text: String },
    Completed { translated: usize, total: usize },
    Cancelled,
    Failed {
        message: String,
        kind: ErrorKind,
        credential_hint: bool,
    },
}

impl SessionEvent {
    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Cancelled | Self::Failed { .. }
        )
    }
}
