//! Applies segment updates to their placeholders.

mod placeholder;
mod spacing;

pub use placeholder::*;
pub use spacing::*;

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};
use ugt_protocols::SegmentId;

use crate::reassembler::SegmentUpdate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The placeholder now shows `content` (spacing included).
    Applied { content: String },
    /// No placeholder was registered for the id.
    Unknown,
    /// The placeholder left the document.
    Gone,
}

/// Index from segment id to placeholder, plus spacing state.
pub struct Patcher<S: PlaceholderSink> {
    placeholders: HashMap<SegmentId, S>,
    spacing: SpacingPolicy,
    last_patched: Option<SegmentId>,
    patched: HashSet<SegmentId>,
}

impl<S: PlaceholderSink> Patcher<S> {
    pub fn new(placeholders: HashMap<SegmentId, S>, spacing: SpacingPolicy) -> Self {
        Self {
            placeholders,
            spacing,
            last_patched: None,
            patched: HashSet::new(),
        }
    }

    pub fn contains(&self, id: &SegmentId) -> bool {
        self.placeholders.contains_key(id)
    }

    pub fn total(&self) -> usize {
        self.placeholders.len()
    }

    /// Number of distinct segments patched so far.
    pub fn translated(&self) -> usize {
        self.patched.len()
    }

    pub fn last_patched(&self) -> Option<&SegmentId> {
        self.last_patched.as_ref()
    }

    /// Show `update` in its placeholder. Never fails: unknown or gone
    /// placeholders are logged and skipped.
    pub fn apply(&mut self, update: &SegmentUpdate) -> PatchOutcome {
        let Some(sink) = self.placeholders.get(&update.id) else {
            warn!(segment_id = %update.id, "No placeholder for segment, skipping");
            return PatchOutcome::Unknown;
        };

        let previous = self
            .last_patched
            .as_ref()
            .filter(|id| **id != update.id)
            .and_then(|id| self.placeholders.get(id))
            .and_then(|prev| prev.current_text());
        let content = self.spacing.join(previous.as_deref(), &update.content);

        match sink.set_text(&content) {
            Ok(()) => {
                debug!(segment_id = %update.id, chars = content.chars().count(), "Patched segment");
                self.last_patched = Some(update.id.clone());
                self.patched.insert(update.id.clone());
                PatchOutcome::Applied { content }
            }
            Err(gone) => {
                warn!(segment_id = %update.id, "{}, skipping", gone);
                PatchOutcome::Gone
            }
        }
    }

    /// Show trailing untagged text after the last patched placeholder.
    /// Returns that placeholder's id, or `None` when nothing was patched.
    pub fn append_overflow(&mut self, text: &str) -> Option<SegmentId> {
        let anchor = self.last_patched.clone()?;
        let sink = self.placeholders.get(&anchor)?;
        match sink.append_supplement(text) {
            Ok(()) => Some(anchor),
            Err(gone) => {
                warn!(segment_id = %anchor, "Overflow anchor lost: {}", gone);
                None
            }
        }
    }

    /// Turn every live placeholder into plain text.
    pub fn freeze_all(&mut self) {
        let mut frozen = 0;
        for sink in self.placeholders.values() {
            if sink.freeze().is_ok() {
                frozen += 1;
            }
        }
        debug!(frozen, total = self.placeholders.len(), "Froze placeholders");
    }
}

#[cfg(test)]
#[path = "patcher_tests.rs"]
mod tests;
