//! Tagged-segment stream reassembly.
//!
//! Fragments are appended to a buffer; each push extracts the spans that are
//! complete so far and drops the buffer through the end of the last one.

use std::collections::HashMap;

use tracing::{debug, trace};
use ugt_protocols::{SegmentId, TAG_PREFIX};

use crate::scanner::{ScanMode, TagMatch, TagScanner};

/// New content for one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentUpdate {
    pub id: SegmentId,
    pub content: String,
}

impl SegmentUpdate {
    pub fn new(id: impl Into<SegmentId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Result of the final scan at stream end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub updates: Vec<SegmentUpdate>,
    /// Trimmed text left after the last span, if any.
    pub remainder: Option<String>,
}

#[derive(Debug)]
pub struct Reassembler {
    scanner: TagScanner,
    buffer: String,
}

impl Reassembler {
    pub fn new() -> Self {
        Self::with_prefix(TAG_PREFIX)
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            scanner: TagScanner::new(prefix),
            buffer: String::new(),
        }
    }

    /// Text received but not yet consumed by a span.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Append a fragment and return updates for every span it completed.
    pub fn push(&mut self, fragment: &str) -> Vec<SegmentUpdate> {
        self.buffer.push_str(fragment);
        self.drain(ScanMode::Streaming)
    }

    /// Final scan once the stream has ended. Leaves the buffer empty.
    ///
    /// Text of spans that never closed is kept in the remainder, in buffer
    /// order, followed by whatever trails the last complete span.
    pub fn finish(&mut self) -> Completion {
        let matches = self.scanner.scan(&self.buffer, ScanMode::Final);

        let mut leftovers = Vec::new();
        let mut from = 0;
        for m in &matches {
            let gap = &self.buffer[from..m.start];
            if self.scanner.has_opening_tag(gap) {
                leftovers.push(self.scanner.strip_opening_tags(gap));
            }
            from = m.end;
        }
        leftovers.push(self.scanner.strip_opening_tags(&self.buffer[from..]));

        let updates = self.consume(&matches);
        self.buffer.clear();

        let remainder = leftovers
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let remainder = Some(remainder).filter(|r| !r.is_empty());
        Completion { updates, remainder }
    }

    fn drain(&mut self, mode: ScanMode) -> Vec<SegmentUpdate> {
        let matches = self.scanner.scan(&self.buffer, mode);
        let Some(consumed) = matches.last().map(|m| m.end) else {
            return Vec::new();
        };
        let updates = self.consume(&matches);

        self.buffer.drain(..consumed);
        debug!(
            updates = updates.len(),
            consumed,
            buffered = self.buffer.len(),
            "Reassembled spans"
        );
        updates
    }

    /// One update per id, in first-seen order.
    fn consume(&self, matches: &[TagMatch]) -> Vec<SegmentUpdate> {
        // Same id twice in one pass: last content wins, first position kept.
        let prefix_len = self.scanner.prefix().len();
        let mut order: Vec<SegmentId> = Vec::new();
        let mut latest: HashMap<SegmentId, String> = HashMap::new();
        for m in matches {
            let id = SegmentId::new(&m.name[prefix_len..]);
            let content = self.scanner.effective_content(&self.buffer, m).to_string();
            if latest.insert(id.clone(), content).is_none() {
                order.push(id);
            } else {
                trace!(segment_id = %id, "Repeated span in one pass; keeping the last");
            }
        }

        order
            .into_iter()
            .filter_map(|id| {
                latest
                    .remove(&id)
                    .map(|content| SegmentUpdate { id, content })
            })
            .collect()
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "reassembler_tests.rs"]
mod tests;
