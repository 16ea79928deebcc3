//! Segment identifiers and the segment record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix every wire tag carries in front of the segment id.
pub const TAG_PREFIX: &str = "ugt_";

/// Ids starting with this are provider status notes, not segments.
pub const STATUS_ID_PREFIX: &str = "status_";

/// Opaque id of one translatable segment.
///
/// The placeholder attribute stores the bare id; the wire tag name is
/// [`TAG_PREFIX`] followed by the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(String);

impl SegmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tag name used on the wire, e.g. `ugt_m0x1abc_3`.
    pub fn tag_name(&self) -> String {
        format!("{}{}", TAG_PREFIX, self.0)
    }

    /// Provider status notes travel in the same tag format.
    pub fn is_status(&self) -> bool {
        self.0.starts_with(STATUS_ID_PREFIX)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SegmentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Hands out ids for one operation: `{timestamp36}{random6}_{ordinal}`.
#[derive(Debug)]
pub struct SegmentIdGenerator {
    base: String,
    next: usize,
}

impl SegmentIdGenerator {
    pub fn new() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let random = uuid::Uuid::new_v4().simple().to_string();
        Self {
            base: format!("{}{}", to_base36(millis), &random[..6]),
            next: 0,
        }
    }

    pub fn next_id(&mut self) -> SegmentId {
        let id = SegmentId(format!("{}_{}", self.base, self.next));
        self.next += 1;
        id
    }
}

impl Default for SegmentIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// One translatable unit extracted from the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub original_text: String,
}

impl Segment {
    pub fn new(id: SegmentId, original_text: impl Into<String>) -> Self {
        Self {
            id,
            original_text: original_text.into(),
        }
    }
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;
