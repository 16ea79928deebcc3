//! Segment extraction.
//!
//! Turns the text nodes of a selection into addressable placeholders. Each
//! non-blank text node is moved into a
//! `<span class="ugt-translation-segment" data-ugt-id="...">` wrapper, so the
//! page keeps showing the original text until a translation arrives.

use std::collections::HashMap;

use markup5ever_rcdom::{Handle, NodeData};
use tracing::debug;
use ugt_protocols::{Segment, SegmentId, SegmentIdGenerator, TranslationError};

use crate::dom;
use crate::patcher::DomPlaceholder;

pub const PLACEHOLDER_CLASS: &str = "ugt-translation-segment";
pub const ID_ATTRIBUTE: &str = "data-ugt-id";
pub const DEFAULT_SKIP_TAGS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    pub placeholder_class: String,
    pub id_attribute: String,
    /// Elements whose text is never collected.
    pub skip_tags: Vec<String>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            placeholder_class: PLACEHOLDER_CLASS.to_string(),
            id_attribute: ID_ATTRIBUTE.to_string(),
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Children `start..end` of one container node.
#[derive(Debug, Clone)]
pub struct SelectionRange {
    pub container: Handle,
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(container: Handle, start: usize, end: usize) -> Self {
        Self {
            container,
            start,
            end,
        }
    }

    /// Every child of `node`.
    pub fn contents_of(node: &Handle) -> Self {
        let end = node.children.borrow().len();
        Self::new(node.clone(), 0, end)
    }

    fn nodes(&self) -> Vec<Handle> {
        let children = self.container.children.borrow();
        let end = self.end.min(children.len());
        let start = self.start.min(end);
        children[start..end].to_vec()
    }
}

/// Result of a successful extraction.
#[derive(Debug)]
pub struct Extraction {
    /// Segments in document order.
    pub segments: Vec<Segment>,
    pub placeholders: HashMap<SegmentId, DomPlaceholder>,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SegmentExtractor {
    options: ExtractorOptions,
}

impl SegmentExtractor {
    pub fn new(options: ExtractorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Wrap every non-blank text node of `range` in a placeholder.
    ///
    /// Collection finishes before the first node is touched, so an empty
    /// selection leaves the document exactly as it was.
    pub fn extract(&self, range: &SelectionRange) -> Result<Extraction, TranslationError> {
        let mut text_nodes = Vec::new();
        for node in range.nodes() {
            self.collect(&node, &mut text_nodes);
        }

        if text_nodes.is_empty() {
            debug!("Selection has no translatable text");
            return Err(TranslationError::EmptySelection);
        }

        let mut ids = SegmentIdGenerator::new();
        let mut segments = Vec::with_capacity(text_nodes.len());
        let mut placeholders = HashMap::with_capacity(text_nodes.len());

        for (text_node, original) in text_nodes {
            let id = ids.next_id();
            let span = dom::new_element(
                "span",
                &[
                    ("class", self.options.placeholder_class.as_str()),
                    (self.options.id_attribute.as_str(), id.as_str()),
                ],
            );
            if !dom::replace_node(&text_node, span.clone()) {
                continue;
            }
            dom::append_child(&span, text_node);

            placeholders.insert(id.clone(), DomPlaceholder::new(&span));
            segments.push(Segment::new(id, original));
        }

        debug!(segments = segments.len(), "Extracted segments");
        Ok(Extraction {
            segments,
            placeholders,
        })
    }

    fn collect(&self, node: &Handle, out: &mut Vec<(Handle, String)>) {
        match &node.data {
            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !text.trim().is_empty() {
                    out.push((node.clone(), text));
                }
            }
            NodeData::Element { name, .. } => {
                let local: &str = name.local.as_ref();
                if self.options.skip_tags.iter().any(|tag| tag.eq_ignore_ascii_case(local)) {
                    return;
                }
                for child in node.children.borrow().iter() {
                    self.collect(child, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
