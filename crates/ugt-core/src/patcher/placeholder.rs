//! Placeholder capability and its DOM implementation.

use std::rc::{Rc, Weak};

use markup5ever_rcdom::{Handle, Node};
use thiserror::Error;

use crate::dom;

/// Class of the block holding untagged trailing text.
pub const OVERFLOW_CLASS: &str = "ugt-overflow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("placeholder is no longer attached to the document")]
pub struct PlaceholderGone;

/// Where one segment's text is displayed.
pub trait PlaceholderSink {
    /// Text currently shown, or `None` once the placeholder is gone.
    fn current_text(&self) -> Option<String>;

    fn set_text(&self, text: &str) -> Result<(), PlaceholderGone>;

    /// Show supplementary text right after this placeholder.
    fn append_supplement(&self, text: &str) -> Result<(), PlaceholderGone>;

    /// Replace the placeholder by its plain text.
    fn freeze(&self) -> Result<(), PlaceholderGone>;
}

/// A `<span>` placeholder in an rcdom tree. Holds the node weakly, so a
/// page that drops the node makes the placeholder gone.
#[derive(Debug, Clone)]
pub struct DomPlaceholder {
    node: Weak<Node>,
}

impl DomPlaceholder {
    pub fn new(node: &Handle) -> Self {
        Self {
            node: Rc::downgrade(node),
        }
    }

    fn live_node(&self) -> Result<Handle, PlaceholderGone> {
        let node = self.node.upgrade().ok_or(PlaceholderGone)?;
        if dom::is_attached(&node) {
            Ok(node)
        } else {
            Err(PlaceholderGone)
        }
    }
}

impl PlaceholderSink for DomPlaceholder {
    fn current_text(&self) -> Option<String> {
        self.live_node().ok().map(|node| dom::text_content(&node))
    }

    fn set_text(&self, text: &str) -> Result<(), PlaceholderGone> {
        let node = self.live_node()?;
        dom::clear_children(&node);
        dom::append_child(&node, dom::new_text(text));
        Ok(())
    }

    fn append_supplement(&self, text: &str) -> Result<(), PlaceholderGone> {
        let node = self.live_node()?;
        let block = dom::new_element("div", &[("class", OVERFLOW_CLASS)]);
        dom::append_child(&block, dom::new_text(text));
        if dom::insert_after(&node, block) {
            Ok(())
        } else {
            Err(PlaceholderGone)
        }
    }

    fn freeze(&self) -> Result<(), PlaceholderGone> {
        let node = self.live_node()?;
        let text = dom::text_content(&node);
        if dom::replace_node(&node, dom::new_text(&text)) {
            Ok(())
        } else {
            Err(PlaceholderGone)
        }
    }
}
