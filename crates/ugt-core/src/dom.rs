//! Helpers over the `markup5ever_rcdom` tree.

use std::rc::Rc;

use html5ever::interface::{Attribute, QualName};
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::{format_tendril, TendrilSink};
use html5ever::tree_builder::create_element;
use html5ever::{namespace_url, ns, parse_document, LocalName};
use markup5ever_rcdom::{Node, NodeData, SerializableHandle};

pub use markup5ever_rcdom::{Handle, RcDom};

/// Parse a full HTML document.
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Local element name, if `node` is an element.
pub fn node_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub fn get_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == attr_name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Depth-first search for the element with `id="..."`.
pub fn find_by_id(node: &Handle, id: &str) -> Option<Handle> {
    if get_attr(node, "id").as_deref() == Some(id) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_by_id(child, id))
}

/// Depth-first search for the first element named `name`.
pub fn find_by_name(node: &Handle, name: &str) -> Option<Handle> {
    if node_name(node) == Some(name) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_by_name(child, name))
}

/// Concatenated text of every text node under `node`.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

pub fn new_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: std::cell::RefCell::new(format_tendril!("{}", text)),
    })
}

/// Create a detached HTML element with the given attributes.
pub fn new_element(name: &str, attrs: &[(&str, &str)]) -> Handle {
    let sink = RcDom::default();
    create_element(
        &sink,
        QualName::new(None, ns!(html), LocalName::from(name)),
        attrs
            .iter()
            .map(|(key, value)| Attribute {
                name: QualName::new(None, ns!(), LocalName::from(*key)),
                value: format_tendril!("{}", value),
            })
            .collect(),
    )
}

pub fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

/// Whether `node` is still a child of its recorded parent.
pub fn is_attached(node: &Handle) -> bool {
    parent_of(node).is_some_and(|parent| {
        parent
            .children
            .borrow()
            .iter()
            .any(|child| Rc::ptr_eq(child, node))
    })
}

pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Detach every child of `node`.
pub fn clear_children(node: &Handle) {
    for child in node.children.borrow_mut().drain(..) {
        child.parent.set(None);
    }
}

/// Put `replacement` where `old` sits in its parent. Returns false if `old`
/// is detached.
pub fn replace_node(old: &Handle, replacement: Handle) -> bool {
    let Some(parent) = parent_of(old) else {
        return false;
    };
    let mut children = parent.children.borrow_mut();
    let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, old)) else {
        return false;
    };
    replacement.parent.set(Some(Rc::downgrade(&parent)));
    old.parent.set(None);
    children[index] = replacement;
    true
}

/// Insert `node` right after `anchor`. Returns false if `anchor` is detached.
pub fn insert_after(anchor: &Handle, node: Handle) -> bool {
    let Some(parent) = parent_of(anchor) else {
        return false;
    };
    let mut children = parent.children.borrow_mut();
    let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, anchor)) else {
        return false;
    };
    node.parent.set(Some(Rc::downgrade(&parent)));
    children.insert(index + 1, node);
    true
}

/// Serialize the children of `node` (the whole document for a document node).
pub fn serialize_children(node: &Handle) -> std::io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    serialize(
        &mut buf,
        &SerializableHandle::from(node.clone()),
        SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        },
    )?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
