use super::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::dom;

#[derive(Debug, Default)]
struct SinkState {
    text: String,
    gone: bool,
    supplements: Vec<String>,
    frozen: bool,
}

#[derive(Clone, Default)]
struct MemorySink(Rc<RefCell<SinkState>>);

impl MemorySink {
    fn with_text(text: &str) -> Self {
        let sink = Self::default();
        sink.0.borrow_mut().text = text.to_string();
        sink
    }

    fn text(&self) -> String {
        self.0.borrow().text.clone()
    }
}

impl PlaceholderSink for MemorySink {
    fn current_text(&self) -> Option<String> {
        let state = self.0.borrow();
        (!state.gone).then(|| state.text.clone())
    }

    fn set_text(&self, text: &str) -> Result<(), PlaceholderGone> {
        let mut state = self.0.borrow_mut();
        if state.gone {
            return Err(PlaceholderGone);
        }
        state.text = text.to_string();
        Ok(())
    }

    fn append_supplement(&self, text: &str) -> Result<(), PlaceholderGone> {
        let mut state = self.0.borrow_mut();
        if state.gone {
            return Err(PlaceholderGone);
        }
        state.supplements.push(text.to_string());
        Ok(())
    }

    fn freeze(&self) -> Result<(), PlaceholderGone> {
        let mut state = self.0.borrow_mut();
        if state.gone {
            return Err(PlaceholderGone);
        }
        state.frozen = true;
        Ok(())
    }
}

fn patcher_with(ids: &[&str], spacing: SpacingPolicy) -> (Patcher<MemorySink>, Vec<MemorySink>) {
    let sinks: Vec<MemorySink> = ids.iter().map(|_| MemorySink::with_text("orig")).collect();
    let map = ids
        .iter()
        .zip(sinks.iter())
        .map(|(id, sink)| (SegmentId::new(*id), sink.clone()))
        .collect();
    (Patcher::new(map, spacing), sinks)
}

#[test]
fn test_apply_with_spacing() {
    let (mut patcher, sinks) = patcher_with(&["a", "b"], SpacingPolicy::enabled());
    patcher.apply(&SegmentUpdate::new("a", "Hello"));
    let outcome = patcher.apply(&SegmentUpdate::new("b", "World"));

    assert_eq!(
        outcome,
        PatchOutcome::Applied {
            content: " World".to_string()
        }
    );
    assert_eq!(format!("{}{}", sinks[0].text(), sinks[1].text()), "Hello World");
    assert_eq!(patcher.translated(), 2);
    assert_eq!(patcher.last_patched(), Some(&SegmentId::new("b")));
}

#[test]
fn test_apply_without_spacing() {
    let (mut patcher, sinks) = patcher_with(&["a", "b"], SpacingPolicy::disabled());
    patcher.apply(&SegmentUpdate::new("a", "Hello"));
    patcher.apply(&SegmentUpdate::new("b", "World"));
    assert_eq!(format!("{}{}", sinks[0].text(), sinks[1].text()), "HelloWorld");
}

#[test]
fn test_punctuation_continuation() {
    let (mut patcher, sinks) = patcher_with(&["a", "b"], SpacingPolicy::enabled());
    patcher.apply(&SegmentUpdate::new("a", "Hello"));
    patcher.apply(&SegmentUpdate::new("b", "."));
    assert_eq!(format!("{}{}", sinks[0].text(), sinks[1].text()), "Hello.");
}

#[test]
fn test_growing_update_same_id_no_space() {
    let (mut patcher, sinks) = patcher_with(&["a"], SpacingPolicy::enabled());
    patcher.apply(&SegmentUpdate::new("a", "Hel"));
    patcher.apply(&SegmentUpdate::new("a", "Hello"));
    assert_eq!(sinks[0].text(), "Hello");
    assert_eq!(patcher.translated(), 1);
}

#[test]
fn test_unknown_id_skipped() {
    let (mut patcher, _) = patcher_with(&["a"], SpacingPolicy::enabled());
    assert_eq!(
        patcher.apply(&SegmentUpdate::new("zzz", "x")),
        PatchOutcome::Unknown
    );
    assert_eq!(patcher.translated(), 0);
}

#[test]
fn test_gone_placeholder_skipped() {
    let (mut patcher, sinks) = patcher_with(&["a", "b"], SpacingPolicy::enabled());
    sinks[0].0.borrow_mut().gone = true;

    assert_eq!(patcher.apply(&SegmentUpdate::new("a", "x")), PatchOutcome::Gone);
    assert!(matches!(
        patcher.apply(&SegmentUpdate::new("b", "y")),
        PatchOutcome::Applied { .. }
    ));
}

#[test]
fn test_overflow_after_last_patched() {
    let (mut patcher, sinks) = patcher_with(&["a", "b"], SpacingPolicy::enabled());
    assert_eq!(patcher.append_overflow("extra"), None);

    patcher.apply(&SegmentUpdate::new("a", "x"));
    assert_eq!(patcher.append_overflow("extra"), Some(SegmentId::new("a")));
    assert_eq!(sinks[0].0.borrow().supplements, vec!["extra".to_string()]);
}

#[test]
fn test_freeze_all() {
    let (mut patcher, sinks) = patcher_with(&["a", "b"], SpacingPolicy::enabled());
    sinks[1].0.borrow_mut().gone = true;
    patcher.freeze_all();
    assert!(sinks[0].0.borrow().frozen);
    assert!(!sinks[1].0.borrow().frozen);
}

#[test]
fn test_dom_placeholder_lifecycle() {
    let doc = dom::parse_html("<p><span>orig</span></p>");
    let span = dom::find_by_name(&doc.document, "span").unwrap();
    let p = dom::find_by_name(&doc.document, "p").unwrap();
    let placeholder = DomPlaceholder::new(&span);

    placeholder.set_text("neu").unwrap();
    assert_eq!(placeholder.current_text().as_deref(), Some("neu"));

    placeholder.append_supplement("more").unwrap();
    assert_eq!(
        dom::serialize_children(&p).unwrap(),
        r#"<span>neu</span><div class="ugt-overflow">more</div>"#
    );

    placeholder.freeze().unwrap();
    assert_eq!(
        dom::serialize_children(&p).unwrap(),
        r#"neu<div class="ugt-overflow">more</div>"#
    );
    assert_eq!(placeholder.set_text("late"), Err(PlaceholderGone));
}

#[test]
fn test_dom_placeholder_removed_by_page() {
    let doc = dom::parse_html("<p><span>orig</span></p>");
    let span = dom::find_by_name(&doc.document, "span").unwrap();
    let p = dom::find_by_name(&doc.document, "p").unwrap();
    let placeholder = DomPlaceholder::new(&span);
    drop(span);

    dom::clear_children(&p);
    assert!(placeholder.current_text().is_none());
    assert_eq!(placeholder.set_text("x"), Err(PlaceholderGone));
}
