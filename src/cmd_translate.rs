//! `translate` and `prompt` command handlers.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, info};

use ugt_config::Config;
use ugt_core::dom::{self, Handle, RcDom};
use ugt_core::{
    DebugRecorder, PromptBuilder, ProviderRegistry, SegmentExtractor, SelectionRange,
    TranslationSession,
};
use ugt_protocols::{SessionEvent, TranslationError};

use crate::register::{
    extractor_options, register_providers, session_options, translation_settings, Overrides,
};

pub(crate) struct TranslateArgs {
    pub file: PathBuf,
    pub element_id: Option<String>,
    pub output: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub overrides: Overrides,
}

pub(crate) async fn handle_translate(
    config: &Config,
    args: TranslateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_document(&args.file)?;
    let root = select_root(&document, args.element_id.as_deref())?;

    let settings = translation_settings(config, &args.overrides)?;
    let extraction =
        SegmentExtractor::new(extractor_options(config)).extract(&SelectionRange::contents_of(&root))?;
    info!(
        file = %args.file.display(),
        segments = extraction.len(),
        "Extracted selection"
    );

    let registry = ProviderRegistry::new();
    register_providers(&registry, config);

    let recorder = DebugRecorder::new();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (session, handle) = TranslationSession::new(
        extraction.segments,
        extraction.placeholders,
        settings,
        session_options(config, &args.overrides),
        events_tx,
    );
    let session = session.with_recorder(recorder.clone());

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling translation");
            handle.cancel();
        }
    });

    let (result, ()) = tokio::join!(session.run(&registry), print_events(events_rx));
    interrupt.abort();

    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string_pretty(&recorder.snapshot())?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Wrote debug snapshot");
    }

    // A cancelled run still leaves a consistent document behind.
    let outcome = match result {
        Ok(_) | Err(TranslationError::Cancelled) => Ok(()),
        Err(err) => Err(err),
    };
    write_document(&document, args.output.as_deref())?;
    outcome?;
    Ok(())
}

pub(crate) async fn handle_prompt(
    config: &Config,
    file: PathBuf,
    element_id: Option<String>,
    target: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_document(&file)?;
    let root = select_root(&document, element_id.as_deref())?;

    let overrides = Overrides {
        target,
        ..Default::default()
    };
    let settings = translation_settings(config, &overrides)?;
    let extraction =
        SegmentExtractor::new(extractor_options(config)).extract(&SelectionRange::contents_of(&root))?;

    let prompt = PromptBuilder::for_settings(&settings).build(
        &extraction.segments,
        &settings.target_language,
        settings.instruction.as_deref(),
    );
    println!("{}", prompt);
    Ok(())
}

fn load_document(path: &Path) -> Result<RcDom, Box<dyn std::error::Error>> {
    let html = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(dom::parse_html(&html))
}

/// The element named by `element_id`, else `<body>`.
fn select_root(document: &RcDom, element_id: Option<&str>) -> Result<Handle, String> {
    match element_id {
        Some(id) => dom::find_by_id(&document.document, id)
            .ok_or_else(|| format!("No element with id '{}'", id)),
        None => dom::find_by_name(&document.document, "body")
            .ok_or_else(|| "Document has no <body>".to_string()),
    }
}

fn write_document(document: &RcDom, output: Option<&Path>) -> std::io::Result<()> {
    let html = dom::serialize_children(&document.document)?;
    match output {
        Some(path) => {
            std::fs::write(path, html)?;
            info!(path = %path.display(), "Wrote translated document");
            Ok(())
        }
        None => {
            println!("{}", html);
            Ok(())
        }
    }
}

async fn print_events(mut events: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = events.recv().await {
        let terminal = event.is_terminal();
        if let Some(line) = describe_event(&event) {
            eprintln!("{}", line);
        }
        if terminal {
            break;
        }
    }
}

/// One progress line per user-visible event.
fn describe_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::Started {
            provider,
            model,
            segments,
        } => Some(format!(
            "Translating {} segment(s) with {} ({})",
            segments,
            provider.label(),
            model
        )),
        SessionEvent::SegmentUpdated { .. }
        | SessionEvent::Preview { .. }
        | SessionEvent::KeepAlive => None,
        SessionEvent::Status { source, message } => Some(format!("[{}] {}", source, message)),
        SessionEvent::StatusCheck => {
            Some("No response from the provider yet, still waiting...".to_string())
        }
        SessionEvent::Overflow { after, text } => Some(format!(
            "Appended {} untagged character(s) after {}",
            text.chars().count(),
            after
        )),
        SessionEvent::OverflowDiscarded { text } => Some(format!(
            "Discarded {} untagged character(s)",
            text.chars().count()
        )),
        SessionEvent::Completed { translated, total } => {
            Some(format!("Done: {}/{} segment(s) translated", translated, total))
        }
        SessionEvent::Cancelled => Some("Cancelled".to_string()),
        SessionEvent::Failed {
            message,
            credential_hint,
            ..
        } => {
            let mut line = format!("Translation failed: {}", message);
            if *credential_hint {
                line.push_str("\nCheck the API key in your configuration.");
            }
            Some(line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ugt_protocols::{ErrorKind, ProviderKind, SegmentId};

    const PAGE: &str = r#"<html><body><p id="intro">Hello <b>world</b></p><p>Other</p></body></html>"#;

    #[test]
    fn test_select_root_by_id() {
        let document = dom::parse_html(PAGE);
        let root = select_root(&document, Some("intro")).unwrap();
        assert_eq!(dom::text_content(&root), "Hello world");
    }

    #[test]
    fn test_select_root_defaults_to_body() {
        let document = dom::parse_html(PAGE);
        let root = select_root(&document, None).unwrap();
        assert_eq!(dom::node_name(&root), Some("body"));
    }

    #[test]
    fn test_select_root_missing_id() {
        let document = dom::parse_html(PAGE);
        let err = select_root(&document, Some("missing")).unwrap_err();
        assert!(err.contains("missing"));
    }

    #[test]
    fn test_describe_events() {
        let started = SessionEvent::Started {
            provider: ProviderKind::Anthropic,
            model: "claude-3-opus-latest".to_string(),
            segments: 2,
        };
        assert_eq!(
            describe_event(&started).unwrap(),
            "Translating 2 segment(s) with Anthropic (claude-3-opus-latest)"
        );

        let updated = SessionEvent::SegmentUpdated {
            id: SegmentId::new("a"),
            content: "Hola".to_string(),
        };
        assert!(describe_event(&updated).is_none());
        let preview = SessionEvent::Preview {
            buffered: "<ugt_a>Ho".to_string(),
        };
        assert!(describe_event(&preview).is_none());

        let failed = SessionEvent::Failed {
            message: "OpenAI API error: bad key".to_string(),
            kind: ErrorKind::Transport,
            credential_hint: true,
        };
        assert!(describe_event(&failed).unwrap().contains("Check the API key"));
    }

    #[test]
    fn test_write_document_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let document = dom::parse_html(PAGE);

        write_document(&document, Some(&path)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"<p id="intro">Hello <b>world</b></p>"#));
    }
}
