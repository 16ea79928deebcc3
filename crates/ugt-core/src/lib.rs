//! # UGT Core
//!
//! The translation pipeline: extraction, prompting, stream reassembly and
//! patching.
//!
//! ## Components
//!
//! - [`SegmentExtractor`] - Replaces selected text nodes by placeholders
//! - [`PromptBuilder`] - Renders segments into the provider prompt
//! - [`Reassembler`] - Turns a fragment stream into per-segment updates
//! - [`Patcher`] - Applies updates to placeholders, with spacing repair
//! - [`LivenessMonitor`] - Detects a stalled transport
//! - [`TranslationSession`] - Runs one operation end to end
//!
//! ## Threading
//!
//! DOM handles are `Rc`-based, so a session with DOM placeholders runs on
//! the task that owns the document.

pub mod dom;
pub mod extractor;
pub mod liveness;
pub mod patcher;
pub mod prompt;
pub mod reassembler;
pub mod registry;
pub mod scanner;
pub mod session;
pub mod snapshot;

pub use extractor::{Extraction, ExtractorOptions, SegmentExtractor, SelectionRange};
pub use liveness::{LivenessMonitor, LivenessState, LivenessTransition};
pub use patcher::{DomPlaceholder, PatchOutcome, Patcher, PlaceholderSink, SpacingPolicy};
pub use prompt::{PromptBuilder, DEFAULT_PROMPT_TEMPLATE};
pub use reassembler::{Completion, Reassembler, SegmentUpdate};
pub use registry::{ProviderRegistry, RegistryError};
pub use scanner::{ScanMode, TagScanner};
pub use session::{
    OperationSlot, SessionControl, SessionHandle, SessionOptions, SessionReport,
    TranslationSession,
};
pub use snapshot::{DebugRecorder, DebugSnapshot, RequestRecord, ResponseRecord};
