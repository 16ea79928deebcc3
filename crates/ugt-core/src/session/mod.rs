//! One selection-translate operation, from prompt to final patch.
//!
//! A [`TranslationSession`] resolves the provider, sends the prompt and
//! drives the fragment stream through the reassembler into the patcher.
//! Everything happens on the task that awaits [`TranslationSession::run`];
//! the host talks to it through a [`SessionHandle`] and listens to
//! [`SessionEvent`]s.

mod handle;

pub use handle::*;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use ugt_protocols::{
    PromptRequest, ProviderError, Segment, SegmentId, SessionEvent, StreamSignal,
    TranslationError, TranslationProvider, TranslationSettings, STATUS_ID_PREFIX,
};

use crate::liveness::{
    LivenessMonitor, LivenessTransition, DEFAULT_LOST_AFTER, DEFAULT_PROBE_AFTER, DEFAULT_TICK,
};
use crate::patcher::{
    PatchOutcome, Patcher, PlaceholderSink, SpacingPolicy, DEFAULT_NO_SPACE_LANGUAGES,
};
use crate::prompt::PromptBuilder;
use crate::reassembler::{Reassembler, SegmentUpdate};
use crate::registry::ProviderRegistry;
use crate::snapshot::{DebugRecorder, RequestRecord, ResponseRecord};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub probe_after: Duration,
    pub lost_after: Duration,
    /// How often liveness is polled.
    pub tick: Duration,
    /// Leave placeholders in the page when the session ends.
    pub keep_placeholders: bool,
    pub no_space_languages: Vec<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            probe_after: DEFAULT_PROBE_AFTER,
            lost_after: DEFAULT_LOST_AFTER,
            tick: DEFAULT_TICK,
            keep_placeholders: false,
            no_space_languages: DEFAULT_NO_SPACE_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub translated: usize,
    pub total: usize,
}

enum Step {
    Signal(Option<Result<StreamSignal, ProviderError>>),
    Control(Option<SessionControl>),
    Tick,
}

pub struct TranslationSession<S: PlaceholderSink> {
    segments: Vec<Segment>,
    settings: TranslationSettings,
    options: SessionOptions,
    reassembler: Reassembler,
    patcher: Patcher<S>,
    liveness: LivenessMonitor,
    events: mpsc::UnboundedSender<SessionEvent>,
    control: mpsc::UnboundedReceiver<SessionControl>,
    control_open: bool,
    recorder: Option<DebugRecorder>,
    raw: String,
}

impl<S: PlaceholderSink> TranslationSession<S> {
    pub fn new(
        segments: Vec<Segment>,
        placeholders: HashMap<SegmentId, S>,
        settings: TranslationSettings,
        options: SessionOptions,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> (Self, SessionHandle) {
        let (handle, control) = SessionHandle::channel();
        let spacing =
            SpacingPolicy::for_language(&settings.target_language, &options.no_space_languages);
        let liveness = LivenessMonitor::new(Instant::now(), options.probe_after, options.lost_after);

        let session = Self {
            segments,
            settings,
            reassembler: Reassembler::new(),
            patcher: Patcher::new(placeholders, spacing),
            liveness,
            events,
            control,
            control_open: true,
            recorder: None,
            raw: String::new(),
            options,
        };
        (session, handle)
    }

    pub fn with_recorder(mut self, recorder: DebugRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Run to completion. The terminal event (`Completed`, `Cancelled` or
    /// `Failed`) is always emitted before this returns.
    pub async fn run(mut self, registry: &ProviderRegistry) -> Result<SessionReport, TranslationError> {
        let result = self.execute(registry).await;

        match &result {
            Ok(report) => {
                info!(
                    translated = report.translated,
                    total = report.total,
                    "Translation completed"
                );
                self.emit(SessionEvent::Completed {
                    translated: report.translated,
                    total: report.total,
                });
            }
            Err(TranslationError::Cancelled) => {
                info!("Translation cancelled");
                self.emit(SessionEvent::Cancelled);
            }
            Err(err) => {
                error!(error = %err, kind = ?err.kind(), "Translation failed");
                self.emit(SessionEvent::Failed {
                    message: err.to_string(),
                    kind: err.kind(),
                    credential_hint: err.credential_hint(),
                });
            }
        }

        if !self.options.keep_placeholders {
            self.patcher.freeze_all();
        }
        result
    }

    async fn execute(&mut self, registry: &ProviderRegistry) -> Result<SessionReport, TranslationError> {
        if self.segments.is_empty() {
            return Err(TranslationError::EmptySelection);
        }

        let provider = registry.resolve(self.settings.provider)?;
        let credential = self
            .settings
            .credential()
            .ok_or_else(|| TranslationError::MissingCredential {
                provider: self.settings.provider.label().to_string(),
            })?
            .to_string();

        let model = self.settings.effective_model().to_string();
        let prompt = PromptBuilder::for_settings(&self.settings).build(
            &self.segments,
            &self.settings.target_language,
            self.settings.instruction.as_deref(),
        );
        let record = RequestRecord::new(
            self.settings.provider,
            model.clone(),
            self.settings.streaming,
            prompt.clone(),
        );
        if let Some(recorder) = &self.recorder {
            recorder.record_request(record.clone());
        }

        info!(
            provider = %self.settings.provider,
            model = %model,
            segments = self.segments.len(),
            streaming = self.settings.streaming,
            "Starting translation"
        );
        self.emit(SessionEvent::Started {
            provider: self.settings.provider,
            model: model.clone(),
            segments: self.segments.len(),
        });

        let request = PromptRequest::new(prompt, credential).with_model(model);
        let outcome = if self.settings.streaming {
            self.stream_translation(provider, request).await
        } else {
            self.complete_translation(provider, request).await
        };

        if let Some(recorder) = &self.recorder {
            let response = match &outcome {
                Ok(()) => ResponseRecord::success(&record, self.raw.clone()),
                Err(err) => ResponseRecord::failure(&record, err.to_string()),
            };
            recorder.record_response(response);
        }
        outcome?;

        self.finish_stream();
        Ok(SessionReport {
            translated: self.patcher.translated(),
            total: self.patcher.total(),
        })
    }

    async fn stream_translation(
        &mut self,
        provider: Arc<dyn TranslationProvider>,
        request: PromptRequest,
    ) -> Result<(), TranslationError> {
        let mut ticker = tokio::time::interval(self.options.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.liveness.observe(Instant::now());

        let setup = provider.stream(request);
        tokio::pin!(setup);
        let mut stream = loop {
            let step = tokio::select! {
                biased;
                control = self.control.recv(), if self.control_open => Step::Control(control),
                result = &mut setup => break result?,
                _ = ticker.tick() => Step::Tick,
            };
            self.handle_step(step)?;
        };
        debug!(provider = provider.id(), "Stream opened");

        loop {
            let step = tokio::select! {
                biased;
                control = self.control.recv(), if self.control_open => Step::Control(control),
                item = stream.next() => Step::Signal(item),
                _ = ticker.tick() => Step::Tick,
            };
            if let Step::Signal(None) = step {
                debug!(bytes = self.raw.len(), "Stream ended");
                return Ok(());
            }
            self.handle_step(step)?;
        }
    }

    async fn complete_translation(
        &mut self,
        provider: Arc<dyn TranslationProvider>,
        request: PromptRequest,
    ) -> Result<(), TranslationError> {
        let call = provider.complete(request);
        tokio::pin!(call);
        let text = loop {
            let step = tokio::select! {
                biased;
                control = self.control.recv(), if self.control_open => Step::Control(control),
                result = &mut call => break result?,
            };
            self.handle_step(step)?;
        };

        debug!(bytes = text.len(), "Received complete response");
        self.on_fragment(&text);
        Ok(())
    }

    fn handle_step(&mut self, step: Step) -> Result<(), TranslationError> {
        match step {
            Step::Signal(Some(Ok(StreamSignal::Fragment(text)))) => {
                self.liveness.observe(Instant::now());
                self.on_fragment(&text);
            }
            Step::Signal(Some(Ok(StreamSignal::KeepAlive))) => {
                debug!("Transport keep-alive");
                self.emit(SessionEvent::KeepAlive);
            }
            Step::Signal(Some(Err(err))) => return Err(err.into()),
            Step::Signal(None) => {}
            Step::Control(Some(SessionControl::Cancel)) => return Err(TranslationError::Cancelled),
            Step::Control(Some(SessionControl::StatusReply)) => {
                debug!("Host answered status check");
                self.liveness.observe(Instant::now());
            }
            Step::Control(None) => self.control_open = false,
            Step::Tick => match self.liveness.poll(Instant::now()) {
                Some(LivenessTransition::Probe) => {
                    warn!(
                        idle_secs = self.liveness.idle(Instant::now()).as_secs(),
                        "No data from provider, checking status"
                    );
                    self.emit(SessionEvent::StatusCheck);
                }
                Some(LivenessTransition::Lost { idle }) => {
                    return Err(TranslationError::ConnectionLost {
                        idle_secs: idle.as_secs(),
                    });
                }
                None => {}
            },
        }
        Ok(())
    }

    fn on_fragment(&mut self, text: &str) {
        self.raw.push_str(text);
        for update in self.reassembler.push(text) {
            self.dispatch(update);
        }
        self.emit(SessionEvent::Preview {
            buffered: self.reassembler.buffered().to_string(),
        });
    }

    fn dispatch(&mut self, update: SegmentUpdate) {
        if update.id.is_status() {
            let source = update
                .id
                .as_str()
                .trim_start_matches(STATUS_ID_PREFIX)
                .to_string();
            let message = status_message(&update.content);
            info!(source = %source, message = %message, "Provider status");
            self.emit(SessionEvent::Status { source, message });
            return;
        }

        if let PatchOutcome::Applied { .. } = self.patcher.apply(&update) {
            self.emit(SessionEvent::SegmentUpdated {
                id: update.id,
                content: update.content,
            });
        }
    }

    /// Final scan and overflow placement.
    fn finish_stream(&mut self) {
        let completion = self.reassembler.finish();
        for update in completion.updates {
            self.dispatch(update);
        }

        let Some(text) = completion.remainder else {
            return;
        };
        match self.patcher.append_overflow(&text) {
            Some(after) => {
                info!(after = %after, chars = text.chars().count(), "Appended overflow text");
                self.emit(SessionEvent::Overflow { after, text });
            }
            None => {
                warn!(chars = text.chars().count(), "Discarding overflow text, no segment was patched");
                self.emit(SessionEvent::OverflowDiscarded { text });
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}

/// `[message]` as written by the adapters, without the brackets.
fn status_message(content: &str) -> String {
    let trimmed = content.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
