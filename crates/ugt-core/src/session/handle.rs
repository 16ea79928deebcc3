//! Host-side control of a running session.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Cancel,
    /// Answer to a `StatusCheck`: the host is still waiting.
    StatusReply,
}

/// Cheap, cloneable control handle. Every call is a no-op once the session
/// has ended.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionControl>,
}

impl SessionHandle {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<SessionControl>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn cancel(&self) {
        if self.tx.send(SessionControl::Cancel).is_err() {
            debug!("Cancel ignored, session already ended");
        }
    }

    pub fn status_reply(&self) {
        let _ = self.tx.send(SessionControl::StatusReply);
    }

    pub fn is_finished(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The one display surface a session may own. Installing a new handle
/// cancels whatever ran there before.
#[derive(Debug, Default)]
pub struct OperationSlot {
    current: Mutex<Option<SessionHandle>>,
}

impl OperationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, handle: SessionHandle) {
        if let Some(previous) = self.current.lock().replace(handle) {
            if !previous.is_finished() {
                debug!("Superseding running translation");
            }
            previous.cancel();
        }
    }

    pub fn cancel_current(&self) {
        if let Some(handle) = self.current.lock().take() {
            handle.cancel();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
