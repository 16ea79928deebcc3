//! Transport liveness tracking.
//!
//! `Active` until the stream has been silent for `probe_after`, then
//! `Probing` until `lost_after` of total silence, then `Lost`. Content and
//! status replies reset the clock; keep-alive heartbeats do not.

use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_PROBE_AFTER: Duration = Duration::from_secs(60);
pub const DEFAULT_LOST_AFTER: Duration = Duration::from_secs(300);
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessState {
    Active,
    Probing,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessTransition {
    /// Ask the host whether the operation is still wanted.
    Probe,
    /// Give up after `idle` of silence.
    Lost { idle: Duration },
}

#[derive(Debug, Clone)]
pub struct LivenessMonitor {
    last_activity: Instant,
    probe_after: Duration,
    lost_after: Duration,
    state: LivenessState,
}

impl LivenessMonitor {
    pub fn new(now: Instant, probe_after: Duration, lost_after: Duration) -> Self {
        Self {
            last_activity: now,
            probe_after,
            lost_after,
            state: LivenessState::Active,
        }
    }

    pub fn state(&self) -> LivenessState {
        self.state
    }

    pub fn idle(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    /// Record activity. A lost monitor stays lost.
    pub fn observe(&mut self, now: Instant) {
        if self.state == LivenessState::Lost {
            return;
        }
        self.last_activity = now;
        self.state = LivenessState::Active;
    }

    /// At most one transition per call.
    pub fn poll(&mut self, now: Instant) -> Option<LivenessTransition> {
        let idle = self.idle(now);
        match self.state {
            LivenessState::Lost => None,
            _ if idle >= self.lost_after => {
                self.state = LivenessState::Lost;
                Some(LivenessTransition::Lost { idle })
            }
            LivenessState::Active if idle >= self.probe_after => {
                self.state = LivenessState::Probing;
                Some(LivenessTransition::Probe)
            }
            _ => None,
        }
    }
}
