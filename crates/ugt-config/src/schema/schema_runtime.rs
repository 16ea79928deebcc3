//! Runtime tuning: liveness timings, extraction markers and logging.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::default_true;

/// Stall detection and transport limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessConfig {
    /// Idle time before a status check is issued.
    #[serde(default = "default_probe_after")]
    pub probe_after_secs: u64,

    /// Idle time before the connection is declared lost.
    #[serde(default = "default_lost_after")]
    pub lost_after_secs: u64,

    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,

    /// Silence before an adapter emits a keep-alive.
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,

    /// Hard cap on one provider call.
    #[serde(default = "default_transport_timeout")]
    pub transport_timeout_secs: u64,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            probe_after_secs: default_probe_after(),
            lost_after_secs: default_lost_after(),
            tick_millis: default_tick_millis(),
            keepalive_secs: default_keepalive(),
            transport_timeout_secs: default_transport_timeout(),
        }
    }
}

impl LivenessConfig {
    pub fn probe_after(&self) -> Duration {
        Duration::from_secs(self.probe_after_secs)
    }

    pub fn lost_after(&self) -> Duration {
        Duration::from_secs(self.lost_after_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    pub fn transport_timeout(&self) -> Duration {
        Duration::from_secs(self.transport_timeout_secs)
    }
}

fn default_probe_after() -> u64 {
    60
}

fn default_lost_after() -> u64 {
    300
}

fn default_tick_millis() -> u64 {
    1000
}

fn default_keepalive() -> u64 {
    15
}

fn default_transport_timeout() -> u64 {
    1200
}

/// Placeholder markup and which subtrees to leave alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_placeholder_class")]
    pub placeholder_class: String,

    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,

    #[serde(default = "default_skip_tags")]
    pub skip_tags: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            placeholder_class: default_placeholder_class(),
            id_attribute: default_id_attribute(),
            skip_tags: default_skip_tags(),
        }
    }
}

fn default_placeholder_class() -> String {
    "ugt-translation-segment".to_string()
}

fn default_id_attribute() -> String {
    "data-ugt-id".to_string()
}

fn default_skip_tags() -> Vec<String> {
    ["script", "style", "noscript", "template"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write a daily-rolling log file.
    #[serde(default = "default_true")]
    pub file: bool,

    /// Log directory; defaults to `~/.ugt/logs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: true,
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
