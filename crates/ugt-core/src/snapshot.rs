//! Last request / last response debug snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ugt_protocols::ProviderKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    pub provider: ProviderKind,
    pub model: String,
    pub streaming: bool,
}

impl RequestRecord {
    pub fn new(
        provider: ProviderKind,
        model: impl Into<String>,
        streaming: bool,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            prompt: prompt.into(),
            provider,
            model: model.into(),
            streaming,
        }
    }
}

/// Either the accumulated raw text or the error that ended the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub timestamp: DateTime<Utc>,
    pub provider: ProviderKind,
    pub model: String,
    pub streaming: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseRecord {
    pub fn success(request: &RequestRecord, response: impl Into<String>) -> Self {
        Self::from_request(request, Some(response.into()), None)
    }

    pub fn failure(request: &RequestRecord, error: impl Into<String>) -> Self {
        Self::from_request(request, None, Some(error.into()))
    }

    fn from_request(
        request: &RequestRecord,
        response: Option<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            provider: request.provider,
            model: request.model.clone(),
            streaming: request.streaming,
            response,
            error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub last_request: Option<RequestRecord>,
    pub last_response: Option<ResponseRecord>,
}

/// Shared holder of the latest snapshot. Cloning shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct DebugRecorder {
    inner: Arc<RwLock<DebugSnapshot>>,
}

impl DebugRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new exchange; the previous response is cleared.
    pub fn record_request(&self, request: RequestRecord) {
        let mut snapshot = self.inner.write();
        snapshot.last_request = Some(request);
        snapshot.last_response = None;
    }

    pub fn record_response(&self, response: ResponseRecord) {
        self.inner.write().last_response = Some(response);
    }

    pub fn snapshot(&self) -> DebugSnapshot {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let recorder = DebugRecorder::new();
        assert_eq!(recorder.snapshot(), DebugSnapshot::default());
    }

    #[test]
    fn test_request_then_response() {
        let recorder = DebugRecorder::new();
        let request = RequestRecord::new(ProviderKind::OpenAi, "gpt-4o", true, "prompt");
        recorder.record_request(request.clone());
        recorder.record_response(ResponseRecord::success(&request, "<ugt_a>Hola</ugt_a>"));

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.last_request.unwrap().prompt, "prompt");
        let response = snapshot.last_response.unwrap();
        assert_eq!(response.response.as_deref(), Some("<ugt_a>Hola</ugt_a>"));
        assert!(response.error.is_none());
        assert!(response.streaming);
    }

    #[test]
    fn test_new_request_clears_response() {
        let recorder = DebugRecorder::new();
        let shared = recorder.clone();
        let request = RequestRecord::new(ProviderKind::Gemini, "gemini-1.5-pro", false, "one");
        recorder.record_request(request.clone());
        recorder.record_response(ResponseRecord::failure(&request, "boom"));

        shared.record_request(RequestRecord::new(
            ProviderKind::Gemini,
            "gemini-1.5-pro",
            false,
            "two",
        ));
        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.last_request.unwrap().prompt, "two");
        assert!(snapshot.last_response.is_none());
    }

    #[test]
    fn test_snapshot_json() {
        let recorder = DebugRecorder::new();
        let request = RequestRecord::new(ProviderKind::Anthropic, "claude-3-opus-latest", true, "p");
        recorder.record_request(request.clone());
        recorder.record_response(ResponseRecord::failure(&request, "bad key"));

        let json = serde_json::to_value(recorder.snapshot()).unwrap();
        assert_eq!(json["lastRequest"]["provider"], "anthropic");
        assert_eq!(json["lastResponse"]["error"], "bad key");
        assert!(json["lastResponse"].get("response").is_none());
    }
}
