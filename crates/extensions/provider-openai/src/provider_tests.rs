use super::*;
use futures::StreamExt;
use ugt_protocols::StreamSignal;

#[test]
fn test_provider_id() {
    let provider = OpenAiProvider::new();
    assert_eq!(provider.id(), "openai");
    assert_eq!(provider.kind(), ProviderKind::OpenAi);
}

#[test]
fn test_default_api_url() {
    let provider = OpenAiProvider::default();
    assert_eq!(provider.api_url, DEFAULT_API_URL);
    assert_eq!(provider.keepalive, DEFAULT_KEEPALIVE);
}

#[test]
fn test_custom_url_and_timeouts() {
    let provider = OpenAiProvider::with_url("https://custom.api/v1")
        .with_timeout(Duration::from_secs(30))
        .with_keepalive_period(Duration::from_secs(5));
    assert_eq!(provider.api_url, "https://custom.api/v1");
    assert_eq!(provider.timeout, Duration::from_secs(30));
    assert_eq!(provider.keepalive, Duration::from_secs(5));
}

#[test]
fn test_build_request_default_model() {
    let provider = OpenAiProvider::new();
    let request = PromptRequest::new("Translate this", "sk-test");
    let api_request = provider.build_request(&request, true);

    assert_eq!(api_request.model, "gpt-4o");
    assert_eq!(api_request.temperature, Some(0.1));
    assert!(api_request.stream);
    assert_eq!(api_request.messages.len(), 1);
    assert_eq!(api_request.messages[0].content, "Translate this");
}

#[test]
fn test_build_request_omits_temperature() {
    let provider = OpenAiProvider::new();
    let request = PromptRequest::new("p", "sk-test").with_model("o3");
    let json = serde_json::to_value(provider.build_request(&request, false)).unwrap();

    assert_eq!(json["model"], "o3");
    assert!(json.get("temperature").is_none());
}

mod http_tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn sse(events: &[&str]) -> String {
        events
            .iter()
            .map(|event| format!("data: {}\n\n", event))
            .collect()
    }

    async fn fragments(stream: FragmentStream) -> Vec<String> {
        stream
            .filter_map(|item| async move {
                match item {
                    Ok(StreamSignal::Fragment(text)) => Some(text),
                    _ => None,
                }
            })
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_stream_success() {
        let mock_server = MockServer::start().await;

        let body = sse(&[
            r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#,
            r#"{"choices":[{"index":0,"delta":{"content":"<ugt_a>Hal"}}]}"#,
            r#"{"choices":[{"index":0,"delta":{"content":"lo</ugt_a>"}}]}"#,
            r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
            "[DONE]",
        ]);

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/"))
            .and(matchers::header("authorization", "Bearer sk-test"))
            .and(matchers::body_partial_json(serde_json::json!({
                "model": "gpt-4o",
                "stream": true
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::with_url(mock_server.uri());
        let stream = provider
            .stream(PromptRequest::new("Translate", "sk-test"))
            .await
            .unwrap();

        assert_eq!(fragments(stream).await, vec!["<ugt_a>Hal", "lo</ugt_a>"]);
    }

    #[tokio::test]
    async fn test_stream_skips_bad_line() {
        let mock_server = MockServer::start().await;

        let body = format!(
            "{}data: {{broken\n\n{}",
            sse(&[r#"{"choices":[{"delta":{"content":"a"}}]}"#]),
            sse(&[r#"{"choices":[{"delta":{"content":"b"}}]}"#, "[DONE]"]),
        );

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::with_url(mock_server.uri());
        let stream = provider
            .stream(PromptRequest::new("Translate", "sk-test"))
            .await
            .unwrap();

        assert_eq!(fragments(stream).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "<ugt_a>Hola</ugt_a>"
                },
                "finish_reason": "stop"
            }]
        })
        .to_string();

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/"))
            .and(matchers::body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_string(&response_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::with_url(mock_server.uri());
        let text = provider
            .complete(PromptRequest::new("Translate", "sk-test"))
            .await
            .unwrap();
        assert_eq!(text, "<ugt_a>Hola</ugt_a>");
    }

    #[tokio::test]
    async fn test_stream_auth_error() {
        let mock_server = MockServer::start().await;

        let error_body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/"))
            .respond_with(ResponseTemplate::new(401).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::with_url(mock_server.uri());
        let result = provider.stream(PromptRequest::new("Translate", "bad-key")).await;

        match result {
            Err(ProviderError::AuthenticationFailed(message)) => {
                assert_eq!(message, "OpenAI API error: Incorrect API key provided");
            }
            Err(other) => panic!("Expected AuthenticationFailed, got {:?}", other),
            Ok(_) => panic!("Expected an error"),
        }
    }

    #[tokio::test]
    async fn test_complete_server_error_without_body() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::with_url(mock_server.uri());
        let result = provider.complete(PromptRequest::new("Translate", "sk-test")).await;

        match result.unwrap_err() {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "OpenAI API error: 500");
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let mock_server = MockServer::start().await;

        let error_body = r#"{"error": {"message": "Rate limit exceeded", "type": "rate_limit_error"}}"#;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/"))
            .respond_with(ResponseTemplate::new(429).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::with_url(mock_server.uri());
        let err = provider
            .complete(PromptRequest::new("Translate", "sk-test"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited(_)));
        }

    #[tokio::test]
    async fn test_missing_credential_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider = OpenAiProvider::with_url(mock_server.uri());
        let result = provider.stream(PromptRequest::new("Translate", "")).await;
        assert!(matches!(result, Err(ProviderError::AuthenticationFailed(_))));
    }
}
