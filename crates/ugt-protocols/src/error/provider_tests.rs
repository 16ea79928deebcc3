use super::*;

#[test]
fn test_provider_error_api_error() {
    let err = ProviderError::ApiError {
        status: 500,
        message: "Internal Server Error".to_string(),
    };
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("Internal Server Error"));
}

#[test]
fn test_provider_error_timeout() {
    let err = ProviderError::Timeout(1200);
    assert!(err.to_string().contains("Timeout"));
    assert!(err.to_string().contains("1200"));
}

#[test]
fn test_from_api_response_auth() {
    let err = ProviderError::from_api_response(401, "OpenAI API error: Incorrect API key provided");
    assert!(err.is_authentication());
    assert!(err.to_string().contains("Incorrect API key"));

    let err = ProviderError::from_api_response(403, "Gemini API error: API key not valid");
    assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
}

#[test]
fn test_from_api_response_rate_limited() {
    let err = ProviderError::from_api_response(429, "Anthropic API error: rate_limit_error");
    assert!(matches!(err, ProviderError::RateLimited(_)));
}

#[test]
fn test_from_api_response_context_length() {
    let err = ProviderError::from_api_response(
        400,
        "OpenAI API error: This model's maximum context length is 8192 tokens",
    );
    assert!(matches!(err, ProviderError::ContextLengthExceeded(_)));
}

#[test]
fn test_from_api_response_bad_request() {
    let err = ProviderError::from_api_response(400, "Anthropic API error: max_tokens: must be positive");
    assert!(matches!(err, ProviderError::InvalidRequest(_)));
}

#[test]
fn test_from_api_response_server_error() {
    let err = ProviderError::from_api_response(503, "Gemini API error: overloaded");
    match &err {
        ProviderError::ApiError { status, message } => {
            assert_eq!(*status, 503);
            assert!(message.contains("overloaded"));
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[test]
fn test_network_error_mapping() {
    let timeout = Duration::from_secs(1200);
    let err = ProviderError::network("operation timed out", true, timeout);
    assert!(matches!(err, ProviderError::Timeout(1200)));

    let err = ProviderError::network("connection refused", false, timeout);
    match err {
        ProviderError::Network(msg) => assert_eq!(msg, "connection refused"),
        other => panic!("Expected Network, got {:?}", other),
    }
}
