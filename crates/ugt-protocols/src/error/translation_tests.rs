use super::*;

#[test]
fn test_missing_credential_hint() {
    let err = TranslationError::MissingCredential {
        provider: "openai".to_string(),
    };
    assert_eq!(err.kind(), ErrorKind::MissingCredential);
    assert!(err.credential_hint());
    assert!(err.to_string().contains("openai"));
}

#[test]
fn test_auth_transport_error_hint() {
    let err = TranslationError::from(ProviderError::AuthenticationFailed(
        "Gemini API error: permission denied".to_string(),
    ));
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.credential_hint());
}

#[test]
fn test_keyword_transport_error_hint() {
    let err = TranslationError::from(ProviderError::ApiError {
        status: 400,
        message: "Anthropic API error: invalid x-api-key".to_string(),
    });
    assert!(err.credential_hint());

    let err = TranslationError::from(ProviderError::ApiError {
        status: 500,
        message: "OpenAI API error: 500".to_string(),
    });
    assert!(!err.credential_hint());
}

#[test]
fn test_connection_lost_display() {
    let err = TranslationError::ConnectionLost { idle_secs: 300 };
    assert_eq!(err.kind(), ErrorKind::ConnectionLost);
    assert!(err.to_string().contains("300"));
    assert!(!err.credential_hint());
}

#[test]
fn test_mentions_credentials_case_insensitive() {
    assert!(mentions_credentials("Invalid API Key supplied"));
    assert!(mentions_credentials("expired TOKEN"));
    assert!(mentions_credentials("invalid x-api-key"));
    assert!(!mentions_credentials("model overloaded"));
}

#[test]
fn test_error_kind_serializes_snake_case() {
    let json = serde_json::to_string(&ErrorKind::ConnectionLost).unwrap();
    assert_eq!(json, "\"connection_lost\"");
}
