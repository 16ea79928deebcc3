use futures::StreamExt;
use serde_json::json;

use super::*;

#[test]
fn test_part_texts_literal() {
    assert_eq!(part_texts("<ugt_a>Hola</ugt_a>".to_string()), vec!["<ugt_a>Hola</ugt_a>"]);
    // Keeps surrounding whitespace of literal text
    assert_eq!(part_texts(" Hola\n".to_string()), vec![" Hola\n"]);
}

#[test]
fn test_part_texts_inner_array() {
    let text = r#"json
[{"ugt_a": "<ugt_a>Hola</ugt_a>"}, {"ugt_b": "<ugt_b>Mundo</ugt_b>", "n": 3}]"#;
    assert_eq!(
        part_texts(text.to_string()),
        vec!["<ugt_a>Hola</ugt_a>", "<ugt_b>Mundo</ugt_b>"]
    );
}

#[test]
fn test_part_texts_keeps_key_order() {
    let text = r#"[{"ugt_b": "<ugt_b>Mundo</ugt_b>", "ugt_a": "<ugt_a>Hola</ugt_a>"}]"#;
    assert_eq!(
        part_texts(text.to_string()),
        vec!["<ugt_b>Mundo</ugt_b>", "<ugt_a>Hola</ugt_a>"]
    );
}

#[test]
fn test_part_texts_array_without_strings_is_literal() {
    assert_eq!(part_texts("[1, 2]".to_string()), vec!["[1, 2]"]);
    assert_eq!(part_texts("[not json]".to_string()), vec!["[not json]"]);
}

#[test]
fn test_finish_status() {
    assert_eq!(finish_status("STOP"), None);
    assert_eq!(finish_status("SAFETY").as_deref(), Some("Content blocked: SAFETY"));
    assert_eq!(
        finish_status("MAX_TOKENS").as_deref(),
        Some("Stream ended by Gemini: MAX_TOKENS")
    );
}

#[test]
fn test_object_texts_with_status() {
    let object = json!({
        "candidates": [{
            "content": {"parts": [{"text": "<ugt_a>Ho"}, {"text": "la</ugt_a>"}], "role": "model"},
            "finishReason": "MAX_TOKENS"
        }]
    });
    assert_eq!(
        object_texts(object),
        vec![
            "<ugt_a>Ho",
            "la</ugt_a>",
            "<ugt_status_gemini>[Stream ended by Gemini: MAX_TOKENS]</ugt_status_gemini>",
        ]
    );
}

#[test]
fn test_object_texts_blocked() {
    let object = json!({"candidates": [{"finishReason": "SAFETY", "index": 0}]});
    assert_eq!(
        object_texts(object),
        vec!["<ugt_status_gemini>[Content blocked: SAFETY]</ugt_status_gemini>"]
    );
}

#[test]
fn test_object_texts_error() {
    let object = json!({"error": {"code": 500, "message": "Internal error"}});
    assert_eq!(
        object_texts(object),
        vec!["<ugt_status_gemini>[Error: Internal error]</ugt_status_gemini>"]
    );

    let object = json!({"error": {"code": 500}});
    assert_eq!(
        object_texts(object),
        vec!["<ugt_status_gemini>[Error: Unknown Gemini error]</ugt_status_gemini>"]
    );
}

#[test]
fn test_object_texts_unrecognised() {
    assert!(object_texts(json!({"candidates": "oops"})).is_empty());
    assert!(object_texts(json!({"usageMetadata": {}})).is_empty());
}

#[tokio::test]
async fn test_object_fragments_across_chunks() {
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
        Ok(b"[{\"candidates\": [{\"content\": {\"parts\": [{\"text\": \"<ugt_a>Ha".to_vec()),
        Ok(b"llo</ugt_a>\"}]}}]}\n,\r\n{\"candidates\": [{\"content\": {\"parts\": [{\"text\": \"<ugt_b>x</ugt_b>\"}]}, \"finishReason\": \"STOP\"}]}\n]".to_vec()),
    ];
    let items: Vec<_> = object_fragments(futures::stream::iter(chunks)).collect().await;

    let texts: Vec<String> = items
        .into_iter()
        .map(|item| item.unwrap().as_fragment().unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["<ugt_a>Hallo</ugt_a>", "<ugt_b>x</ugt_b>"]);
}

#[tokio::test]
async fn test_object_fragments_transport_error() {
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
        Ok(b"[{\"candidates\": [{\"content\": {\"parts\": [{\"text\": \"a\"}]}}]}".to_vec()),
        Err(std::io::Error::other("connection reset")),
    ];
    let items: Vec<_> = object_fragments(futures::stream::iter(chunks)).collect().await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap().as_fragment(), Some("a"));
    assert!(matches!(items[1], Err(ProviderError::StreamError(_))));
}
