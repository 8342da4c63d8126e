use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vecqa_pinecone::client::{PineconeHttpClient, API_VERSION};
use vecqa_pinecone::PineconeStoreError;

#[tokio::test]
async fn query_sends_api_key_and_version_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("Api-Key", "test-key"))
        .and(header("X-Pinecone-API-Version", API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"matches": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = PineconeHttpClient::new(server.uri(), "test-key".to_string()).unwrap();
    client
        .post_typed::<Value, Value>("/query", &json!({"vector": [0.1], "topK": 1}))
        .await
        .unwrap();
}

#[tokio::test]
async fn maps_api_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "30")
                .set_body_json(json!({"message": "rate limit"})),
        )
        .mount(&server)
        .await;

    let client = PineconeHttpClient::new(server.uri(), "test-key".to_string()).unwrap();
    let err = client
        .post_typed::<Value, Value>("/query", &json!({}))
        .await.unwrap_err();
    assert!(err.to_string().contains("429"));
    assert!(matches!(
        err,
        PineconeStoreError::Api {
            status: 429,
            retry_after_seconds: Some(30),
            ..
        }
    ));
}

#[tokio::test]
async fn reads_nested_control_plane_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/x"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": "FORBIDDEN", "message": "key not allowed"}
        })))
        .mount(&server)
        .await;

    let client = PineconeHttpClient::new(server.uri(), "test-key".to_string()).unwrap();
    let err = client
        .get_typed::<serde_json::Value>("/indexes/x")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("key not allowed"));
}

#[test]
fn rejects_empty_api_key_and_bad_url() {
    assert!(PineconeHttpClient::new("https://example.test".to_string(), " ".to_string()).is_err());
    assert!(PineconeHttpClient::new("not a url".to_string(), "key".to_string()).is_err());
}

#[test]
fn debug_output_redacts_api_key() {
    let client =
        PineconeHttpClient::new("https://example.test".to_string(), "secret-key".to_string())
            .unwrap();
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("secret-key"));
    assert!(rendered.contains("<redacted>"));
}
