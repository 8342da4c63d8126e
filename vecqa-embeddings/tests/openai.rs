use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::Client;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vecqa_core::{Embedding, EmbeddingError};
use vecqa_embeddings::OpenAiEmbedding;

fn embedder_for(server: &MockServer, dimension: usize) -> OpenAiEmbedding {
    let config = OpenAIConfig::new()
        .with_api_key("test-key")
        .with_api_base(format!("{}/v1", server.uri()));
    OpenAiEmbedding::with_client(Client::with_config(config), "text-embedding-3-small", dimension)
}

fn embedding_body(values: serde_json::Value) -> serde_json::Value {
    json!({
        "data": [
            {"embedding": values, "index": 0, "object": "embedding"}
        ],
        "model": "text-embedding-3-small",
        "object": "list",
        "usage": {"prompt_tokens": 1, "total_tokens": 1}
    })
}

#[tokio::test]
async fn openai_embedding_maps_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "text-embedding-3-small"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(embedding_body(json!([0.1, 0.2, 0.3]))))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = embedder_for(&server, 3);

    let out = embedder.embed("who is the account owner for Acme Corp").await.unwrap();
    assert_eq!(out, vec![0.1, 0.2, 0.3]);
    assert_eq!(embedder.dimension(), 3);
}

#[tokio::test]
async fn openai_embedding_rejects_wrong_dimension() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(embedding_body(json!([0.1, 0.2]))))
        .mount(&server)
        .await;

    let err = embedder_for(&server, 3).embed("hello").await.unwrap_err();
    assert!(matches!(
        &err,
        EmbeddingError::InvalidResponse(message) if message.contains("expected embedding dimension 3, got 2")
    ));
}

#[tokio::test]
async fn openai_embedding_rejects_empty_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "model": "text-embedding-3-small",
            "object": "list",
            "usage": {"prompt_tokens": 1, "total_tokens": 1}
        })))
        .mount(&server)
        .await;

    let err = embedder_for(&server, 3).embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
}

#[tokio::test]
async fn openai_embedding_surfaces_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let err = embedder_for(&server, 3).embed("hello").await.unwrap_err();
    assert!(matches!(
        &err,
        EmbeddingError::Provider(message) if message.contains("Incorrect API key")
    ));
}

#[tokio::test]
async fn openai_embedding_rejects_blank_input_without_calling_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = embedder_for(&server, 3).embed("   ").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidInput(_)));
}

#[tokio::test]
async fn openai_embedding_surfaces_rate_limit_after_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "message": "Rate limit reached for text-embedding-3-small",
                "type": "requests",
                "param": null,
                "code": "rate_limit_exceeded"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = embedder_for(&server, 3);
    let result = tokio::time::timeout(Duration::from_secs(5), embedder.embed("hello"))
        .await
        .expect("rate limit must not be retried until the deadline");

    let err = result.unwrap_err();
    assert!(matches!(
        &err,
        EmbeddingError::Provider(message) if message.contains("Rate limit reached")
    ));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn openai_embedding_does_not_retry_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {
                "message": "The server is overloaded",
                "type": "server_error",
                "param": null,
                "code": null
            }
        })))
        .mount(&server)
        .await;

    let embedder = embedder_for(&server, 3);
    let result = tokio::time::timeout(Duration::from_secs(5), embedder.embed("hello"))
        .await
        .expect("server error must not be retried until the deadline");

    assert!(result.is_err());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
