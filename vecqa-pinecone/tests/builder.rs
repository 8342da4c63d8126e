use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vecqa_pinecone::{Metric, PineconeStoreError, PineconeVectorStore};

#[tokio::test]
async fn builder_with_host_skips_control_plane() {
    let store = PineconeVectorStore::builder()
        .host("receptional-abc123.svc.pinecone.io")
        .api_key("key")
        .namespace("ns1")
        .build()
        .await
        .unwrap();

    assert_eq!(store.namespace(), Some("ns1"));
    assert_eq!(store.dimension(), 1536);
    assert_eq!(store.metric(), Metric::Cosine);
}

#[tokio::test]
async fn builder_requires_api_key() {
    let err = PineconeVectorStore::builder()
        .host("https://example.test")
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, PineconeStoreError::Config(message) if message.contains("api_key")));
}

#[tokio::test]
async fn builder_requires_host_or_index_name() {
    let err = PineconeVectorStore::builder()
        .api_key("key")
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, PineconeStoreError::Config(message) if message.contains("index_name")));
}

#[tokio::test]
async fn builder_rejects_zero_dimension() {
    let err = PineconeVectorStore::builder()
        .host("https://example.test")
        .api_key("key")
        .dimension(0)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, PineconeStoreError::Config(_)));
}

#[tokio::test]
async fn empty_namespace_means_default_namespace() {
    let store = PineconeVectorStore::builder()
        .host("https://example.test")
        .api_key("key")
        .namespace("")
        .build()
        .await
        .unwrap();
    assert_eq!(store.namespace(), None);
}

#[tokio::test]
async fn builder_resolves_host_from_index_name() {
    let control = MockServer::start().await;
    let data = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indexes/receptional"))
        .and(header("Api-Key", "key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "receptional",
            "dimension": 3,
            "metric": "cosine",
            "host": data.uri(),
            "status": {"ready": true, "state": "Ready"}
        })))
        .expect(1)
        .mount(&control)
        .await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"matches": []})))
        .expect(1)
        .mount(&data)
        .await;

    let store = PineconeVectorStore::builder()
        .control_url(control.uri())
        .index_name("receptional")
        .api_key("key")
        .dimension(3)
        .build()
        .await
        .unwrap();

    assert_eq!(store.index_name(), Some("receptional"));
    let matches = store.query_matches(&[0.1, 0.2, 0.3], 3).await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn builder_reports_missing_index() {
    let control = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "NOT_FOUND", "message": "Resource missing not found"},
            "status": 404
        })))
        .mount(&control)
        .await;

    let err = PineconeVectorStore::builder()
        .control_url(control.uri())
        .index_name("missing")
        .api_key("key")
        .build()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PineconeStoreError::IndexNotFound { index_name } if index_name == "missing"
    ));
}

#[tokio::test]
async fn metric_mismatch_does_not_fail_build() {
    let control = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/receptional"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "receptional",
            "dimension": 1536,
            "metric": "dotproduct",
            "host": "receptional-abc123.svc.pinecone.io"
        })))
        .mount(&control)
        .await;

    let store = PineconeVectorStore::builder()
        .control_url(control.uri())
        .index_name("receptional")
        .api_key("key")
        .metric(Metric::Cosine)
        .build()
        .await
        .unwrap();

    assert_eq!(store.metric(), Metric::Cosine);
}

#[test]
fn metric_parses_known_names() {
    assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
    assert_eq!("Euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
    assert_eq!("dotproduct".parse::<Metric>().unwrap(), Metric::Dotproduct);
    assert!("manhattan".parse::<Metric>().is_err());
    assert_eq!(Metric::Dotproduct.to_string(), "dotproduct");
}
