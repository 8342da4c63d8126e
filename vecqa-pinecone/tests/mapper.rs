use serde_json::json;
use vecqa_pinecone::mapper::{host_to_base_url, query_match_to_match};
use vecqa_pinecone::types::QueryMatch;

fn raw(metadata: Option<serde_json::Value>) -> QueryMatch {
    QueryMatch {
        id: "id-1".to_string(),
        score: 0.5,
        metadata,
    }
}

#[test]
fn query_match_keeps_all_metadata() {
    let m = query_match_to_match(raw(Some(json!({"text": "body", "source": "tweet"})))).unwrap();
    assert_eq!(m.id, "id-1");
    assert_eq!(m.text(), "body");
    assert_eq!(m.metadata.get("source"), Some(&json!("tweet")));
}

#[test]
fn null_metadata_becomes_empty() {
    let m = query_match_to_match(raw(Some(serde_json::Value::Null))).unwrap();
    assert!(m.metadata.is_empty());
}

#[test]
fn host_gets_https_scheme() {
    assert_eq!(
        host_to_base_url("idx-abc.svc.pinecone.io"),
        "https://idx-abc.svc.pinecone.io"
    );
    assert_eq!(host_to_base_url("http://127.0.0.1:9000/"), "http://127.0.0.1:9000");
}
