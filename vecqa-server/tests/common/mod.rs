#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use vecqa_core::{
    ChatError, ChatModel, ChatRequest, ChatResponse, Embedding, EmbeddingError, Match, StoreError,
    VectorStore,
};
use vecqa_rag::QueryPipeline;
use vecqa_server::{build_router, AppState, BearerAuth};

pub const SECRET: &str = "test-secret";

#[derive(Clone, Default)]
pub struct Calls {
    pub embed: Arc<AtomicUsize>,
    pub query: Arc<AtomicUsize>,
    pub complete: Arc<AtomicUsize>,
    pub prompts: Arc<Mutex<Vec<ChatRequest>>>,
}

impl Calls {
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.embed.load(Ordering::SeqCst),
            self.query.load(Ordering::SeqCst),
            self.complete.load(Ordering::SeqCst),
        )
    }
}

pub struct FakeEmbedder {
    calls: Calls,
    fail: bool,
}

#[async_trait]
impl Embedding for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.embed.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbeddingError::Provider("401 invalid api key".to_string()));
        }
        Ok(vec![0.0; 4])
    }

    fn dimension(&self) -> usize {
        4
    }
}

pub struct FakeStore {
    calls: Calls,
    matches: Vec<Match>,
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn query(&self, _vector: &[f32], top_k: usize) -> Result<Vec<Match>, StoreError> {
        self.calls.query.fetch_add(1, Ordering::SeqCst);
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }
}

pub struct FakeChat {
    calls: Calls,
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        self.calls.complete.fetch_add(1, Ordering::SeqCst);
        self.calls.prompts.lock().unwrap().push(request);
        Ok(ChatResponse {
            content: "  Jane Doe owns the Acme Corp account.\n".to_string(),
        })
    }
}

pub fn text_match(id: &str, text: &str) -> Match {
    Match {
        id: id.to_string(),
        score: 0.9,
        metadata: HashMap::from([("text".to_string(), Value::String(text.to_string()))]),
    }
}

pub fn acme_matches() -> Vec<Match> {
    vec![
        text_match("1", "A"),
        text_match("2", "B"),
        text_match("3", "C"),
    ]
}

pub struct TestApp {
    pub router: Router,
    pub calls: Calls,
}

pub struct TestAppBuilder {
    matches: Vec<Match>,
    fail_embedding: bool,
    generation: bool,
    secret: String,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            matches: acme_matches(),
            fail_embedding: false,
            generation: true,
            secret: SECRET.to_string(),
        }
    }
}

impl TestAppBuilder {
    pub fn matches(mut self, matches: Vec<Match>) -> Self {
        self.matches = matches;
        self
    }

    pub fn failing_embedding(mut self) -> Self {
        self.fail_embedding = true;
        self
    }

    pub fn without_generation(mut self) -> Self {
        self.generation = false;
        self
    }

    pub fn secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    pub fn build(self) -> TestApp {
        let calls = Calls::default();
        let embedder = FakeEmbedder {
            calls: calls.clone(),
            fail: self.fail_embedding,
        };
        let store = FakeStore {
            calls: calls.clone(),
            matches: self.matches,
        };
        let mut pipeline = QueryPipeline::builder(Arc::new(embedder), Arc::new(store))
            .with_max_top_k(20);
        if self.generation {
            pipeline = pipeline.with_generator(Arc::new(FakeChat {
                calls: calls.clone(),
            }));
        }
        let state = AppState::new(
            pipeline.build().unwrap(),
            BearerAuth::new(SecretString::new(self.secret)),
            3,
        );
        TestApp {
            router: build_router(state),
            calls,
        }
    }
}

pub fn app() -> TestApp {
    TestAppBuilder::default().build()
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
