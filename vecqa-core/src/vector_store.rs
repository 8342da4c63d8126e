use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{StoreError, Value};

/// Metadata key holding the retrievable text of a match.
pub const TEXT_KEY: &str = "text";

/// One similarity hit returned by a vector index.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Match {
    /// Returns the string stored under `key`, or `""` when the key is absent
    /// or holds a non-string value.
    pub fn field(&self, key: &str) -> &str {
        self.metadata
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        self.field(TEXT_KEY)
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Returns at most `top_k` matches for `vector`, most similar first.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>, StoreError>;
}
