use async_trait::async_trait;

use crate::EmbeddingError;

/// Turns text into a vector of a fixed, provider-defined length.
#[async_trait]
pub trait Embedding: Send + Sync {
    /// One provider call per invocation; failures are never retried here.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimension(&self) -> usize;
}
