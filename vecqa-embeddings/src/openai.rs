use crate::EmbeddingProviderError;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::CreateEmbeddingRequestArgs;
use async_openai::Client;
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;
use vecqa_core::{Embedding, EmbeddingError};

#[derive(Clone)]
pub struct OpenAiEmbedding {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedding {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        let config = OpenAIConfig::default().with_api_key(api_key);
        Self::with_client(Client::with_config(config), model, dimension)
    }

    /// Targets an OpenAI-compatible endpoint other than the public API.
    pub fn with_api_base(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        let config = OpenAIConfig::default()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self::with_client(Client::with_config(config), model, dimension)
    }

    /// Any retry policy already set on `client` is replaced: each `embed`
    /// call makes exactly one request and surfaces its error.
    pub fn with_client(
        client: Client<OpenAIConfig>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            client: client.with_backoff(single_attempt()),
            model: model.into(),
            dimension,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

fn map_openai_error(error: OpenAIError) -> EmbeddingError {
    match error {
        OpenAIError::JSONDeserialize(err) => {
            EmbeddingProviderError::InvalidResponse(err.to_string()).into()
        }
        other => EmbeddingProviderError::Request(other.to_string()).into(),
    }
}

#[async_trait]
impl Embedding for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingProviderError::EmptyInput.into());
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(text)
            .build()
            .map_err(|err| EmbeddingError::Other(Box::new(err)))?;

        tracing::debug!(model = %self.model, chars = text.len(), "requesting embedding");
        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| {
                EmbeddingProviderError::InvalidResponse("missing embedding".to_string())
            })?;

        if embedding.len() != self.dimension {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected embedding dimension {}, got {}",
                self.dimension,
                embedding.len()
            ))
            .into());
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
