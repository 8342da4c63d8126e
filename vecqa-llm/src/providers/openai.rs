//! OpenAI chat completions client

use std::time::Duration;

use url::Url;
use vecqa_core::{ChatError, ChatModel, ChatRequest, ChatResponse};

use crate::openai_compatible::OpenAiCompatibleClient;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI chat client
#[derive(Clone, Debug)]
pub struct OpenAiChatClient(OpenAiCompatibleClient);

impl OpenAiChatClient {
    /// Create a client against the public OpenAI endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self, ChatError> {
        Self::with_base_url(api_key, OPENAI_BASE_URL)
    }

    /// Create a client against any OpenAI-compatible endpoint
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl AsRef<str>,
    ) -> Result<Self, ChatError> {
        let client = OpenAiCompatibleClient::builder()
            .base_url(base_url.as_ref())?
            .api_key(api_key)
            .default_model(DEFAULT_CHAT_MODEL)
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self(client))
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.0.set_default_model(model);
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ChatError> {
        self.0.set_timeout(timeout)?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        self.0.default_model()
    }

    pub fn base_url(&self) -> &Url {
        self.0.base_url()
    }
}

#[async_trait::async_trait]
impl ChatModel for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        self.0.complete(request).await
    }
}
