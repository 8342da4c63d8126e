// OpenAI-compatible client (always available)
pub mod openai_compatible;

// Provider-specific clients (feature-gated)
pub mod providers;

pub use vecqa_core::{ChatModel, ChatRequest, ChatResponse, Message, Role};

pub use openai_compatible::{
    ChatCompletionRequest, OpenAiCompatibleBuilder, OpenAiCompatibleClient,
};

#[cfg(feature = "openai")]
pub use providers::openai::{OpenAiChatClient, OPENAI_BASE_URL};
