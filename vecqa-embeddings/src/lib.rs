mod error;

#[cfg(feature = "openai")]
mod openai;

pub use error::EmbeddingProviderError;

#[cfg(feature = "openai")]
pub use openai::OpenAiEmbedding;
