//! Shared contracts for the vecqa workspace.
//!
//! The three external collaborators of a query (embedding provider, vector
//! index, chat completion provider) are modelled as object-safe async traits so
//! that the orchestrator can hold them as `Arc<dyn ...>` and tests can swap in
//! fakes.

mod embedding;
mod error;
mod llm;
mod vector_store;

pub use embedding::Embedding;
pub use error::{ChatError, EmbeddingError, StoreError};
pub use llm::{ChatModel, ChatRequest, ChatResponse, Message, Role};
pub use serde_json::Value;
pub use vector_store::{Match, VectorStore, TEXT_KEY};
