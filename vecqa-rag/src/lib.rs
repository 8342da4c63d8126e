//! Query orchestration: validate, embed, search, and optionally generate.
//!
//! [`QueryPipeline`] owns no state beyond its injected collaborators, so one
//! instance is built at startup and shared by every request.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use vecqa_core::{ChatError, EmbeddingError, StoreError};

mod pipeline;
pub mod prompt;

pub use pipeline::{QueryPipeline, QueryPipelineBuilder};
pub use prompt::PromptTemplate;

pub const DEFAULT_MAX_TOP_K: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Generation(#[from] ChatError),
    #[error("{stage} step timed out after {after:?}")]
    Timeout { stage: Stage, after: Duration },
    #[error("prompt rendering failed: {0}")]
    Prompt(String),
    #[error("invalid pipeline configuration: {0}")]
    Config(String),
}

impl RagError {
    /// True when the caller's input was at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RagError::Validation(_))
    }
}

/// Steps a query moves through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Received,
    Embedded,
    Retrieved,
    Generating,
    Responded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Embedded => "embedding",
            Stage::Retrieved => "retrieval",
            Stage::Generating => "generation",
            Stage::Responded => "responded",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug)]
pub struct RagQuery {
    pub query: String,
    pub top_k: usize,
}

impl RagQuery {
    pub fn new(query: impl Into<String>, top_k: usize) -> Self {
        Self {
            query: query.into(),
            top_k,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RagAnswer {
    pub context: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}
