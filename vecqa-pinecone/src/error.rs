use thiserror::Error;
use vecqa_core::StoreError;

#[derive(Debug, Error)]
pub enum PineconeStoreError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error(
        "pinecone api error {status}: {message} (retry_after={retry_after_seconds:?}, namespace={namespace:?})"
    )]
    Api {
        status: u16,
        message: String,
        retry_after_seconds: Option<u64>,
        namespace: Option<String>,
    },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("pinecone index '{index_name}' does not exist")]
    IndexNotFound { index_name: String },
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl From<PineconeStoreError> for StoreError {
    fn from(value: PineconeStoreError) -> Self {
        match value {
            PineconeStoreError::DimensionMismatch { expected, got } => {
                StoreError::DimensionMismatch { expected, got }
            }
            PineconeStoreError::IndexNotFound { index_name } => {
                StoreError::IndexNotFound(index_name)
            }
            other => StoreError::Internal(Box::new(other)),
        }
    }
}
