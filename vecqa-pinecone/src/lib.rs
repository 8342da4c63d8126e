//! Pinecone vector store adapter for vecqa.
//!
//! This crate provides a query-only `PineconeVectorStore` that:
//! - resolves the index data-plane host from its name through the control
//!   plane (or takes it directly),
//! - checks the configured dimension and metric against the index,
//! - implements the core `VectorStore` trait for a fixed namespace.
//!
//! Environment variables commonly used to configure it:
//! - `PINECONE_API_KEY`
//! - `PINECONE_INDEX`
//! - `PINECONE_INDEX_HOST` (optional)
//! - `PINECONE_NAMESPACE` (optional)

pub mod client;
mod config;
mod error;
pub mod mapper;
mod store;
pub mod types;

pub use config::{PineconeStoreBuilder, DEFAULT_CONTROL_URL, DEFAULT_DIMENSION};
pub use error::PineconeStoreError;
pub use store::PineconeVectorStore;
pub use types::Metric;
