//! HTTP front end for the vecqa query pipeline.
//!
//! The router is built from an [`AppState`] holding an already-assembled
//! [`vecqa_rag::QueryPipeline`], so tests drive it with in-memory fakes and
//! the binary wires in the OpenAI and Pinecone clients.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use auth::BearerAuth;
pub use config::{ConfigError, FromEnv, Settings};
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
