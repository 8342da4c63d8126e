//! Provider-specific LLM clients

#[cfg(feature = "openai")]
pub mod openai;
