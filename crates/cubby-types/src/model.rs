//! Language-model collaborator request/response types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request to the language-model collaborator for one reply.
///
/// `user_text` has already been through PII redaction by the time a
/// request is constructed -- raw input never reaches this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Rendered COPPA-compliant system preamble.
    pub preamble: String,
    /// Redacted user text.
    pub user_text: String,
    /// Hard cap on generated tokens.
    pub max_output_tokens: u32,
}

/// A generated reply from the language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReply {
    pub text: String,
}

/// Errors from the language-model collaborator.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The upstream content-safety filter blocked the generation.
    /// Non-fatal: the orchestrator substitutes a canned redirect.
    #[error("generation blocked by safety filter ({category})")]
    SafetyBlocked { category: String },

    #[error("model provider error: {0}")]
    Upstream(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Errors from the sentiment collaborator.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("sentiment service error: {0}")]
    Upstream(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
