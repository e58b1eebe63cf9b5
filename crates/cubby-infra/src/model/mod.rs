//! Language-model collaborator backends.
//!
//! [`ModelBackend`] selects between the real Gemini client and the
//! deterministic dev stub at wiring time, delegating the
//! [`ChatModel`] trait by plain enum dispatch (the RPITIT trait is not
//! object-safe, and two variants don't justify boxing).

pub mod gemini;

use cubby_core::collab::ChatModel;
use cubby_types::model::{ModelError, ModelReply, ModelRequest};

use crate::dev::DevChatModel;
use gemini::GeminiModel;

/// Concrete language-model backend selected at startup.
pub enum ModelBackend {
    Gemini(GeminiModel),
    Dev(DevChatModel),
}

impl ChatModel for ModelBackend {
    fn name(&self) -> &str {
        match self {
            ModelBackend::Gemini(m) => m.name(),
            ModelBackend::Dev(m) => m.name(),
        }
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        match self {
            ModelBackend::Gemini(m) => m.generate(request).await,
            ModelBackend::Dev(m) => m.generate(request).await,
        }
    }
}
