//! External collaborator traits.
//!
//! These are the seams between the guardrail pipeline and the network:
//! language model, speech synthesis, speech-to-text, and sentiment.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).
//! Concrete HTTP clients live in cubby-infra; tests use in-process
//! recording doubles.

use cubby_types::emotion::EmotionLabel;
use cubby_types::model::{ModelError, ModelReply, ModelRequest, SentimentError};
use cubby_types::speech::SpeechError;

/// The language-model collaborator.
///
/// Receives the rendered system preamble and *redacted* user text.
/// Implementations attach the fixed safety-category block list to
/// every request and surface an upstream block as
/// [`ModelError::SafetyBlocked`] so the orchestrator can substitute a
/// canned redirect instead of propagating a raw refusal.
pub trait ChatModel: Send + Sync {
    /// Human-readable backend name (e.g. "gemini", "dev").
    fn name(&self) -> &str;

    /// Generate a reply for one chat turn.
    fn generate(
        &self,
        request: &ModelRequest,
    ) -> impl std::future::Future<Output = Result<ModelReply, ModelError>> + Send;
}

/// The speech-synthesis collaborator: text + emotion -> base64 audio.
///
/// The emotion selects a fixed voice/prosody profile
/// ([`cubby_types::speech::VoiceProfile`]); implementations render it
/// however their backend expresses prosody.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(
        &self,
        text: &str,
        emotion: EmotionLabel,
    ) -> impl std::future::Future<Output = Result<String, SpeechError>> + Send;
}

/// The speech-to-text collaborator: base64 audio -> transcript.
pub trait SpeechToText: Send + Sync {
    fn transcribe(
        &self,
        audio_b64: &str,
    ) -> impl std::future::Future<Output = Result<String, SpeechError>> + Send;
}

/// The optional sentiment collaborator: text -> polarity in [-1.0, 1.0].
pub trait SentimentAnalyzer: Send + Sync {
    fn score(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<f32, SentimentError>> + Send;
}
