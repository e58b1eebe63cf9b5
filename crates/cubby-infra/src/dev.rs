//! Offline development collaborators.
//!
//! With `DEV_MODE=1` the server runs without any Google credentials:
//! deterministic stand-ins replace the model, speech, and sentiment
//! clients so the full pipeline (redaction, quota, emotion, logging)
//! can be exercised end to end on a laptop.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use cubby_core::collab::{ChatModel, SentimentAnalyzer, SpeechSynthesizer, SpeechToText};
use cubby_types::emotion::EmotionLabel;
use cubby_types::model::{ModelError, ModelReply, ModelRequest, SentimentError};
use cubby_types::speech::SpeechError;

/// Deterministic chat model for offline development.
#[derive(Default)]
pub struct DevChatModel;

impl ChatModel for DevChatModel {
    fn name(&self) -> &str {
        "dev"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        Ok(ModelReply {
            text: format!(
                "What a fun thing to say! You told me: {}. Want to hear more about it?",
                request.user_text
            ),
        })
    }
}

/// Fake synthesizer: encodes a marker string instead of real audio.
#[derive(Default)]
pub struct DevTts;

impl SpeechSynthesizer for DevTts {
    async fn synthesize(&self, text: &str, emotion: EmotionLabel) -> Result<String, SpeechError> {
        Ok(BASE64.encode(format!("dev-audio|{emotion}|{text}")))
    }
}

/// Fake recognizer: decodes the payload as UTF-8 text.
///
/// Lets integration tests send a "spoken" message by base64-encoding
/// plain text. Non-text bytes fall back to a fixed phrase.
#[derive(Default)]
pub struct DevStt;

impl SpeechToText for DevStt {
    async fn transcribe(&self, audio_b64: &str) -> Result<String, SpeechError> {
        let bytes = BASE64
            .decode(audio_b64)
            .map_err(|e| SpeechError::InvalidAudio(e.to_string()))?;
        let text = match String::from_utf8(bytes) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return Err(SpeechError::NothingRecognized),
            Err(_) => "tell me a story".to_string(),
        };
        Ok(text)
    }
}

/// Word-list sentiment stand-in.
#[derive(Default)]
pub struct DevSentiment;

impl SentimentAnalyzer for DevSentiment {
    async fn score(&self, text: &str) -> Result<f32, SentimentError> {
        let lower = text.to_lowercase();
        if ["sad", "miss", "cry", "scared"].iter().any(|w| lower.contains(w)) {
            Ok(-0.6)
        } else if ["love", "yay", "fun", "happy"].iter().any(|w| lower.contains(w)) {
            Ok(0.6)
        } else {
            Ok(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dev_stt_round_trips_text() {
        let encoded = BASE64.encode("hi buddy");
        assert_eq!(DevStt.transcribe(&encoded).await.unwrap(), "hi buddy");
    }

    #[tokio::test]
    async fn test_dev_stt_blank_audio_is_nothing_recognized() {
        let encoded = BASE64.encode("   ");
        let err = DevStt.transcribe(&encoded).await.unwrap_err();
        assert!(matches!(err, SpeechError::NothingRecognized));
    }

    #[tokio::test]
    async fn test_dev_sentiment_polarity() {
        assert!(DevSentiment.score("I love my dog").await.unwrap() > 0.0);
        assert!(DevSentiment.score("I miss grandma").await.unwrap() < 0.0);
        assert_eq!(DevSentiment.score("what is a cloud").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_dev_model_echoes_input() {
        let reply = DevChatModel
            .generate(&ModelRequest {
                preamble: String::new(),
                user_text: "dinosaurs".to_string(),
                max_output_tokens: 64,
            })
            .await
            .unwrap();
        assert!(reply.text.contains("dinosaurs"));
    }
}
