//! Chat turn types for the conversation pipeline.
//!
//! A turn flows through the orchestrator as a [`TurnRequest`] and comes
//! out as a [`TurnOutcome`]. The [`ChatTurn`] record is what the local
//! transcript ring buffer holds -- note it carries the *redacted*
//! prompt, never the raw input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::emotion::EmotionLabel;

/// Maximum length of a text chat message.
pub const MAX_MESSAGE_LEN: usize = 300;

/// Maximum length of a base64 audio payload (~3.5 MB of audio).
pub const MAX_AUDIO_LEN: usize = 5_000_000;

/// One chat turn request entering the pipeline.
///
/// At least one of `message` / `audio` must be present; audio wins
/// when both are supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnRequest {
    pub session_id: String,
    pub message: Option<String>,
    /// Base64-encoded audio recording of the child speaking.
    pub audio: Option<String>,
}

/// How a turn terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDisposition {
    /// The model answered normally.
    Answered,
    /// Daily quota exhausted; the reply is the canned limit message.
    LimitReached,
    /// The upstream safety filter fired; the reply is a canned redirect.
    Redirected,
}

impl TurnDisposition {
    pub fn is_limit_reached(&self) -> bool {
        matches!(self, TurnDisposition::LimitReached)
    }
}

/// A completed chat turn leaving the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub text: String,
    pub emotion: EmotionLabel,
    /// Base64 MP3 of the spoken reply.
    pub audio: String,
    /// Transcription echo when the turn originated from audio.
    pub transcribed: Option<String>,
    pub disposition: TurnDisposition,
}

/// A transcript entry for the parent-facing local log.
///
/// Raw input text is deliberately absent: only the redacted prompt is
/// ever written anywhere, so PII cannot outlive the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub redacted_prompt: String,
    pub reply: String,
    pub emotion: EmotionLabel,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_serde() {
        let json = serde_json::to_string(&TurnDisposition::LimitReached).unwrap();
        assert_eq!(json, "\"limit_reached\"");
    }

    #[test]
    fn test_outcome_serializes_emotion_lowercase() {
        let outcome = TurnOutcome {
            text: "Hi!".to_string(),
            emotion: EmotionLabel::Cheerful,
            audio: String::new(),
            transcribed: None,
            disposition: TurnDisposition::Answered,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"emotion\":\"cheerful\""));
    }

    #[test]
    fn test_turn_request_deserializes_partial_body() {
        let req: TurnRequest =
            serde_json::from_str(r#"{"session_id":"abc","message":"hi"}"#).unwrap();
        assert_eq!(req.message.as_deref(), Some("hi"));
        assert!(req.audio.is_none());
    }
}
