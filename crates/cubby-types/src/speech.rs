//! Voice/prosody profiles per emotion, plus speech collaborator errors.
//!
//! The emotion-to-voice mapping is a fixed configuration table. Standard
//! cloud voices expose no explicit "emotion" knob, so the profiles
//! approximate one with pitch, rate, and emphasis that the synthesizer
//! renders as SSML.

use thiserror::Error;

use crate::emotion::EmotionLabel;

/// Prosody parameters for one emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceProfile {
    /// Pitch shift in semitones relative to the base voice.
    pub pitch_semitones: i8,
    /// SSML speaking rate keyword.
    pub rate: &'static str,
    /// SSML emphasis level, if any.
    pub emphasis: Option<&'static str>,
}

impl VoiceProfile {
    /// Look up the fixed profile for an emotion label.
    pub fn for_emotion(emotion: EmotionLabel) -> VoiceProfile {
        match emotion {
            EmotionLabel::Cheerful => VoiceProfile {
                pitch_semitones: 2,
                rate: "fast",
                emphasis: Some("moderate"),
            },
            EmotionLabel::Curious => VoiceProfile {
                pitch_semitones: 2,
                rate: "medium",
                emphasis: None,
            },
            EmotionLabel::Affectionate => VoiceProfile {
                pitch_semitones: -1,
                rate: "slow",
                emphasis: None,
            },
        }
    }
}

/// Errors from the speech collaborators (synthesis and transcription).
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("invalid audio payload: {0}")]
    InvalidAudio(String),

    #[error("speech service error: {0}")]
    Upstream(String),

    #[error("no speech recognized")]
    NothingRecognized,

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
