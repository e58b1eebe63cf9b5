//! Speech backends: synthesis (text + emotion -> base64 audio) and
//! transcription (base64 audio -> text).

pub mod stt;
pub mod tts;

use cubby_core::collab::{SpeechSynthesizer, SpeechToText};
use cubby_types::emotion::EmotionLabel;
use cubby_types::speech::SpeechError;

use crate::dev::{DevStt, DevTts};
use stt::GoogleStt;
use tts::GoogleTts;

/// TTS backend selected at startup.
///
/// Enum delegation rather than trait objects: the collaborator traits
/// use RPITIT async and are not object-safe.
pub enum TtsBackend {
    Google(GoogleTts),
    Dev(DevTts),
}

impl SpeechSynthesizer for TtsBackend {
    async fn synthesize(&self, text: &str, emotion: EmotionLabel) -> Result<String, SpeechError> {
        match self {
            TtsBackend::Google(tts) => tts.synthesize(text, emotion).await,
            TtsBackend::Dev(tts) => tts.synthesize(text, emotion).await,
        }
    }
}

/// STT backend selected at startup.
pub enum SttBackend {
    Google(GoogleStt),
    Dev(DevStt),
}

impl SpeechToText for SttBackend {
    async fn transcribe(&self, audio_b64: &str) -> Result<String, SpeechError> {
        match self {
            SttBackend::Google(stt) => stt.transcribe(audio_b64).await,
            SttBackend::Dev(stt) => stt.transcribe(audio_b64).await,
        }
    }
}
