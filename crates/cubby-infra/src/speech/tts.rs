//! GoogleTts -- Google Cloud Text-to-Speech client.
//!
//! The emotion label selects a [`VoiceProfile`] which is rendered as
//! SSML prosody (pitch in semitones, rate keyword, optional emphasis).
//! The API returns base64-encoded MP3 in `audioContent`, which is
//! passed through to the caller unchanged.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use cubby_core::collab::SpeechSynthesizer;
use cubby_types::emotion::EmotionLabel;
use cubby_types::speech::{SpeechError, VoiceProfile};

/// Google Cloud TTS speech synthesizer.
pub struct GoogleTts {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    voice: String,
}

impl GoogleTts {
    pub fn new(api_key: SecretString, voice: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://texttospeech.googleapis.com".to_string(),
            voice,
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Language code derived from the voice name ("en-US-Standard-F" -> "en-US").
    fn language_code(&self) -> String {
        self.voice
            .splitn(3, '-')
            .take(2)
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Render text as SSML with the prosody of the given profile.
///
/// The text is XML-escaped first; reply sanitization upstream already
/// strips exotic symbols but quotes and ampersands survive it.
fn render_ssml(text: &str, profile: VoiceProfile) -> String {
    let escaped = escape_xml(text);
    let inner = match profile.emphasis {
        Some(level) => format!("<emphasis level=\"{level}\">{escaped}</emphasis>"),
        None => escaped,
    };
    format!(
        "<speak><prosody pitch=\"{sign}{pitch}st\" rate=\"{rate}\">{inner}</prosody></speak>",
        sign = if profile.pitch_semitones >= 0 { "+" } else { "" },
        pitch = profile.pitch_semitones,
        rate = profile.rate,
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, emotion: EmotionLabel) -> Result<String, SpeechError> {
        let profile = VoiceProfile::for_emotion(emotion);
        let body = SynthesizeRequest {
            input: SynthesisInput {
                ssml: render_ssml(text, profile),
            },
            voice: VoiceSelection {
                language_code: self.language_code(),
                name: self.voice.clone(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/text:synthesize", self.base_url))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Upstream(format!("HTTP {status}")));
        }

        let parsed: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Deserialization(e.to_string()))?;

        Ok(parsed.audio_content)
    }
}

// --- Wire types -----------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest {
    input: SynthesisInput,
    voice: VoiceSelection,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput {
    ssml: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    language_code: String,
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}
