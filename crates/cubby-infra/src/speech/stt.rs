//! GoogleStt -- Google Cloud Speech-to-Text client.
//!
//! Takes the base64 audio payload from the chat request, validates that
//! it actually decodes, and sends it to `speech:recognize`. An empty
//! result set (silence, noise) is [`SpeechError::NothingRecognized`] so
//! the surface can ask the kid to try again rather than erroring.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use cubby_core::collab::SpeechToText;
use cubby_types::speech::SpeechError;

/// Google Cloud STT speech recognizer.
pub struct GoogleStt {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    language_code: String,
}

impl GoogleStt {
    pub fn new(api_key: SecretString, language_code: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://speech.googleapis.com".to_string(),
            language_code,
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

impl SpeechToText for GoogleStt {
    async fn transcribe(&self, audio_b64: &str) -> Result<String, SpeechError> {
        // Reject garbage before it costs a network round trip.
        if BASE64.decode(audio_b64).is_err() {
            return Err(SpeechError::InvalidAudio("not valid base64".to_string()));
        }

        let body = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "WEBM_OPUS",
                sample_rate_hertz: 48_000,
                language_code: self.language_code.clone(),
            },
            audio: RecognitionAudio {
                content: audio_b64.to_string(),
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/speech:recognize", self.base_url))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Upstream(format!("HTTP {status}")));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Deserialization(e.to_string()))?;

        let transcript = parsed
            .results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .collect::<Vec<_>>()
            .join(" ");

        if transcript.trim().is_empty() {
            return Err(SpeechError::NothingRecognized);
        }

        Ok(transcript)
    }
}

// --- Wire types -----------------------------------------------------------

#[derive(Debug, Serialize)]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: String,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    transcript: String,
}
