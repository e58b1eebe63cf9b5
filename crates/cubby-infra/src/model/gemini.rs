//! GeminiModel -- concrete [`ChatModel`] implementation for Google
//! Gemini's `generateContent` REST API.
//!
//! Every request carries the rendered system preamble as
//! `systemInstruction` and the fixed five-category safety block list
//! at the strictest threshold. An upstream block (prompt feedback or a
//! SAFETY finish reason) maps to [`ModelError::SafetyBlocked`] so the
//! orchestrator can substitute a canned redirect.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use cubby_core::collab::ChatModel;
use cubby_types::model::{ModelError, ModelReply, ModelRequest};
use cubby_types::safety::BLOCKED_CATEGORIES;

/// Default generation model.
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Block threshold applied to every safety category.
const BLOCK_THRESHOLD: &str = "BLOCK_LOW_AND_ABOVE";

/// Google Gemini language-model collaborator.
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiModel {
    pub fn new(api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    fn to_gemini_request(request: &ModelRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: ContentPart::text(&request.preamble),
            contents: vec![UserContent {
                role: "user",
                parts: vec![TextPart {
                    text: request.user_text.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens,
            },
            safety_settings: BLOCKED_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.api_name(),
                    threshold: BLOCK_THRESHOLD,
                })
                .collect(),
        }
    }
}

impl ChatModel for GeminiModel {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        let body = Self::to_gemini_request(request);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Upstream(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ModelError::AuthenticationFailed);
        }
        if !status.is_success() {
            return Err(ModelError::Upstream(format!("HTTP {status}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Deserialization(e.to_string()))?;

        // A blocked prompt has no candidates, only feedback.
        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(ModelError::SafetyBlocked {
                    category: reason.clone(),
                });
            }
        }

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Deserialization("no candidates in response".to_string()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(ModelError::SafetyBlocked {
                category: "SAFETY".to_string(),
            });
        }

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ModelError::Deserialization("empty candidate text".to_string()));
        }

        Ok(ModelReply { text })
    }
}

// --- Wire types -----------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: ContentPart,
    contents: Vec<UserContent>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct ContentPart {
    parts: Vec<TextPart>,
}

impl ContentPart {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![TextPart {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct UserContent {
    role: &'static str,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ModelRequest {
        ModelRequest {
            preamble: "You are Sparkle.".to_string(),
            user_text: "Hello [phone]".to_string(),
            max_output_tokens: 256,
        }
    }

    #[test]
    fn test_request_carries_all_five_safety_settings() {
        let body = GeminiModel::to_gemini_request(&request());
        assert_eq!(body.safety_settings.len(), 5);
        for setting in &body.safety_settings {
            assert_eq!(setting.threshold, BLOCK_THRESHOLD);
        }
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let json = serde_json::to_value(GeminiModel::to_gemini_request(&request())).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert!(json.get("safetySettings").is_some());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello [phone]");
    }

    #[test]
    fn test_response_parsing_happy_path() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hi "}, {"text": "there!"}]}, "finishReason": "STOP"}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert!(parsed.prompt_feedback.is_none());
    }

    #[test]
    fn test_blocked_prompt_feedback_parses() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.candidates.is_empty());
        assert_eq!(
            parsed.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
