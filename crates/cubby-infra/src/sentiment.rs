//! GoogleSentiment -- Google Cloud Natural Language sentiment client.
//!
//! Returns only the document-level polarity score in [-1.0, 1.0]; the
//! emotion classifier combines it with lexical cues. Sentiment is an
//! optional collaborator, so any failure here is surfaced as an error
//! and the caller falls back to cue-only classification.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use cubby_core::collab::SentimentAnalyzer;
use cubby_types::model::SentimentError;

use crate::dev::DevSentiment;

/// Sentiment backend selected at startup.
pub enum SentimentBackend {
    Google(GoogleSentiment),
    Dev(DevSentiment),
}

impl SentimentAnalyzer for SentimentBackend {
    async fn score(&self, text: &str) -> Result<f32, SentimentError> {
        match self {
            SentimentBackend::Google(s) => s.score(text).await,
            SentimentBackend::Dev(s) => s.score(text).await,
        }
    }
}

/// Google Cloud Natural Language sentiment analyzer.
pub struct GoogleSentiment {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GoogleSentiment {
    pub fn new(api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://language.googleapis.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

impl SentimentAnalyzer for GoogleSentiment {
    async fn score(&self, text: &str) -> Result<f32, SentimentError> {
        let body = AnalyzeSentimentRequest {
            document: Document {
                doc_type: "PLAIN_TEXT",
                content: text.to_string(),
            },
            encoding_type: "UTF8",
        };

        let response = self
            .client
            .post(format!("{}/v1/documents:analyzeSentiment", self.base_url))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SentimentError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::Upstream(format!("HTTP {status}")));
        }

        let parsed: AnalyzeSentimentResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Deserialization(e.to_string()))?;

        Ok(parsed.document_sentiment.score)
    }
}

// --- Wire types -----------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentRequest {
    document: Document,
    encoding_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Document {
    #[serde(rename = "type")]
    doc_type: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentResponse {
    document_sentiment: DocumentSentiment,
}

#[derive(Debug, Deserialize)]
struct DocumentSentiment {
    #[serde(default)]
    score: f32,
}
