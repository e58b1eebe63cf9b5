//! Conversation orchestrator: the guardrail pipeline end to end.
//!
//! One chat turn walks Validate -> (Transcribe) -> Redact -> QuotaCheck
//! -> Generate -> Classify -> Truncate -> Synthesize -> Respond.
//! Quota denial and upstream safety blocks are *not* failures: they
//! substitute canned replies and still return a spoken response.
//! Collaborator failures after the quota check surface as
//! [`TurnError::Upstream`] and the quota stays consumed for that
//! attempt, so retrying a flaky turn cannot bypass the daily budget.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use cubby_types::chat::{MAX_AUDIO_LEN, MAX_MESSAGE_LEN, TurnDisposition, TurnOutcome, TurnRequest};
use cubby_types::error::ValidationError;
use cubby_types::model::{ModelError, ModelRequest};
use cubby_types::speech::SpeechError;

use crate::canned;
use crate::collab::{ChatModel, SentimentAnalyzer, SpeechSynthesizer, SpeechToText};
use crate::guardrail::{bucket, emotion, redact};
use crate::preamble;
use crate::reply;
use crate::session::SessionStore;

/// Tunable pipeline knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Hard cap on sentences per spoken reply.
    pub max_reply_sentences: usize,
    /// Hard cap on generated tokens per model call.
    pub max_output_tokens: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_reply_sentences: reply::MAX_REPLY_SENTENCES,
            max_output_tokens: 256,
        }
    }
}

/// Terminal failures of a chat turn.
///
/// `SessionNotFound` and `Invalid` are rejections (the request never
/// reached an external collaborator); `Upstream` is a failure after
/// validation, reported with a generic child-safe message at the HTTP
/// boundary and full detail in the internal log only.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("session not found")]
    SessionNotFound,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("upstream failure in {stage}: {detail}")]
    Upstream { stage: &'static str, detail: String },
}

/// The conversation orchestrator, generic over its collaborators.
pub struct Orchestrator<M, T, S, A> {
    sessions: Arc<SessionStore>,
    model: M,
    tts: T,
    stt: S,
    sentiment: Option<A>,
    config: PipelineConfig,
}

impl<M, T, S, A> Orchestrator<M, T, S, A>
where
    M: ChatModel,
    T: SpeechSynthesizer,
    S: SpeechToText,
    A: SentimentAnalyzer,
{
    pub fn new(
        sessions: Arc<SessionStore>,
        model: M,
        tts: T,
        stt: S,
        sentiment: Option<A>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            sessions,
            model,
            tts,
            stt,
            sentiment,
            config,
        }
    }

    /// Run one chat turn through the full pipeline.
    pub async fn run(&self, request: TurnRequest) -> Result<TurnOutcome, TurnError> {
        let now = Utc::now();
        let profile = self
            .sessions
            .get(&request.session_id, now)
            .map_err(|_| TurnError::SessionNotFound)?;

        let (user_text, transcribed) = self.resolve_input(&request).await?;

        // Redact before anything crosses the network boundary. Every
        // downstream consumer (quota estimate, mood detection, model)
        // sees only the scrubbed text.
        let redacted = redact::redact(&user_text);

        let input_score = self.sentiment_score(&redacted).await;
        let mood = emotion::detect_kid_mood(&redacted, input_score);

        let cost = bucket::estimate_cost(&redacted);
        let decision = self
            .sessions
            .touch_quota(&request.session_id, cost, now)
            .map_err(|_| TurnError::SessionNotFound)?;
        if !decision.allowed {
            tracing::info!(
                session_id = %request.session_id,
                remaining = decision.remaining,
                cost,
                "daily quota exhausted, skipping model call"
            );
            return self
                .respond(canned::limit_reached(), TurnDisposition::LimitReached, transcribed)
                .await;
        }

        let model_request = ModelRequest {
            preamble: preamble::render(&profile, mood),
            user_text: redacted,
            max_output_tokens: self.config.max_output_tokens,
        };
        let (text, disposition) = match self.model.generate(&model_request).await {
            Ok(generated) => (generated.text, TurnDisposition::Answered),
            Err(ModelError::SafetyBlocked { category }) => {
                tracing::warn!(%category, "safety filter fired, substituting redirect");
                (canned::redirect(), TurnDisposition::Redirected)
            }
            Err(err) => {
                return Err(TurnError::Upstream {
                    stage: "model",
                    detail: err.to_string(),
                });
            }
        };

        self.respond(text, disposition, transcribed).await
    }

    /// Resolve the turn's input text; audio wins over text.
    async fn resolve_input(
        &self,
        request: &TurnRequest,
    ) -> Result<(String, Option<String>), TurnError> {
        if let Some(audio) = request.audio.as_deref().filter(|a| !a.trim().is_empty()) {
            if audio.len() > MAX_AUDIO_LEN {
                return Err(ValidationError::field("audio", "payload too large").into());
            }
            let transcript = match self.stt.transcribe(audio).await {
                Ok(text) => text,
                Err(SpeechError::InvalidAudio(_) | SpeechError::NothingRecognized) => {
                    return Err(
                        ValidationError::field("audio", "could not understand the audio").into(),
                    );
                }
                Err(err) => {
                    return Err(TurnError::Upstream {
                        stage: "stt",
                        detail: err.to_string(),
                    });
                }
            };
            if transcript.trim().is_empty() {
                return Err(ValidationError::field("audio", "could not understand the audio").into());
            }
            return Ok((transcript.clone(), Some(transcript)));
        }

        if let Some(message) = request.message.as_deref().filter(|m| !m.trim().is_empty()) {
            if message.chars().count() > MAX_MESSAGE_LEN {
                return Err(ValidationError::field("message", "too long (max 300 chars)").into());
            }
            return Ok((message.to_string(), None));
        }

        Err(ValidationError::field("message", "either message or audio is required").into())
    }

    /// Score text via the sentiment collaborator, degrading silently to
    /// the local heuristics when it is absent or failing.
    async fn sentiment_score(&self, text: &str) -> Option<f32> {
        let analyzer = self.sentiment.as_ref()?;
        match analyzer.score(text).await {
            Ok(score) => Some(score),
            Err(err) => {
                tracing::debug!(error = %err, "sentiment collaborator unavailable, using heuristics");
                None
            }
        }
    }

    /// Classify, truncate, and synthesize the final reply.
    async fn respond(
        &self,
        text: String,
        disposition: TurnDisposition,
        transcribed: Option<String>,
    ) -> Result<TurnOutcome, TurnError> {
        let cleaned = reply::strip_symbols(&text);
        let truncated = reply::truncate_sentences(&cleaned, self.config.max_reply_sentences);

        let score = self.sentiment_score(&truncated).await;
        let emotion = emotion::classify(&truncated, score);

        let audio = self
            .tts
            .synthesize(&truncated, emotion)
            .await
            .map_err(|err| TurnError::Upstream {
                stage: "tts",
                detail: err.to_string(),
            })?;

        Ok(TurnOutcome {
            text: truncated,
            emotion,
            audio,
            transcribed,
            disposition,
        })
    }
}
