//! POST /v1/chat - one conversation turn.
//!
//! Error posture is deliberately asymmetric: rejections a developer
//! can fix (bad session, malformed request) get real HTTP error codes,
//! while anything that would alarm the child (quota denial, upstream
//! outage) is an HTTP 200 carrying a canned friendly reply.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use cubby_core::canned;
use cubby_core::guardrail::redact;
use cubby_core::orchestrator::TurnError;
use cubby_types::chat::{ChatTurn, TurnOutcome, TurnRequest};
use cubby_types::emotion::EmotionLabel;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub emotion: EmotionLabel,
    pub audio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcribed: Option<String>,
    pub limit_reached: bool,
}

/// Run one turn through the guardrail pipeline.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.clone();
    let session_id = request.session_id.clone();

    let outcome = match state.orchestrator.run(request).await {
        Ok(outcome) => outcome,
        Err(TurnError::SessionNotFound) => return Err(AppError::SessionNotFound),
        Err(TurnError::Invalid(e)) => return Err(e.into()),
        Err(TurnError::Upstream { stage, detail }) => {
            // Detail stays in the internal log; the child sees a
            // friendly "try again" with no audio.
            tracing::error!(%session_id, stage, %detail, "collaborator failure, degrading reply");
            return Ok(Json(ChatResponse {
                text: canned::try_again_later(),
                emotion: EmotionLabel::default(),
                audio: String::new(),
                transcribed: None,
                limit_reached: false,
            }));
        }
    };

    record_turn(&state, &session_id, message.as_deref(), &outcome).await;

    Ok(Json(ChatResponse {
        limit_reached: outcome.disposition.is_limit_reached(),
        text: outcome.text,
        emotion: outcome.emotion,
        audio: outcome.audio,
        transcribed: outcome.transcribed,
    }))
}

/// Write the turn to the encrypted transcript log.
///
/// Only the redacted prompt is persisted; redaction is idempotent so
/// re-running it here costs nothing and keeps raw text out of this
/// crate's persistence path entirely. Log failures never fail the turn.
async fn record_turn(
    state: &AppState,
    session_id: &str,
    message: Option<&str>,
    outcome: &TurnOutcome,
) {
    let prompt = outcome
        .transcribed
        .as_deref()
        .or(message)
        .unwrap_or_default();
    let turn = ChatTurn {
        redacted_prompt: redact::redact(prompt),
        reply: outcome.text.clone(),
        emotion: outcome.emotion,
        at: Utc::now(),
    };
    if let Err(err) = state.translog.record(session_id, &turn).await {
        tracing::warn!(%session_id, error = %err, "failed to record transcript turn");
    }
}
