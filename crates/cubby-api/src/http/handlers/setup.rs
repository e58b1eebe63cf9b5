//! POST /v1/setup - parent-facing session creation.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use cubby_types::session::KidProfile;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub session_id: String,
}

/// Validate the profile and mint a fresh session.
pub async fn setup(
    State(state): State<AppState>,
    Json(profile): Json<KidProfile>,
) -> Result<Json<SetupResponse>, AppError> {
    let session_id = state.sessions.create(profile, Utc::now())?;
    tracing::info!(%session_id, "session created");
    Ok(Json(SetupResponse { session_id }))
}
