//! Application state wiring the pipeline to concrete collaborators.
//!
//! The orchestrator is generic over its collaborators; AppState pins it
//! to the backend enums from cubby-infra. With credentials present the
//! Google clients are wired; in dev mode the deterministic stubs are.

use std::sync::Arc;

use anyhow::Context;

use cubby_core::orchestrator::{Orchestrator, PipelineConfig};
use cubby_core::session::SessionStore;
use cubby_infra::config::Settings;
use cubby_infra::dev::{DevChatModel, DevSentiment, DevStt, DevTts};
use cubby_infra::model::ModelBackend;
use cubby_infra::model::gemini::GeminiModel;
use cubby_infra::sentiment::{GoogleSentiment, SentimentBackend};
use cubby_infra::speech::stt::GoogleStt;
use cubby_infra::speech::tts::GoogleTts;
use cubby_infra::speech::{SttBackend, TtsBackend};
use cubby_infra::translog::{LogCrypto, TurnLog};

/// The orchestrator pinned to the concrete infra backends.
pub type ConcreteOrchestrator =
    Orchestrator<ModelBackend, TtsBackend, SttBackend, SentimentBackend>;

/// Shared application state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub translog: Arc<TurnLog>,
}

impl AppState {
    /// Wire the session store, collaborators, and transcript log.
    pub async fn init(settings: &Settings) -> anyhow::Result<Self> {
        let sessions = Arc::new(SessionStore::new(
            settings.max_tokens_per_day,
            settings.log_retention_days,
        ));

        let crypto = match &settings.log_key_hex {
            Some(hex) => LogCrypto::from_hex_key(hex).context("invalid CUBBY_LOG_KEY")?,
            None => {
                tracing::warn!(
                    "CUBBY_LOG_KEY not set, transcript log uses an ephemeral key \
                     (unreadable after restart)"
                );
                LogCrypto::ephemeral()
            }
        };
        let translog = Arc::new(
            TurnLog::open(&settings.db_path, crypto, settings.log_retention_days)
                .await
                .context("failed to open transcript log")?,
        );

        let (model, tts, stt, sentiment) = match &settings.google_api_key {
            Some(key) => (
                ModelBackend::Gemini(GeminiModel::new(key.clone())),
                TtsBackend::Google(GoogleTts::new(key.clone(), settings.tts_voice.clone())),
                SttBackend::Google(GoogleStt::new(key.clone(), "en-US".to_string())),
                SentimentBackend::Google(GoogleSentiment::new(key.clone())),
            ),
            None => {
                // Settings::from_env already requires dev mode here.
                tracing::info!("dev mode: using deterministic stub collaborators");
                (
                    ModelBackend::Dev(DevChatModel),
                    TtsBackend::Dev(DevTts),
                    SttBackend::Dev(DevStt),
                    SentimentBackend::Dev(DevSentiment),
                )
            }
        };

        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&sessions),
            model,
            tts,
            stt,
            Some(sentiment),
            PipelineConfig::default(),
        ));

        Ok(Self {
            sessions,
            orchestrator,
            translog,
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Dev-mode state backed by a temporary transcript database.
    ///
    /// Returns the TempDir too; dropping it deletes the database.
    pub async fn dev_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            google_api_key: None,
            tts_voice: "en-US-Standard-F".to_string(),
            max_tokens_per_day: 4096,
            log_retention_days: 3,
            dev_mode: true,
            db_path: dir.path().join("log.db"),
            log_key_hex: None,
        };
        let state = AppState::init(&settings).await.unwrap();
        (state, dir)
    }
}
