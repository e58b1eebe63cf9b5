//! Environment configuration loaded once at startup.
//!
//! Variable names are part of the deployment contract. Malformed
//! numeric values log a warning and fall back to defaults rather than
//! aborting; a missing API credential is fatal unless `DEV_MODE` is
//! set, in which case the development stub collaborators are wired
//! instead.

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Default per-session daily token budget.
const DEFAULT_MAX_TOKENS_PER_DAY: u32 = 4096;
/// Default transcript/session retention in days.
const DEFAULT_LOG_RETENTION_DAYS: i64 = 3;
/// Default synthesis voice.
const DEFAULT_TTS_VOICE: &str = "en-US-Standard-F";
/// Default transcript database path.
const DEFAULT_DB_PATH: &str = "./cubby.db";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing required environment variable {0} (set DEV_MODE=1 to run with stub collaborators)")]
    MissingCredential(&'static str),
}

/// Validated runtime settings.
pub struct Settings {
    /// API key for the Google collaborators. Absent only in dev mode.
    pub google_api_key: Option<SecretString>,
    /// Synthesis voice name.
    pub tts_voice: String,
    /// Per-session daily token budget.
    pub max_tokens_per_day: u32,
    /// Session and transcript retention window.
    pub log_retention_days: i64,
    /// When set, stub collaborators replace missing credentials.
    pub dev_mode: bool,
    /// Transcript database location.
    pub db_path: PathBuf,
    /// Hex-encoded 32-byte transcript encryption key; an ephemeral key
    /// is generated when absent.
    pub log_key_hex: Option<SecretString>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        let dev_mode = flag("DEV_MODE");
        let google_api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(SecretString::from);

        if google_api_key.is_none() && !dev_mode {
            return Err(SettingsError::MissingCredential("GOOGLE_API_KEY"));
        }

        Ok(Self {
            google_api_key,
            tts_voice: std::env::var("GOOGLE_TTS_VOICE")
                .unwrap_or_else(|_| DEFAULT_TTS_VOICE.to_string()),
            max_tokens_per_day: parsed("MAX_TOKENS_PER_DAY", DEFAULT_MAX_TOKENS_PER_DAY),
            log_retention_days: parsed("LOG_RETENTION_DAYS", DEFAULT_LOG_RETENTION_DAYS),
            dev_mode,
            db_path: std::env::var("CUBBY_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH)),
            log_key_hex: std::env::var("CUBBY_LOG_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from),
        })
    }
}

/// Read a boolean flag: set and not "0"/"false" counts as on.
fn flag(name: &str) -> bool {
    match std::env::var(name) {
        Ok(value) => !matches!(value.trim(), "" | "0" | "false"),
        Err(_) => false,
    }
}

/// Parse a numeric env var, warning and defaulting on bad values.
fn parsed<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("invalid {name}={raw:?}, using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}
