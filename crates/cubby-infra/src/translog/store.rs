//! SQLite-backed encrypted transcript ring buffer.
//!
//! One row per chat turn: the [`ChatTurn`] is serialized to JSON,
//! encrypted with [`LogCrypto`], and stored as a blob. The `at` column
//! stays in the clear so retention purges can run without decrypting
//! anything. Every write also purges rows older than the retention
//! window, so the log never grows past a few days of history.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use cubby_types::chat::ChatTurn;
use cubby_types::error::LogError;

use super::crypto::LogCrypto;

/// Encrypted local transcript log.
pub struct TurnLog {
    pool: SqlitePool,
    crypto: LogCrypto,
    retention: Duration,
}

impl TurnLog {
    /// Open (or create) the log database at `path`.
    ///
    /// Uses WAL journal mode with a single writer connection, and
    /// creates the `turns` table if it does not exist yet.
    pub async fn open(
        path: &Path,
        crypto: LogCrypto,
        retention_days: i64,
    ) -> Result<Self, LogError> {
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let opts = SqliteConnectOptions::from_str(&url)
            .map_err(|e| LogError::Storage(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| LogError::Storage(e.to_string()))?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS turns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                payload BLOB NOT NULL,
                at TEXT NOT NULL
            )"#,
        )
        .execute(&pool)
        .await
        .map_err(|e| LogError::Storage(e.to_string()))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_turns_session ON turns (session_id, at)")
            .execute(&pool)
            .await
            .map_err(|e| LogError::Storage(e.to_string()))?;

        Ok(Self {
            pool,
            crypto,
            retention: Duration::days(retention_days),
        })
    }

    /// Record one turn and purge anything past retention.
    pub async fn record(&self, session_id: &str, turn: &ChatTurn) -> Result<(), LogError> {
        let json = serde_json::to_vec(turn).map_err(|_| LogError::EncryptionFailed)?;
        let payload = self.crypto.encrypt(&json)?;

        sqlx::query("INSERT INTO turns (session_id, payload, at) VALUES (?, ?, ?)")
            .bind(session_id)
            .bind(payload)
            .bind(turn.at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| LogError::Storage(e.to_string()))?;

        self.purge_older_than(turn.at - self.retention).await
    }

    /// Purge everything past the retention window as of `now`.
    ///
    /// Writes already purge opportunistically; this is for the periodic
    /// maintenance task so an idle log still drains.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<(), LogError> {
        self.purge_older_than(now - self.retention).await
    }

    /// Delete rows whose timestamp is before `cutoff`.
    pub async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<(), LogError> {
        sqlx::query("DELETE FROM turns WHERE at < ?")
            .bind(cutoff.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| LogError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Decrypt and return all turns for a session, oldest first.
    ///
    /// Rows that no longer decrypt (key rotated, ephemeral key from a
    /// previous run) are skipped rather than failing the whole export.
    pub async fn export(&self, session_id: &str) -> Result<Vec<ChatTurn>, LogError> {
        let rows = sqlx::query("SELECT payload FROM turns WHERE session_id = ? ORDER BY at ASC")
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LogError::Storage(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in rows {
            let payload: Vec<u8> = row.get("payload");
            match self.crypto.decrypt(&payload) {
                Ok(json) => match serde_json::from_slice::<ChatTurn>(&json) {
                    Ok(turn) => turns.push(turn),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping malformed transcript row");
                    }
                },
                Err(_) => {
                    tracing::warn!("skipping undecryptable transcript row");
                }
            }
        }
        Ok(turns)
    }

    /// Number of stored rows across all sessions.
    pub async fn len(&self) -> Result<u64, LogError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM turns")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| LogError::Storage(e.to_string()))?;
        let n: i64 = row.get("n");
        Ok(n as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubby_types::emotion::EmotionLabel;

    fn test_crypto() -> LogCrypto {
        let mut key = [0u8; 32];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        LogCrypto::new(&key)
    }

    fn turn(prompt: &str, at: DateTime<Utc>) -> ChatTurn {
        ChatTurn {
            redacted_prompt: prompt.to_string(),
            reply: "Neat question!".to_string(),
            emotion: EmotionLabel::Cheerful,
            at,
        }
    }

    async fn open_log(dir: &tempfile::TempDir, retention_days: i64) -> TurnLog {
        let path = dir.path().join("log.db");
        TurnLog::open(&path, test_crypto(), retention_days)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_export_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let log = open_log(&dir, 3).await;

        let now = Utc::now();
        log.record("s1", &turn("what is a [zip] code", now)).await.unwrap();
        log.record("s1", &turn("why is the sky blue", now)).await.unwrap();
        log.record("s2", &turn("other session", now)).await.unwrap();

        let turns = log.export("s1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].redacted_prompt, "what is a [zip] code");
    }

    #[tokio::test]
    async fn test_payload_is_encrypted_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let log = open_log(&dir, 3).await;

        log.record("s1", &turn("dinosaur facts please", Utc::now()))
            .await
            .unwrap();

        let row = sqlx::query("SELECT payload FROM turns LIMIT 1")
            .fetch_one(&log.pool)
            .await
            .unwrap();
        let payload: Vec<u8> = row.get("payload");
        let raw = String::from_utf8_lossy(&payload);
        assert!(!raw.contains("dinosaur"));
    }

    #[tokio::test]
    async fn test_retention_purges_old_rows() {
        let dir = tempfile::tempdir().unwrap();
        let log = open_log(&dir, 3).await;

        let now = Utc::now();
        log.record("s1", &turn("old turn", now - Duration::days(5)))
            .await
            .unwrap();
        // Writing a current turn purges everything older than 3 days.
        log.record("s1", &turn("fresh turn", now)).await.unwrap();

        let turns = log.export("s1").await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].redacted_prompt, "fresh turn");
        assert_eq!(log.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_undecryptable_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let log = open_log(&dir, 3).await;
        let now = Utc::now();
        log.record("s1", &turn("readable", now)).await.unwrap();

        // Simulate a row written under a previous (lost) key.
        sqlx::query("INSERT INTO turns (session_id, payload, at) VALUES (?, ?, ?)")
            .bind("s1")
            .bind(vec![0u8; 40])
            .bind(now.to_rfc3339())
            .execute(&log.pool)
            .await
            .unwrap();

        let turns = log.export("s1").await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].redacted_prompt, "readable");
    }
}
