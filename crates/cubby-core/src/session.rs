//! Process-scoped session store.
//!
//! An in-memory registry of active sessions keyed by an opaque,
//! unguessable identifier. This is the entire persistence model:
//! nothing survives a process restart and nothing is written
//! externally, which is what keeps the backend COPPA-clean.
//!
//! Concurrency: the registry is a [`DashMap`]; quota mutation goes
//! through [`DashMap::get_mut`], whose shard lock serializes the
//! read-modify-write of a session's bucket without a process-wide
//! lock. Two simultaneous chat requests for the same session cannot
//! both observe and spend the same `remaining` count.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use cubby_types::error::{SessionError, ValidationError};
use cubby_types::quota::{BucketDecision, TokenBucketState};
use cubby_types::session::KidProfile;

use crate::guardrail::bucket;

/// Default session retention window in days.
pub const DEFAULT_RETENTION_DAYS: i64 = 3;

/// One active session: immutable profile plus mutable quota state.
#[derive(Debug)]
struct Session {
    profile: KidProfile,
    created_at: DateTime<Utc>,
    bucket: TokenBucketState,
}

/// In-memory registry of active sessions.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    daily_tokens: u32,
    retention: Duration,
}

impl SessionStore {
    /// Create an empty store.
    ///
    /// `daily_tokens` is the per-session bucket capacity;
    /// `retention_days` bounds how long an idle session stays valid.
    pub fn new(daily_tokens: u32, retention_days: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            daily_tokens,
            retention: Duration::days(retention_days),
        }
    }

    /// Register a new session and return its opaque identifier.
    ///
    /// The id is a random UUIDv4 -- not sequential, not derivable from
    /// the profile.
    pub fn create(&self, profile: KidProfile, now: DateTime<Utc>) -> Result<String, ValidationError> {
        profile.validate()?;
        let session_id = Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            session_id.clone(),
            Session {
                profile,
                created_at: now,
                bucket: TokenBucketState::new(self.daily_tokens, cubby_types::quota::default_period(), now),
            },
        );
        Ok(session_id)
    }

    /// Look up a session's profile.
    ///
    /// Unknown and expired ids both fail with [`SessionError::NotFound`];
    /// expired entries are dropped on the way out.
    pub fn get(&self, session_id: &str, now: DateTime<Utc>) -> Result<KidProfile, SessionError> {
        let expired = {
            let Some(entry) = self.sessions.get(session_id) else {
                return Err(SessionError::NotFound);
            };
            if now - entry.created_at > self.retention {
                true
            } else {
                return Ok(entry.profile.clone());
            }
        };
        if expired {
            self.sessions.remove(session_id);
        }
        Err(SessionError::NotFound)
    }

    /// Consume quota for one chat turn.
    ///
    /// The bucket's read-modify-write happens under the entry's shard
    /// lock, so concurrent calls for the same session serialize and
    /// cannot double-spend.
    pub fn touch_quota(
        &self,
        session_id: &str,
        cost: u32,
        now: DateTime<Utc>,
    ) -> Result<BucketDecision, SessionError> {
        let expired = {
            let Some(mut entry) = self.sessions.get_mut(session_id) else {
                return Err(SessionError::NotFound);
            };
            if now - entry.created_at > self.retention {
                true
            } else {
                return Ok(bucket::consume(&mut entry.bucket, cost, now));
            }
        };
        if expired {
            self.sessions.remove(session_id);
        }
        Err(SessionError::NotFound)
    }

    /// Purge every session older than the retention window.
    ///
    /// Returns the number of sessions evicted.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        // Counted inside the closure: a len() snapshot taken around
        // retain() can drift when concurrent requests insert sessions.
        let mut evicted = 0;
        self.sessions.retain(|_, session| {
            let keep = now - session.created_at <= self.retention;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Number of live sessions (expired-but-unswept entries included).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn profile() -> KidProfile {
        KidProfile {
            kid_name: "Alex".to_string(),
            age: 7,
            buddy_name: "Sparkle".to_string(),
        }
    }

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new(4096, DEFAULT_RETENTION_DAYS);
        let now = Utc::now();
        let id = store.create(profile(), now).unwrap();
        let found = store.get(&id, now).unwrap();
        assert_eq!(found.buddy_name, "Sparkle");
    }

    #[test]
    fn test_ids_are_opaque_and_unique() {
        let store = SessionStore::new(4096, DEFAULT_RETENTION_DAYS);
        let now = Utc::now();
        let a = store.create(profile(), now).unwrap();
        let b = store.create(profile(), now).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(!a.contains("Alex"));
    }

    #[test]
    fn test_unknown_id_not_found() {
        let store = SessionStore::new(4096, DEFAULT_RETENTION_DAYS);
        assert_eq!(
            store.get("nope", Utc::now()),
            Err(SessionError::NotFound)
        );
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let store = SessionStore::new(4096, DEFAULT_RETENTION_DAYS);
        let mut p = profile();
        p.age = 1;
        assert!(store.create(p, Utc::now()).is_err());
    }

    #[test]
    fn test_expired_session_behaves_as_not_found() {
        let store = SessionStore::new(4096, DEFAULT_RETENTION_DAYS);
        let created = Utc::now();
        let id = store.create(profile(), created).unwrap();

        let later = created + Duration::days(DEFAULT_RETENTION_DAYS) + Duration::hours(1);
        assert_eq!(store.get(&id, later), Err(SessionError::NotFound));
        // The expired entry was dropped on lookup.
        assert!(store.is_empty());
    }

    #[test]
    fn test_touch_quota_decrements() {
        let store = SessionStore::new(100, DEFAULT_RETENTION_DAYS);
        let now = Utc::now();
        let id = store.create(profile(), now).unwrap();

        let decision = store.touch_quota(&id, 30, now).unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 70);

        let denied = store.touch_quota(&id, 80, now).unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 70);
    }

    #[test]
    fn test_touch_quota_unknown_session() {
        let store = SessionStore::new(100, DEFAULT_RETENTION_DAYS);
        assert_eq!(
            store.touch_quota("ghost", 1, Utc::now()),
            Err(SessionError::NotFound)
        );
    }

    #[test]
    fn test_evict_expired_purges_only_old_sessions() {
        let store = SessionStore::new(100, DEFAULT_RETENTION_DAYS);
        let old = Utc::now() - Duration::days(5);
        let fresh = Utc::now();
        store.create(profile(), old).unwrap();
        store.create(profile(), fresh).unwrap();

        let evicted = store.evict_expired(Utc::now());
        assert_eq!(evicted, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_evict_counts_stay_exact_with_concurrent_inserts() {
        // Sessions inserted while a sweep runs must never skew the
        // eviction count (or underflow it).
        let store = Arc::new(SessionStore::new(100, DEFAULT_RETENTION_DAYS));
        let old = Utc::now() - Duration::days(5);
        for _ in 0..20 {
            store.create(profile(), old).unwrap();
        }

        let inserter = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    store.create(profile(), Utc::now()).unwrap();
                }
            })
        };

        let evicted = store.evict_expired(Utc::now());
        inserter.join().unwrap();

        assert_eq!(evicted, 20);
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn test_no_double_spend_under_concurrency() {
        // A bucket holding exactly one turn's worth of tokens must
        // grant exactly one of N racing consumption attempts.
        let store = Arc::new(SessionStore::new(10, DEFAULT_RETENTION_DAYS));
        let now = Utc::now();
        let id = store.create(profile(), now).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = id.clone();
                std::thread::spawn(move || store.touch_quota(&id, 10, now).unwrap().allowed)
            })
            .collect();

        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();
        assert_eq!(granted, 1);
    }
}
