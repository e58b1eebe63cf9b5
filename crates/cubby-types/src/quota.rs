//! Token bucket state for the per-session daily usage quota.
//!
//! The state lives inside a session entry; the refill/consume algorithm
//! that mutates it lives in `cubby-core::guardrail::bucket`.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Default daily token budget per session.
pub const DEFAULT_DAILY_TOKENS: u32 = 4096;

/// Default replenishment period (one full reset per day).
pub fn default_period() -> Duration {
    Duration::hours(24)
}

/// Per-session token bucket state.
///
/// Invariant: `remaining <= capacity` at all times. Refill never
/// decreases `remaining`; only consumption does.
#[derive(Debug, Clone)]
pub struct TokenBucketState {
    /// Maximum tokens per period.
    pub capacity: u32,
    /// Tokens currently available.
    pub remaining: u32,
    /// When the bucket was last reset to capacity.
    pub last_refill_at: DateTime<Utc>,
    /// Replenishment interval.
    pub period: Duration,
}

impl TokenBucketState {
    /// Create a full bucket at `now`.
    pub fn new(capacity: u32, period: Duration, now: DateTime<Utc>) -> Self {
        Self {
            capacity,
            remaining: capacity,
            last_refill_at: now,
            period,
        }
    }

    /// A full bucket with the default daily budget.
    pub fn daily(now: DateTime<Utc>) -> Self {
        Self::new(DEFAULT_DAILY_TOKENS, default_period(), now)
    }
}

/// Outcome of a consumption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketDecision {
    /// Whether the requested cost was granted.
    pub allowed: bool,
    /// Tokens available after the attempt (unchanged on denial).
    pub remaining: u32,
}
