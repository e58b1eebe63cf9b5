//! Per-session token bucket with lazy daily replenishment.
//!
//! The refill is a full reset per period, not a fractional leak-based
//! refill: at daily granularity the simpler model is plenty, and it
//! matches the "come back tomorrow" product behavior.
//!
//! The functions here are pure over an explicit clock so tests can
//! advance time without sleeping. Mutual exclusion around a bucket is
//! the session store's job.

use chrono::{DateTime, Utc};

use cubby_types::quota::{BucketDecision, TokenBucketState};

/// Tokens reserved for the expected reply on top of the input estimate.
pub const RESERVED_REPLY_TOKENS: u32 = 64;

/// Attempt to consume `cost` tokens from the bucket.
///
/// Lazily refills first: when a full period has elapsed since the last
/// refill, `remaining` resets to `capacity`. Denial leaves the bucket
/// untouched so a denied attempt cannot change later outcomes.
pub fn consume(state: &mut TokenBucketState, cost: u32, now: DateTime<Utc>) -> BucketDecision {
    if now - state.last_refill_at >= state.period {
        state.remaining = state.capacity;
        state.last_refill_at = now;
    }

    if state.remaining >= cost {
        state.remaining -= cost;
        BucketDecision {
            allowed: true,
            remaining: state.remaining,
        }
    } else {
        BucketDecision {
            allowed: false,
            remaining: state.remaining,
        }
    }
}

/// Estimate the token cost of one chat turn: a whitespace word count
/// of the (redacted) input plus a fixed reserve for the reply.
pub fn estimate_cost(input: &str) -> u32 {
    let words = input.split_whitespace().count() as u32;
    words + RESERVED_REPLY_TOKENS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn bucket(capacity: u32, now: DateTime<Utc>) -> TokenBucketState {
        TokenBucketState::new(capacity, Duration::hours(24), now)
    }

    #[test]
    fn test_conservation_over_repeated_consumption() {
        let now = Utc::now();
        let mut state = bucket(100, now);

        for i in 1..=9 {
            let decision = consume(&mut state, 10, now);
            assert!(decision.allowed);
            assert_eq!(decision.remaining, 100 - i * 10);
        }
        assert_eq!(state.remaining, 10);
    }

    #[test]
    fn test_denial_does_not_mutate() {
        let now = Utc::now();
        let mut state = bucket(30, now);

        assert!(consume(&mut state, 25, now).allowed);
        let denied = consume(&mut state, 25, now);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 5);
        assert_eq!(state.remaining, 5);

        // A second denied attempt still observes the same state.
        let denied_again = consume(&mut state, 6, now);
        assert!(!denied_again.allowed);
        assert_eq!(state.remaining, 5);
    }

    #[test]
    fn test_exact_cost_allowed() {
        let now = Utc::now();
        let mut state = bucket(50, now);
        let decision = consume(&mut state, 50, now);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn test_refill_after_full_period() {
        let start = Utc::now();
        let mut state = bucket(100, start);
        assert!(consume(&mut state, 100, start).allowed);
        assert!(!consume(&mut state, 1, start).allowed);

        let tomorrow = start + Duration::hours(24);
        let decision = consume(&mut state, 40, tomorrow);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 60);
        assert_eq!(state.last_refill_at, tomorrow);
    }

    #[test]
    fn test_no_refill_before_period_elapses() {
        let start = Utc::now();
        let mut state = bucket(100, start);
        assert!(consume(&mut state, 100, start).allowed);

        let almost = start + Duration::hours(23);
        assert!(!consume(&mut state, 1, almost).allowed);
        assert_eq!(state.remaining, 0);
    }

    #[test]
    fn test_refill_never_exceeds_capacity() {
        let start = Utc::now();
        let mut state = bucket(100, start);
        let much_later = start + Duration::days(30);
        let decision = consume(&mut state, 0, much_later);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 100);
    }

    #[test]
    fn test_estimate_cost_counts_words_plus_reserve() {
        assert_eq!(estimate_cost(""), RESERVED_REPLY_TOKENS);
        assert_eq!(estimate_cost("hello there friend"), 3 + RESERVED_REPLY_TOKENS);
    }
}
