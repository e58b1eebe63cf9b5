//! Pre-authored, safety-reviewed replies.
//!
//! Substituted whenever a real generation is unavailable or unsafe:
//! daily limit reached, upstream safety block, or collaborator failure.
//! Each pool has a few variants so repeated hits don't sound robotic.

use rand::seq::SliceRandom;

/// Shown when the daily token budget is exhausted.
const LIMIT_REACHED: &[&str] = &[
    "We've been chatting a lot today! Let's take a break and talk again tomorrow!",
    "Wow, we talked so much! My voice needs a nap -- see you tomorrow!",
    "That was a lot of fun today! Let's save some stories for tomorrow, okay?",
];

/// Shown when the upstream safety filter blocks a generation.
const REDIRECT: &[&str] = &[
    "Hmm, I don't think we should talk about that. Let's do something fun instead! Want a silly fact or a story?",
    "Oops, that's not something for us. Guess what -- did you know octopuses have three hearts?!",
    "Let's talk about something else! Want to play a guessing game?",
];

/// Shown when any collaborator fails mid-turn.
const TRY_AGAIN: &[&str] = &[
    "Oops, something got tangled up! Let's try again in a little bit.",
    "Hmm, my ears got fuzzy for a second. Can you say that again soon?",
];

fn pick(pool: &[&str]) -> String {
    pool.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(pool[0])
        .to_string()
}

/// A friendly "daily limit reached" reply.
pub fn limit_reached() -> String {
    pick(LIMIT_REACHED)
}

/// A cheerful redirect away from blocked content.
pub fn redirect() -> String {
    pick(REDIRECT)
}

/// A generic child-safe "try again later" reply.
pub fn try_again_later() -> String {
    pick(TRY_AGAIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pools_are_non_empty_and_short() {
        for pool in [LIMIT_REACHED, REDIRECT, TRY_AGAIN] {
            assert!(!pool.is_empty());
            for reply in pool {
                // Every canned reply must itself satisfy the 3-sentence cap.
                let truncated = crate::reply::truncate_sentences(reply, 3);
                assert_eq!(&truncated, reply);
            }
        }
    }

    #[test]
    fn test_picks_come_from_pool() {
        for _ in 0..10 {
            assert!(LIMIT_REACHED.contains(&limit_reached().as_str()));
            assert!(REDIRECT.contains(&redirect().as_str()));
            assert!(TRY_AGAIN.contains(&try_again_later().as_str()));
        }
    }
}
