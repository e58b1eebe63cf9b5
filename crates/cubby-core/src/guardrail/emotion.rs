//! Emotion classification for assistant replies and kid input.
//!
//! `classify` maps an assistant reply (plus an optional sentiment score
//! from the external collaborator) into the closed [`EmotionLabel`]
//! taxonomy. It is total: every input yields exactly one label, and
//! anything ambiguous or negative falls back to `Cheerful` so distress
//! is never voiced back at the child.
//!
//! Thresholds are tunable constants, not contracts.

use std::sync::LazyLock;

use regex::Regex;

use cubby_types::emotion::{EmotionLabel, KidMood};

/// Sentiment score at or above which text counts as strongly positive.
pub const POSITIVE_THRESHOLD: f32 = 0.25;

/// Sentiment score at or below which text counts as negative.
pub const NEGATIVE_THRESHOLD: f32 = -0.25;

/// Warm/affiliative language -> affectionate voice.
static AFFECTIONATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(love|miss|hug|care|cuddle|sweet(heart)?|proud of you)\b").unwrap()
});

/// Inquisitive phrasing -> curious voice.
static CURIOUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(why|how|what if|wonder|guess|did you know)\b").unwrap()
});

/// Distressed kid input.
static SAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(sad|scared|angry|mad|cry(ing)?|lonely|hurt)\b").unwrap()
});

/// Upbeat kid input.
static HAPPY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(yay|awesome|happy|fun|cool|best|love)\b").unwrap()
});

/// Classify an assistant reply into an emotion label.
///
/// `sentiment` is the polarity score in `[-1.0, 1.0]` from the external
/// sentiment collaborator when available; the textual heuristics run
/// either way because question forms and affiliative wording are not
/// things a polarity score can see.
pub fn classify(text: &str, sentiment: Option<f32>) -> EmotionLabel {
    if AFFECTIONATE_RE.is_match(text) {
        return EmotionLabel::Affectionate;
    }
    if text.contains('?') || CURIOUS_RE.is_match(text) {
        return EmotionLabel::Curious;
    }
    match sentiment {
        Some(score) if score >= POSITIVE_THRESHOLD => EmotionLabel::Cheerful,
        // Mildly positive or neutral -- engaging beats flat.
        Some(score) if score > NEGATIVE_THRESHOLD => EmotionLabel::Curious,
        // Negative or no signal: the safe default.
        _ => EmotionLabel::Cheerful,
    }
}

/// Coarse mood detection on the *kid's* input, feeding the preamble's
/// emotional-context hint.
pub fn detect_kid_mood(text: &str, sentiment: Option<f32>) -> KidMood {
    if let Some(score) = sentiment {
        if score >= POSITIVE_THRESHOLD {
            return KidMood::Happy;
        }
        if score <= NEGATIVE_THRESHOLD {
            return KidMood::Sad;
        }
        return KidMood::Neutral;
    }
    if SAD_RE.is_match(text) {
        KidMood::Sad
    } else if HAPPY_RE.is_match(text) {
        KidMood::Happy
    } else {
        KidMood::Neutral
    }
}
