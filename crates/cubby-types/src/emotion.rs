//! Emotion taxonomy for expressive speech synthesis.
//!
//! The classifier maps every assistant reply to exactly one of these
//! labels. The set is closed on purpose: downstream prosody selection
//! is a fixed lookup table, and an unknown label would mean a silent
//! voice regression rather than a compile error.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Emotion label attached to every assistant reply.
///
/// `Cheerful` doubles as the safe fallback: when classification is
/// ambiguous or the sentiment collaborator reports distress, we never
/// surface that to the child -- we default to a bright voice instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Cheerful,
    Curious,
    Affectionate,
}

impl EmotionLabel {
    /// All labels, in a fixed order (useful for exhaustive tests).
    pub const ALL: [EmotionLabel; 3] = [
        EmotionLabel::Cheerful,
        EmotionLabel::Curious,
        EmotionLabel::Affectionate,
    ];
}

impl Default for EmotionLabel {
    fn default() -> Self {
        EmotionLabel::Cheerful
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmotionLabel::Cheerful => write!(f, "cheerful"),
            EmotionLabel::Curious => write!(f, "curious"),
            EmotionLabel::Affectionate => write!(f, "affectionate"),
        }
    }
}

impl FromStr for EmotionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cheerful" => Ok(EmotionLabel::Cheerful),
            "curious" => Ok(EmotionLabel::Curious),
            "affectionate" => Ok(EmotionLabel::Affectionate),
            other => Err(format!("invalid emotion label: '{other}'")),
        }
    }
}

/// Coarse emotional state detected on the *kid's* input.
///
/// Feeds an emotional-context hint into the system preamble so the
/// model can match the child's energy or be comforting. Distinct from
/// [`EmotionLabel`], which tags the assistant's reply for the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KidMood {
    Happy,
    Sad,
    Neutral,
}

impl Default for KidMood {
    fn default() -> Self {
        KidMood::Neutral
    }
}

impl fmt::Display for KidMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KidMood::Happy => write!(f, "happy"),
            KidMood::Sad => write!(f, "sad"),
            KidMood::Neutral => write!(f, "neutral"),
        }
    }
}
