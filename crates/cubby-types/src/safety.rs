//! Fixed safety-category block list sent with every model call.
//!
//! Modeled as an enumerated lookup table, not dynamic dispatch: the
//! five categories are a contract with the upstream content filter and
//! never change at runtime.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Harm category blocked for all generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyCategory {
    Harassment,
    HateSpeech,
    SexuallyExplicit,
    DangerousContent,
    /// Child-specific category on top of the four standard ones.
    ChildSafety,
}

impl SafetyCategory {
    /// Wire name understood by the upstream safety filter.
    pub fn api_name(&self) -> &'static str {
        match self {
            SafetyCategory::Harassment => "HARM_CATEGORY_HARASSMENT",
            SafetyCategory::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
            SafetyCategory::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            SafetyCategory::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
            SafetyCategory::ChildSafety => "HARM_CATEGORY_CHILD_SAFETY",
        }
    }
}

impl fmt::Display for SafetyCategory {
    // Display is the API name; keeps log lines greppable against upstream docs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

/// The complete block list. Every entry is enforced at the strictest
/// threshold the upstream filter offers.
pub const BLOCKED_CATEGORIES: [SafetyCategory; 5] = [
    SafetyCategory::Harassment,
    SafetyCategory::HateSpeech,
    SafetyCategory::SexuallyExplicit,
    SafetyCategory::DangerousContent,
    SafetyCategory::ChildSafety,
];
