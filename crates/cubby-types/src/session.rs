//! Kid profile captured at parent setup.
//!
//! The profile is the *only* personal data Cubby ever holds, it lives
//! in process memory for the session lifetime, and it is immutable
//! after setup.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of the kid's display name.
pub const MAX_KID_NAME_LEN: usize = 40;
/// Maximum length of the buddy's display name.
pub const MAX_BUDDY_NAME_LEN: usize = 30;
/// Supported age range, inclusive.
pub const MIN_AGE: u8 = 3;
pub const MAX_AGE: u8 = 11;

/// Profile captured at setup: name, age, and what the child calls
/// their buddy. No other personal data is retained anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KidProfile {
    pub kid_name: String,
    pub age: u8,
    pub buddy_name: String,
}

impl KidProfile {
    /// Validate profile bounds before a session is created.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kid_name.trim().is_empty() {
            return Err(ValidationError::field("kid_name", "must not be empty"));
        }
        if self.kid_name.chars().count() > MAX_KID_NAME_LEN {
            return Err(ValidationError::field("kid_name", "too long (max 40 chars)"));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ValidationError::field("age", "must be between 3 and 11"));
        }
        if self.buddy_name.trim().is_empty() {
            return Err(ValidationError::field("buddy_name", "must not be empty"));
        }
        if self.buddy_name.chars().count() > MAX_BUDDY_NAME_LEN {
            return Err(ValidationError::field(
                "buddy_name",
                "too long (max 30 chars)",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> KidProfile {
        KidProfile {
            kid_name: "Alex".to_string(),
            age: 7,
            buddy_name: "Sparkle".to_string(),
        }
    }

    #[test]
    fn test_valid_profile() {
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn test_empty_kid_name_rejected() {
        let mut p = profile();
        p.kid_name = "   ".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_age_bounds() {
        let mut p = profile();
        p.age = 2;
        assert!(p.validate().is_err());
        p.age = 3;
        assert!(p.validate().is_ok());
        p.age = 11;
        assert!(p.validate().is_ok());
        p.age = 12;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_kid_name_length_bounds() {
        let mut p = profile();
        p.kid_name = "k".repeat(MAX_KID_NAME_LEN);
        assert!(p.validate().is_ok());
        p.kid_name = "k".repeat(MAX_KID_NAME_LEN + 1);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_long_buddy_name_rejected() {
        let mut p = profile();
        p.buddy_name = "b".repeat(MAX_BUDDY_NAME_LEN + 1);
        assert!(p.validate().is_err());
    }
}
