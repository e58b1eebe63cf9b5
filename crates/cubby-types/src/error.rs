use thiserror::Error;

/// Errors related to session lookup.
///
/// Expired sessions are indistinguishable from unknown ones on purpose:
/// the caller's remedy ("please start a new session") is the same.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
}

/// Malformed-request errors with a field-level reason.
///
/// Safe for developer consumption; never shown to the child.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: {reason}")]
    Field {
        field: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    pub fn field(field: &'static str, reason: &'static str) -> Self {
        ValidationError::Field { field, reason }
    }
}

/// Errors from the local transcript log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("invalid ciphertext: too short")]
    CiphertextTooShort,

    #[error("invalid log key: {0}")]
    InvalidKey(String),

    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        assert_eq!(SessionError::NotFound.to_string(), "session not found");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::field("age", "must be between 3 and 11");
        assert_eq!(err.to_string(), "age: must be between 3 and 11");
    }
}
