//! Error types for the intake engine.

/// Errors raised by a storage capability (local or session storage).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Storage is not available in this environment
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Reading a key failed
    #[error("Failed to read '{key}': {reason}")]
    ReadFailed { key: String, reason: String },

    /// Writing or removing a key failed (quota, privacy mode, ...)
    #[error("Failed to write '{key}': {reason}")]
    WriteFailed { key: String, reason: String },
}

/// Errors raised by intake operations.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// Storage capability error
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Snapshot could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Access gate rejected the password
    #[error("Incorrect password. Please try again.")]
    IncorrectPassword,

    /// Event targeted a control that does not exist
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Event does not apply to the targeted control's kind
    #[error("Field '{name}' does not accept {operation}")]
    NotEditable { name: String, operation: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_converts() {
        let err: IntakeError = StoreError::WriteFailed {
            key: "speedrunFormData".to_string(),
            reason: "QuotaExceededError".to_string(),
        }
        .into();

        assert!(matches!(err, IntakeError::Storage(_)));
        assert!(err.to_string().contains("QuotaExceededError"));
    }

    #[test]
    fn test_password_message_is_user_facing() {
        assert_eq!(
            IntakeError::IncorrectPassword.to_string(),
            "Incorrect password. Please try again."
        );
    }
}
