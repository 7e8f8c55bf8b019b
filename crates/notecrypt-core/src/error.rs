//! Error types for notecrypt core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to exit codes and user-facing messages.

use thiserror::Error;

/// Result type alias for notecrypt operations.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Message shared by every decryption failure so callers cannot tell a wrong
/// password apart from corrupted data.
pub const DECRYPTION_FAILED_MESSAGE: &str =
    "Failed to decrypt content. Incorrect password or corrupted data.";

/// Core error type for notecrypt operations.
#[derive(Debug, Error)]
pub enum NoteError {
    /// Missing or malformed input, rejected before any cryptographic work
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Wrong password, wrong owner, or tampered ciphertext
    #[error("{}", DECRYPTION_FAILED_MESSAGE)]
    DecryptionFailed,

    /// Encryption machinery failure (RNG, cipher construction)
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Resource not found (or not owned by the caller)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stored data violates an at-rest invariant
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl NoteError {
    /// True when the error came from a failed decryption attempt.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, NoteError::DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_failed_message_is_fixed() {
        assert_eq!(
            NoteError::DecryptionFailed.to_string(),
            DECRYPTION_FAILED_MESSAGE
        );
    }

    #[test]
    fn test_invalid_input_display() {
        let err = NoteError::InvalidInput("Owner id cannot be empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: Owner id cannot be empty");
        assert!(!err.is_decryption_failure());
    }
}
