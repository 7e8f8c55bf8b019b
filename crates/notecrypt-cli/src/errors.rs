//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI. Errors raised by the
//! core library are mapped through [`exit_code_for`].

use std::fmt;

use notecrypt_core::NoteError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, store, note, etc.)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<NoteError>() {
        Some(NoteError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(NoteError::InvalidInput(_)) | Some(NoteError::Conflict(_)) => {
            exit_codes::INVALID_INPUT
        }
        Some(NoteError::DecryptionFailed) => exit_codes::AUTH_FAILED,
        Some(NoteError::Integrity(_)) => exit_codes::INTEGRITY_FAILED,
        _ => exit_codes::FAILURE,
    }
}

/// Contextual hint for common failures.
pub fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<NoteError>()? {
        NoteError::DecryptionFailed => Some(
            "Hint: Check the note's password. Set NOTECRYPT_PASSWORD for non-interactive use.",
        ),
        NoteError::Integrity(_) => {
            Some("Hint: Export readable notes before repairing or restoring the store.")
        }
        NoteError::NotFound(message) if message.starts_with("Note") => {
            Some("Hint: Run `notecrypt list` to find note IDs.")
        }
        NoteError::NotFound(message) if message.to_lowercase().contains("folder") => {
            Some("Hint: Run `notecrypt folder list` to find folder IDs.")
        }
        NoteError::NotFound(message) if message.to_lowercase().contains("tag") => {
            Some("Hint: Run `notecrypt tag list` to find tag IDs.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let cases = [
            (NoteError::NotFound("Note not found".into()), exit_codes::NOT_FOUND),
            (NoteError::InvalidInput("x".into()), exit_codes::INVALID_INPUT),
            (NoteError::Conflict("x".into()), exit_codes::INVALID_INPUT),
            (NoteError::DecryptionFailed, exit_codes::AUTH_FAILED),
            (NoteError::Integrity("x".into()), exit_codes::INTEGRITY_FAILED),
            (NoteError::Storage("x".into()), exit_codes::FAILURE),
        ];
        for (err, code) in cases {
            assert_eq!(exit_code_for(&anyhow::Error::new(err)), code);
        }
    }

    #[test]
    fn test_context_keeps_exit_code() {
        let err = anyhow::Error::new(NoteError::DecryptionFailed).context("decrypting note");
        assert_eq!(exit_code_for(&err), exit_codes::AUTH_FAILED);
    }

    #[test]
    fn test_cli_error_exit_codes() {
        let err = anyhow::Error::new(CliError::not_found("No config", "Hint: run init"));
        assert_eq!(exit_code_for(&err), exit_codes::NOT_FOUND);
        assert!(err.to_string().contains("Hint: run init"));
    }
}
