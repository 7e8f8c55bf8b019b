//! Password validation.
//!
//! Runs at the boundary, before any note content reaches the cipher.

use crate::error::{NoteError, Result};

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Validate that a password meets the minimum requirements for sealing a note.
///
/// # Requirements
///
/// - Not empty or only whitespace
/// - At least 4 characters long
///
/// # Examples
///
/// ```
/// use notecrypt_core::crypto::validate_password;
///
/// assert!(validate_password("hunter2").is_ok());
/// assert!(validate_password("abc").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(NoteError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(NoteError::InvalidInput(format!(
            "Password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH, length
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("hunter2").is_ok());
        assert!(validate_password("correct horse battery staple").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let result = validate_password("abc");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 4 characters"));
    }

    #[test]
    fn test_password_empty() {
        assert!(validate_password("").is_err());
        assert!(validate_password("    ").is_err());
        assert!(validate_password("\n\t").is_err());
    }

    #[test]
    fn test_password_exactly_min_length() {
        assert!(validate_password("1234").is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Three characters, nine bytes.
        assert!(validate_password("日本語").is_err());
        assert!(validate_password("日本語!").is_ok());
    }
}
