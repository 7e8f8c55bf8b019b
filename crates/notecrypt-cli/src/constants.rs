//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (config, store, note, folder, tag).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Decryption failed (wrong password or corrupted content).
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variables read by the CLI.
pub mod env_vars {
    pub const CONFIG: &str = "NOTECRYPT_CONFIG";
    pub const PASSWORD: &str = "NOTECRYPT_PASSWORD";
    pub const LEGACY_SALT: &str = "NOTECRYPT_LEGACY_SALT";
    pub const LOG: &str = "NOTECRYPT_LOG";
}

/// Default number of notes shown by `list`.
pub const DEFAULT_LIST_LIMIT: usize = 50;
