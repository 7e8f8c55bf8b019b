//! # notecrypt core
//!
//! Core library for notecrypt - a CLI-first notebook with optional per-note
//! password encryption.
//!
//! This crate provides the cipher, the storage abstraction, and the note
//! service independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: Key derivation and the sealed content envelope
//! - **storage**: `NoteStore` trait, record types, and the SQLite store
//! - **notes**: Owner-scoped note, folder, and tag operations plus export
//! - **config**: Injected cipher configuration
//! - **fs**: Atomic file writes

pub mod config;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod notes;
pub mod storage;

pub use config::CipherConfig;
pub use crypto::{CipherText, ContentCipher};
pub use error::{NoteError, Result};
pub use notes::{NoteService, NoteView};
pub use storage::{NoteStore, OwnerId, SqliteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
