//! Cryptographic operations for note content.
//!
//! Built on well-audited RustCrypto primitives:
//! - **PBKDF2-HMAC-SHA256**: password key derivation, salted with the owner id
//! - **AES-256-GCM**: authenticated encryption of note bodies
//!
//! ## Security Model
//!
//! - A note is sealed under a key derived from `(owner id, password)`
//! - Wrong passwords, wrong owners and tampered ciphertexts all fail with the
//!   same `DecryptionFailed` error
//! - Key material is zeroized from memory on drop
//! - Passwords are never stored
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the note database
//! - Reading another account's sealed notes
//!
//! We do NOT defend against:
//! - A compromised host inspecting process memory during decryption
//! - Weak passwords (the enforced minimum is 4 characters)
//!
//! Legacy mode (no password, installation-wide salt) only exists to open
//! notes written before password encryption. See [`key::derive_legacy_key`].

pub mod cipher;
pub mod key;
pub mod password;

pub use cipher::{open, seal, CipherText, ContentCipher, FORMAT_VERSION};
pub use key::{
    derive_legacy_key, derive_password_key, DerivedKey, KeyMode, PBKDF2_ITERATIONS_V1,
};
pub use password::{validate_password, MIN_PASSWORD_LENGTH};
