//! Key derivation for note content.
//!
//! Two derivation paths exist:
//!
//! - **Password** (current): PBKDF2-HMAC-SHA256 over the password, salted
//!   with the owner id so the key is bound to the account.
//! - **Legacy**: SHA-256 over the owner id and the installation salt. This
//!   path exists only for content written before password encryption and is
//!   low-security; nothing new should be sealed with it.

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::ZeroizeOnDrop;

use crate::error::{NoteError, Result};

/// PBKDF2 rounds for format version 1.
///
/// Ciphertexts record their format version, not this number. Changing the
/// round count means introducing a new version, otherwise existing notes can
/// no longer be opened.
pub const PBKDF2_ITERATIONS_V1: u32 = 600_000;

/// Length of derived key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Which derivation produced a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Password,
    Legacy,
}

impl KeyMode {
    pub(crate) fn tag(self) -> &'static str {
        match self {
            KeyMode::Password => "p",
            KeyMode::Legacy => "l",
        }
    }

    pub(crate) fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "p" => Some(KeyMode::Password),
            "l" => Some(KeyMode::Legacy),
            _ => None,
        }
    }
}

/// A symmetric key derived for one owner.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    #[zeroize(skip)]
    mode: KeyMode,
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(mode: KeyMode, bytes: [u8; KEY_LENGTH]) -> Self {
        Self { mode, key: bytes }
    }

    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// Raw key bytes. Use only for immediate cipher operations; never store or log.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("mode", &self.mode)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a key from a password, salted with the owner id.
///
/// Deterministic: the same password and owner always give the same key.
///
/// # Examples
///
/// ```
/// use notecrypt_core::crypto::derive_password_key;
///
/// let key = derive_password_key("hunter2", "user_42").unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_password_key(password: &str, owner_id: &str) -> Result<DerivedKey> {
    if owner_id.is_empty() {
        return Err(NoteError::InvalidInput(
            "Owner id cannot be empty".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(NoteError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    debug!(owner_id, "deriving password key");
    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        owner_id.as_bytes(),
        PBKDF2_ITERATIONS_V1,
        &mut key_bytes,
    );

    Ok(DerivedKey::from_bytes(KeyMode::Password, key_bytes))
}

/// Derive the legacy password-less key: `SHA-256(owner_id || salt)`.
pub fn derive_legacy_key(owner_id: &str, salt: &str) -> Result<DerivedKey> {
    if owner_id.is_empty() {
        return Err(NoteError::InvalidInput(
            "Owner id cannot be empty".to_string(),
        ));
    }
    if salt.is_empty() {
        return Err(NoteError::InvalidInput(
            "Legacy salt cannot be empty".to_string(),
        ));
    }

    debug!(owner_id, "deriving legacy key");
    let mut hasher = Sha256::new();
    hasher.update(owner_id.as_bytes());
    hasher.update(salt.as_bytes());
    let digest: [u8; KEY_LENGTH] = hasher.finalize().into();

    Ok(DerivedKey::from_bytes(KeyMode::Legacy, digest))
}
