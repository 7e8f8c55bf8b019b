//! Authenticated encryption of note content.
//!
//! Sealed content is stored as a single text value:
//!
//! ```text
//! nc1:<mode>:<base64(nonce || ciphertext || tag)>
//! ```
//!
//! `<mode>` is `p` for password-derived keys and `l` for legacy keys. The
//! `nc1:<mode>` header is authenticated as associated data, so it cannot be
//! swapped without failing the tag check.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroize;

use crate::config::CipherConfig;
use crate::crypto::key::{derive_legacy_key, derive_password_key, DerivedKey, KeyMode};
use crate::error::{NoteError, Result};

/// Envelope format version written by [`seal`].
pub const FORMAT_VERSION: &str = "nc1";

const NONCE_LENGTH: usize = 12;
const TAG_LENGTH: usize = 16;

/// Opaque sealed content, safe to store in a text column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CipherText(String);

impl CipherText {
    /// Accept a stored value as ciphertext if it has a well-formed envelope.
    ///
    /// This checks structure only; whether it opens is up to [`open`].
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if Envelope::parse(&value).is_none() {
            return Err(NoteError::InvalidInput(
                "Malformed ciphertext envelope".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// True when `value` has the shape of a sealed envelope.
    pub fn is_envelope(value: &str) -> bool {
        Envelope::parse(value).is_some()
    }

    /// Key mode recorded in the envelope header.
    pub fn mode(&self) -> Option<KeyMode> {
        Envelope::parse(&self.0).map(|envelope| envelope.mode)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CipherText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

struct Envelope {
    mode: KeyMode,
    payload: Vec<u8>,
}

impl Envelope {
    fn parse(value: &str) -> Option<Self> {
        let mut parts = value.splitn(3, ':');
        let version = parts.next()?;
        let mode = KeyMode::from_tag(parts.next()?)?;
        let encoded = parts.next()?;
        if version != FORMAT_VERSION {
            return None;
        }
        let payload = STANDARD.decode(encoded).ok()?;
        if payload.len() < NONCE_LENGTH + TAG_LENGTH {
            return None;
        }
        Some(Self { mode, payload })
    }
}

fn header(mode: KeyMode) -> String {
    format!("{}:{}", FORMAT_VERSION, mode.tag())
}

fn aead(key: &DerivedKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| NoteError::Crypto("Invalid key length".to_string()))
}

/// Seal `plaintext` under an already-derived key.
///
/// A fresh random nonce is drawn for every call, so sealing the same text
/// twice yields different ciphertexts.
pub fn seal(key: &DerivedKey, plaintext: &str) -> Result<CipherText> {
    let mut nonce = [0u8; NONCE_LENGTH];
    getrandom::getrandom(&mut nonce)
        .map_err(|e| NoteError::Crypto(format!("Failed to generate nonce: {}", e)))?;

    let header = header(key.mode());
    let sealed = aead(key)?
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext.as_bytes(),
                aad: header.as_bytes(),
            },
        )
        .map_err(|_| NoteError::Crypto("Encryption failed".to_string()))?;

    let mut payload = Vec::with_capacity(NONCE_LENGTH + sealed.len());
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&sealed);

    Ok(CipherText(format!("{}:{}", header, STANDARD.encode(payload))))
}

/// Open a sealed value with an already-derived key.
///
/// Every failure (bad envelope, mode mismatch, tag mismatch, invalid UTF-8)
/// is reported as [`NoteError::DecryptionFailed`].
pub fn open(key: &DerivedKey, ciphertext: &str) -> Result<String> {
    let envelope = Envelope::parse(ciphertext).ok_or(NoteError::DecryptionFailed)?;
    if envelope.mode != key.mode() {
        return Err(NoteError::DecryptionFailed);
    }

    let (nonce, body) = envelope.payload.split_at(NONCE_LENGTH);
    let header = header(envelope.mode);
    let bytes = aead(key)?
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: body,
                aad: header.as_bytes(),
            },
        )
        .map_err(|_| NoteError::DecryptionFailed)?;

    String::from_utf8(bytes).map_err(|err| {
        err.into_bytes().zeroize();
        NoteError::DecryptionFailed
    })
}

/// Derives per-owner keys and seals or opens note content.
///
/// Stateless apart from the injected [`CipherConfig`]; a single instance can
/// be shared across threads.
#[derive(Debug, Default)]
pub struct ContentCipher {
    config: CipherConfig,
}

impl ContentCipher {
    pub fn new(config: CipherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Derive the key for `owner_id`.
    ///
    /// With a password this is the PBKDF2 path. Without one it falls back to
    /// legacy mode, which fails with `InvalidInput` unless a legacy salt is
    /// configured.
    pub fn derive_key(&self, owner_id: &str, password: Option<&str>) -> Result<DerivedKey> {
        match password {
            Some(password) => derive_password_key(password, owner_id),
            None => {
                let salt = self.config.legacy_salt().ok_or_else(|| {
                    NoteError::InvalidInput(
                        "A password is required; legacy mode is not configured".to_string(),
                    )
                })?;
                derive_legacy_key(owner_id, salt)
            }
        }
    }

    /// Encrypt `plaintext` for `owner_id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use notecrypt_core::crypto::ContentCipher;
    ///
    /// let cipher = ContentCipher::default();
    /// let sealed = cipher.encrypt("secret", "user_42", Some("hunter2")).unwrap();
    /// assert_ne!(sealed.as_str(), "secret");
    /// ```
    pub fn encrypt(
        &self,
        plaintext: &str,
        owner_id: &str,
        password: Option<&str>,
    ) -> Result<CipherText> {
        let key = self.derive_key(owner_id, password)?;
        let sealed = seal(&key, plaintext)?;
        debug!(owner_id, mode = ?key.mode(), "sealed content");
        Ok(sealed)
    }

    /// Decrypt content previously produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the ciphertext or owner id is empty, or no password
    ///   is given while legacy mode is disabled
    /// - `DecryptionFailed` for a wrong password, wrong owner, or any
    ///   corruption of the ciphertext
    pub fn decrypt(
        &self,
        ciphertext: &str,
        owner_id: &str,
        password: Option<&str>,
    ) -> Result<String> {
        if ciphertext.is_empty() {
            return Err(NoteError::InvalidInput(
                "Ciphertext cannot be empty".to_string(),
            ));
        }
        let key = self.derive_key(owner_id, password)?;
        let plaintext = open(&key, ciphertext)?;
        debug!(owner_id, mode = ?key.mode(), "opened content");
        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SALT: &str = "installation-salt";

    fn legacy_cipher() -> ContentCipher {
        ContentCipher::new(CipherConfig::new().with_legacy_salt(SALT))
    }

    fn fast_key() -> DerivedKey {
        derive_legacy_key("user_42", SALT).unwrap()
    }

    /// Replace the character at `index` with a different base64-alphabet character.
    fn mutate_char(value: &str, index: usize) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_meeting_notes_scenario() {
        let cipher = ContentCipher::default();
        let sealed = cipher
            .encrypt("Meeting notes: discuss Q3 roadmap", "user_42", Some("hunter2"))
            .unwrap();

        let opened = cipher
            .decrypt(sealed.as_str(), "user_42", Some("hunter2"))
            .unwrap();
        assert_eq!(opened, "Meeting notes: discuss Q3 roadmap");

        let wrong = cipher.decrypt(sealed.as_str(), "user_42", Some("wrongpass"));
        assert!(matches!(wrong, Err(NoteError::DecryptionFailed)));
    }

    #[test]
    fn test_legacy_envelope_without_salt_is_invalid_input() {
        let sealed = legacy_cipher().encrypt("old note", "user_42", None).unwrap();
        let result = ContentCipher::default().decrypt(sealed.as_str(), "user_42", None);
        assert!(matches!(result, Err(NoteError::InvalidInput(_))));
    }

    #[test]
    fn test_owner_isolation() {
        let cipher = ContentCipher::default();
        let sealed = cipher.encrypt("private", "user_1", Some("hunter2")).unwrap();
        let result = cipher.decrypt(sealed.as_str(), "user_2", Some("hunter2"));
        assert!(matches!(result, Err(NoteError::DecryptionFailed)));
    }

    #[test]
    fn test_legacy_round_trip() {
        let cipher = legacy_cipher();
        let sealed = cipher.encrypt("old note", "user_42", None).unwrap();
        assert_eq!(sealed.mode(), Some(KeyMode::Legacy));
        let opened = cipher.decrypt(sealed.as_str(), "user_42", None).unwrap();
        assert_eq!(opened, "old note");
    }

    #[test]
    fn test_legacy_disabled_requires_password() {
        let cipher = ContentCipher::default();
        let result = cipher.encrypt("note", "user_42", None);
        assert!(matches!(result, Err(NoteError::InvalidInput(_))));
    }

    #[test]
    fn test_mode_mismatch_fails_closed() {
        let cipher = legacy_cipher();
        let sealed = cipher.encrypt("old note", "user_42", None).unwrap();
        let result = cipher.decrypt(sealed.as_str(), "user_42", Some("hunter2"));
        assert!(matches!(result, Err(NoteError::DecryptionFailed)));
    }

    #[test]
    fn test_same_input_different_ciphertext() {
        let key = fast_key();
        let first = seal(&key, "same text").unwrap();
        let second = seal(&key, "same text").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_plaintext_is_authenticated() {
        let key = fast_key();
        let sealed = seal(&key, "").unwrap();
        assert_eq!(open(&key, sealed.as_str()).unwrap(), "");

        let other = derive_legacy_key("user_43", SALT).unwrap();
        assert!(matches!(
            open(&other, sealed.as_str()),
            Err(NoteError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_every_single_char_mutation_fails_password_mode() {
        let key = derive_password_key("hunter2", "user_42").unwrap();
        let sealed = seal(&key, "Meeting notes: discuss Q3 roadmap").unwrap();
        let text = sealed.as_str();

        for index in 0..text.chars().count() {
            let tampered = mutate_char(text, index);
            let result = open(&key, &tampered);
            assert!(
                matches!(result, Err(NoteError::DecryptionFailed)),
                "mutation at {} was not rejected",
                index
            );
        }
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let key = fast_key();
        let sealed = seal(&key, "some content").unwrap();
        let text = sealed.as_str();
        let truncated = &text[..text.len() - 8];
        assert!(matches!(
            open(&key, truncated),
            Err(NoteError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_garbage_fails_closed() {
        let key = fast_key();
        for garbage in ["hello", "nc1:p:", "nc1:p:!!!!", "nc2:l:AAAA", "::"] {
            assert!(matches!(
                open(&key, garbage),
                Err(NoteError::DecryptionFailed)
            ));
        }
    }

    #[test]
    fn test_empty_inputs_are_invalid() {
        let cipher = ContentCipher::default();
        assert!(matches!(
            cipher.decrypt("", "user_42", Some("hunter2")),
            Err(NoteError::InvalidInput(_))
        ));
        assert!(matches!(
            cipher.encrypt("text", "", Some("hunter2")),
            Err(NoteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ciphertext_parse() {
        let key = fast_key();
        let sealed = seal(&key, "content").unwrap();
        assert!(CipherText::parse(sealed.as_str()).is_ok());
        assert!(CipherText::is_envelope(sealed.as_str()));
        assert!(CipherText::parse("plain text").is_err());
        assert!(!CipherText::is_envelope("nc1:x:AAAA"));
    }

    #[test]
    fn test_ciphertext_does_not_contain_plaintext() {
        let key = fast_key();
        let sealed = seal(&key, "PLAINTEXT_MARKER_123").unwrap();
        assert!(!sealed.as_str().contains("PLAINTEXT_MARKER_123"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_round_trip(plaintext in "\\PC{1,200}") {
            let key = fast_key();
            let sealed = seal(&key, &plaintext).unwrap();
            prop_assert_eq!(open(&key, sealed.as_str()).unwrap(), plaintext);
        }

        #[test]
        fn prop_other_owner_fails(owner in "[a-z0-9_]{1,24}") {
            prop_assume!(owner != "user_42");
            let sealed = seal(&fast_key(), "secret").unwrap();
            let other = derive_legacy_key(&owner, SALT).unwrap();
            prop_assert!(matches!(
                open(&other, sealed.as_str()),
                Err(NoteError::DecryptionFailed)
            ));
        }

        #[test]
        fn prop_single_char_tamper_fails(plaintext in "\\PC{1,64}", seed in any::<usize>()) {
            let key = fast_key();
            let sealed = seal(&key, &plaintext).unwrap();
            let index = seed % sealed.as_str().chars().count();
            let tampered = mutate_char(sealed.as_str(), index);
            prop_assert!(matches!(open(&key, &tampered), Err(NoteError::DecryptionFailed)));
        }
    }

    // Full-cost PBKDF2, so few cases.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(4))]

        #[test]
        fn prop_password_round_trip_and_mismatch(
            plaintext in "\\PC{1,64}",
            password in "[!-~]{4,24}",
            other in "[!-~]{4,24}",
        ) {
            prop_assume!(password != other);
            let cipher = ContentCipher::default();
            let sealed = cipher.encrypt(&plaintext, "user_42", Some(&password)).unwrap();
            prop_assert_eq!(
                cipher.decrypt(sealed.as_str(), "user_42", Some(&password)).unwrap(),
                plaintext
            );
            prop_assert!(matches!(
                cipher.decrypt(sealed.as_str(), "user_42", Some(&other)),
                Err(NoteError::DecryptionFailed)
            ));
        }
    }
}
