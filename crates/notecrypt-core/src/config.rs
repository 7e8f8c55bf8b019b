//! Cipher configuration injected at construction.

use secrecy::{ExposeSecret, SecretString};

/// Installation-wide settings for [`ContentCipher`](crate::crypto::ContentCipher).
///
/// The only setting is the legacy salt. It is read once when the cipher is
/// built and never mutated afterwards.
#[derive(Debug, Default)]
pub struct CipherConfig {
    legacy_salt: Option<SecretString>,
}

impl CipherConfig {
    /// Configuration with legacy (password-less) mode disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable legacy mode with the given installation salt.
    ///
    /// Blank salts are ignored and leave legacy mode disabled.
    pub fn with_legacy_salt(mut self, salt: impl Into<String>) -> Self {
        let salt = salt.into();
        self.legacy_salt = if salt.trim().is_empty() {
            None
        } else {
            Some(SecretString::from(salt))
        };
        self
    }

    pub fn legacy_enabled(&self) -> bool {
        self.legacy_salt.is_some()
    }

    pub(crate) fn legacy_salt(&self) -> Option<&str> {
        self.legacy_salt.as_ref().map(|salt| salt.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_disables_legacy() {
        assert!(!CipherConfig::new().legacy_enabled());
    }

    #[test]
    fn test_blank_salt_disables_legacy() {
        let config = CipherConfig::new().with_legacy_salt("   ");
        assert!(!config.legacy_enabled());
        assert!(config.legacy_salt().is_none());
    }

    #[test]
    fn test_debug_redacts_salt() {
        let config = CipherConfig::new().with_legacy_salt("installation-secret");
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("installation-secret"));
    }
}
