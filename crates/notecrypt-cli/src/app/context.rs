//! Application context for the notecrypt CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;

use notecrypt_core::notes::NoteService;
use notecrypt_core::storage::{OwnerId, SqliteStore};
use notecrypt_core::{CipherConfig, ContentCipher};

use crate::cli::Cli;
use crate::config::{read_config, NotecryptConfig};
use crate::constants::env_vars;
use crate::errors::CliError;

use super::resolver::{missing_config_message, missing_store_message, resolve_config_path};

/// Application context that bundles CLI args with the config file.
///
/// Commands that only need flags never touch the config file.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<NotecryptConfig>>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self, no_input: bool) -> bool {
        !no_input && std::io::stdin().is_terminal()
    }

    /// The config file, if one exists.
    pub fn config(&self) -> anyhow::Result<Option<&NotecryptConfig>> {
        let config = self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if path.exists() {
                read_config(&path).map(Some)
            } else {
                Ok(None)
            }
        })?;
        Ok(config.as_ref())
    }

    /// Store path from `--db` / `NOTECRYPT_DB`, falling back to the config.
    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = self.cli.db.as_deref() {
            return Ok(PathBuf::from(path));
        }
        match self.config()? {
            Some(config) => Ok(PathBuf::from(&config.store.path)),
            None => Err(self.missing_config()?),
        }
    }

    /// Owner from `--owner` / `NOTECRYPT_OWNER`, falling back to the config.
    pub fn owner(&self) -> anyhow::Result<OwnerId> {
        let raw = match self.cli.owner.as_deref() {
            Some(owner) => owner.to_string(),
            None => match self.config()? {
                Some(config) => config.account.owner_id.clone(),
                None => return Err(self.missing_config()?),
            },
        };
        Ok(OwnerId::new(raw)?)
    }

    /// Cipher settings; `NOTECRYPT_LEGACY_SALT` overrides the config file.
    pub fn cipher_config(&self) -> anyhow::Result<CipherConfig> {
        if let Ok(salt) = std::env::var(env_vars::LEGACY_SALT) {
            if !salt.trim().is_empty() {
                return Ok(CipherConfig::new().with_legacy_salt(salt));
            }
        }
        let salt = self
            .config()?
            .and_then(|config| config.cipher.legacy_salt.clone());
        Ok(match salt {
            Some(salt) => CipherConfig::new().with_legacy_salt(salt),
            None => CipherConfig::new(),
        })
    }

    /// Get the configured editor override, if any.
    pub fn editor(&self) -> anyhow::Result<Option<&str>> {
        Ok(self
            .config()?
            .and_then(|config| config.ui.editor.as_deref()))
    }

    /// Open the note store and build the service for the configured owner.
    pub fn open_service(&self) -> anyhow::Result<(NoteService<SqliteStore>, OwnerId)> {
        let path = self.store_path()?;
        let owner = self.owner()?;
        let store = open_store(&path)?;
        let cipher = ContentCipher::new(self.cipher_config()?);
        Ok((NoteService::new(store, cipher), owner))
    }

    fn missing_config(&self) -> anyhow::Result<anyhow::Error> {
        let path = resolve_config_path()?;
        Ok(CliError::not_found(
            missing_config_message(&path),
            "Hint: Set NOTECRYPT_DB and NOTECRYPT_OWNER to skip the config file.",
        )
        .into())
    }
}

fn open_store(path: &Path) -> anyhow::Result<SqliteStore> {
    if !path.exists() {
        return Err(CliError::not_found(
            missing_store_message(path),
            "Hint: Run `notecrypt init` to create a store.",
        )
        .into());
    }
    Ok(SqliteStore::open(path)?)
}
