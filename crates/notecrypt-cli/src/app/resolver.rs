//! Path resolution for config and store files.

use std::path::{Path, PathBuf};

use crate::config::default_config_path;
use crate::constants::env_vars;

/// Resolve the config file path, checking NOTECRYPT_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env_vars::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Error message when the store file is missing.
pub fn missing_store_message(path: &Path) -> String {
    format!(
        "No note store found at {}\n\nRun:\n  notecrypt init --owner <ID>\n\nOr specify a store path:\n  NOTECRYPT_DB=/path/to/notes.db notecrypt init --owner <ID>",
        path.display()
    )
}

/// Error message when the config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!(
        "No config found at {}\n\nRun:\n  notecrypt init --owner <ID>\n\nOr pass --db and --owner explicitly.",
        config_path.display()
    )
}
