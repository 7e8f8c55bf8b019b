use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct NotecryptConfig {
    pub store: StoreSection,
    pub account: AccountSection,
    #[serde(default)]
    pub cipher: CipherSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountSection {
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CipherSection {
    /// Installation salt for legacy-mode notes. Absent means legacy mode is off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_salt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

impl NotecryptConfig {
    pub fn new(
        store_path: PathBuf,
        owner_id: String,
        legacy_salt: Option<String>,
        editor: Option<String>,
    ) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
            },
            account: AccountSection { owner_id },
            cipher: CipherSection { legacy_salt },
            ui: UiSection { editor },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("notes.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<NotecryptConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &NotecryptConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    notecrypt_core::fs::write_atomic(path, contents.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("notecrypt"));
        }
    }
    Ok(home_dir()?.join(".config").join("notecrypt"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("notecrypt"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("notecrypt"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [store]
            path = "/tmp/notes.db"

            [account]
            owner_id = "user_42"

            [cipher]
            legacy_salt = "installation-salt"

            [ui]
            editor = "vim"
        "#;
        let config: NotecryptConfig = toml::from_str(toml).expect("parse config");
        assert_eq!(config.store.path, "/tmp/notes.db");
        assert_eq!(config.account.owner_id, "user_42");
        assert_eq!(
            config.cipher.legacy_salt.as_deref(),
            Some("installation-salt")
        );
        assert_eq!(config.ui.editor.as_deref(), Some("vim"));
    }

    #[test]
    fn test_optional_sections_default() {
        let toml = r#"
            [store]
            path = "/tmp/notes.db"

            [account]
            owner_id = "user_42"
        "#;
        let config: NotecryptConfig = toml::from_str(toml).expect("parse config");
        assert!(config.cipher.legacy_salt.is_none());
        assert!(config.ui.editor.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = std::env::temp_dir().join(format!("notecrypt-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let config = NotecryptConfig::new(
            PathBuf::from("/tmp/notes.db"),
            "user_42".to_string(),
            None,
            Some("nano".to_string()),
        );
        write_config(&path, &config).expect("write config");
        let read = read_config(&path).expect("read config");
        assert_eq!(read.account.owner_id, "user_42");
        assert_eq!(read.ui.editor.as_deref(), Some("nano"));
        assert!(!std::fs::read_to_string(&path).unwrap().contains("legacy_salt"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_xdg_paths_use_env() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/notecrypt-config-test");
        std::env::set_var("XDG_DATA_HOME", "/tmp/notecrypt-data-test");

        let config_dir = xdg_config_dir().expect("config dir");
        let data_dir = xdg_data_dir().expect("data dir");

        assert_eq!(
            config_dir,
            PathBuf::from("/tmp/notecrypt-config-test").join("notecrypt")
        );
        assert_eq!(
            data_dir,
            PathBuf::from("/tmp/notecrypt-data-test").join("notecrypt")
        );
    }
}
