use std::path::PathBuf;

use notecrypt_core::storage::{OwnerId, SqliteStore};
use tracing::info;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, write_config, NotecryptConfig};
use crate::errors::CliError;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let owner = ctx.cli().owner.as_deref().ok_or_else(|| {
        CliError::invalid_input("An owner is required: pass --owner <ID> or set NOTECRYPT_OWNER")
    })?;
    let owner = OwnerId::new(owner)?;

    let config_path = match args.config_path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => resolve_config_path()?,
    };
    if config_path.exists() {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}",
            config_path.display()
        ))
        .into());
    }

    let store_path = match args.path.as_deref().or(ctx.cli().db.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => default_store_path()?,
    };
    if store_path.exists() {
        return Err(CliError::invalid_input(format!(
            "A note store already exists at {}",
            store_path.display()
        ))
        .into());
    }
    if let Some(parent) = store_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
            })?;
        }
    }

    SqliteStore::create(&store_path)?;

    let legacy_salt = args
        .legacy_salt
        .clone()
        .filter(|salt| !salt.trim().is_empty());
    let config = NotecryptConfig::new(
        store_path.clone(),
        owner.to_string(),
        legacy_salt,
        args.editor.clone(),
    );
    write_config(&config_path, &config)?;
    info!(owner_id = %owner, "initialized note store");

    if !ctx.quiet() {
        println!("Initialized note store at {}", store_path.display());
        println!("Config written to {}", config_path.display());
    }
    Ok(())
}
