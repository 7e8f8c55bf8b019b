use notecrypt_core::storage::FolderChanges;

use crate::app::AppContext;
use crate::cli::FolderSubcommand;
use crate::helpers::{parse_id, parse_optional_id};
use crate::output::{folders_table, print_json};

pub fn handle_folder(ctx: &AppContext, command: &FolderSubcommand) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;

    match command {
        FolderSubcommand::Add {
            name,
            parent,
            color,
        } => {
            let parent_id = parse_optional_id("folder", parent.as_deref())?;
            let folder = service.create_folder(&owner, name, parent_id, color.as_deref())?;
            if !ctx.quiet() {
                println!("Created folder {} ({})", folder.name, folder.id);
            }
        }
        FolderSubcommand::List { json } => {
            let folders = service.list_folders(&owner)?;
            if *json {
                return print_json(&folders);
            }
            if folders.is_empty() {
                if !ctx.quiet() {
                    println!("No folders found.");
                }
                return Ok(());
            }
            println!("{}", folders_table(&folders));
        }
        FolderSubcommand::Rename { id, name } => {
            let id = parse_id("folder", id)?;
            let changes = FolderChanges {
                name: Some(name.clone()),
                ..Default::default()
            };
            let folder = service.update_folder(&owner, &id, changes)?;
            if !ctx.quiet() {
                println!("Renamed folder {} to {}", folder.id, folder.name);
            }
        }
        FolderSubcommand::Move { id, parent } => {
            let id = parse_id("folder", id)?;
            let parent_id = parse_optional_id("folder", parent.as_deref())?;
            let changes = FolderChanges {
                parent_id: Some(parent_id),
                ..Default::default()
            };
            let folder = service.update_folder(&owner, &id, changes)?;
            if !ctx.quiet() {
                match folder.parent_id {
                    Some(parent_id) => println!("Moved folder {} under {}", folder.id, parent_id),
                    None => println!("Moved folder {} to the top level", folder.id),
                }
            }
        }
        FolderSubcommand::Delete { id, yes } => {
            let id = parse_id("folder", id)?;
            if !*yes && ctx.interactive(false) {
                let folder = service.get_folder(&owner, &id)?;
                let proceed = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete folder \"{}\" and its subfolders? Notes inside move to the root.",
                        folder.name
                    ))
                    .default(false)
                    .interact()?;
                if !proceed {
                    return Err(anyhow::anyhow!("Delete cancelled"));
                }
            }
            service.delete_folder(&owner, &id)?;
            if !ctx.quiet() {
                println!("Deleted folder {}", id);
            }
        }
    }
    Ok(())
}
