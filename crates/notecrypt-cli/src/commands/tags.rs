use notecrypt_core::storage::TagChanges;

use crate::app::AppContext;
use crate::cli::TagSubcommand;
use crate::helpers::{parse_id, parse_ids};
use crate::output::{print_json, tags_table};

pub fn handle_tag(ctx: &AppContext, command: &TagSubcommand) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;

    match command {
        TagSubcommand::Add { name, color } => {
            let tag = service.create_tag(&owner, name, color.as_deref())?;
            if !ctx.quiet() {
                println!("Created tag {} ({})", tag.name, tag.id);
            }
        }
        TagSubcommand::List { json } => {
            let tags = service.list_tags(&owner)?;
            if *json {
                return print_json(&tags);
            }
            if tags.is_empty() {
                if !ctx.quiet() {
                    println!("No tags found.");
                }
                return Ok(());
            }
            println!("{}", tags_table(&tags));
        }
        TagSubcommand::Rename { id, name, color } => {
            let id = parse_id("tag", id)?;
            let changes = TagChanges {
                name: Some(name.clone()),
                color: color.clone(),
            };
            let tag = service.update_tag(&owner, &id, changes)?;
            if !ctx.quiet() {
                println!("Updated tag {} ({})", tag.name, tag.id);
            }
        }
        TagSubcommand::Delete { id } => {
            let id = parse_id("tag", id)?;
            service.delete_tag(&owner, &id)?;
            if !ctx.quiet() {
                println!("Deleted tag {}", id);
            }
        }
        TagSubcommand::Set { note_id, tag_ids } => {
            let note_id = parse_id("note", note_id)?;
            let tag_ids = parse_ids("tag", tag_ids)?;
            let note = service.set_note_tags(&owner, &note_id, &tag_ids)?;
            if !ctx.quiet() {
                println!("Note {} now has {} tag(s)", note.id, note.tags.len());
            }
        }
    }
    Ok(())
}
