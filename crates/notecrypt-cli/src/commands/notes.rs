use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use notecrypt_core::crypto::KeyMode;
use notecrypt_core::notes::{CreateNoteRequest, DecryptNoteRequest, UpdateNoteRequest};
use notecrypt_core::storage::NoteFilter;

use crate::app::AppContext;
use crate::cli::{
    AddArgs, DecryptArgs, DeleteArgs, EditArgs, ListArgs, MigrateArgs, MoveArgs, ShowArgs,
};
use crate::constants::DEFAULT_LIST_LIMIT;
use crate::errors::CliError;
use crate::helpers::{
    parse_id, parse_optional_id, prompt_new_password, prompt_password, read_note_body,
};
use crate::output::{note_detail, notes_table, print_json};

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;
    let folder_id = parse_optional_id("folder", args.folder.as_deref())?;

    let body = read_note_body(args.no_input, args.body.clone(), ctx.editor()?, None)?;
    let mut request = CreateNoteRequest::new(&args.title, body);
    if args.encrypt {
        request.encrypted = true;
        request.password = Some(prompt_new_password(ctx.interactive(args.no_input))?);
    }
    request.color = args.color.clone();
    request.folder_id = folder_id;

    let note = service.create_note(&owner, request)?;
    if !ctx.quiet() {
        if note.encrypted {
            println!("Added encrypted note {}", note.id);
        } else {
            println!("Added note {}", note.id);
        }
    }
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;

    let mut filter = NoteFilter::new().limit(args.limit.unwrap_or(DEFAULT_LIST_LIMIT));
    if args.root {
        filter = filter.root();
    }
    if let Some(folder_id) = parse_optional_id("folder", args.folder.as_deref())? {
        filter = filter.folder(folder_id);
    }
    if let Some(tag_id) = parse_optional_id("tag", args.tag.as_deref())? {
        filter = filter.tag(tag_id);
    }

    let notes = service.list_notes(&owner, &filter)?;
    if args.json {
        return print_json(&notes);
    }
    if notes.is_empty() {
        if !ctx.quiet() {
            println!("No notes found.");
        }
        return Ok(());
    }
    println!("{}", notes_table(&notes));
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;
    let id = parse_id("note", &args.id)?;
    let note = service.get_note(&owner, &id)?;

    if args.json {
        return print_json(&note);
    }
    println!("{}", note_detail(&note));
    if note.is_redacted() && !ctx.quiet() {
        eprintln!("\nHint: Run `notecrypt decrypt {}` to reveal the content.", note.id);
    }
    Ok(())
}

pub fn handle_decrypt(ctx: &AppContext, args: &DecryptArgs) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;
    let id = parse_id("note", &args.id)?;

    let request = if args.legacy {
        DecryptNoteRequest::legacy()
    } else {
        DecryptNoteRequest {
            password: Some(prompt_password(ctx.interactive(args.no_input))?),
        }
    };
    let note = service.decrypt_note(&owner, &id, request)?;

    if args.json {
        return print_json(&note);
    }
    println!("{}", note_detail(&note));
    Ok(())
}

/// Edit title, body, color, or encryption state.
///
/// An encrypted note is unlocked first whenever its current body or current
/// password is needed, so a mistyped password never re-seals the note.
/// Legacy-sealed notes are refused until `migrate` re-seals them.
pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;
    let id = parse_id("note", &args.id)?;
    let interactive = ctx.interactive(args.no_input);
    let current = service.get_note(&owner, &id)?;
    if service.key_mode(&owner, &id)? == Some(KeyMode::Legacy) {
        return Err(CliError::invalid_input(format!(
            "Note {} is sealed in legacy mode. Run `notecrypt migrate {}` before editing it.",
            id, id
        ))
        .into());
    }

    let encrypt = if args.encrypt {
        true
    } else if args.decrypt {
        false
    } else {
        current.encrypted
    };

    let mut password: Option<SecretString> = None;
    let existing_body: Option<Zeroizing<String>> = if current.encrypted {
        let must_unlock = args.body.is_none() || (encrypt && !args.encrypt);
        if must_unlock {
            let unlock = prompt_password(interactive)?;
            let revealed = service.decrypt_note(
                &owner,
                &id,
                DecryptNoteRequest::new(unlock.expose_secret()),
            )?;
            password = Some(unlock);
            Some(Zeroizing::new(revealed.content))
        } else {
            None
        }
    } else {
        Some(Zeroizing::new(current.content.clone()))
    };

    let metadata_only =
        args.title.is_some() || args.color.is_some() || args.encrypt || args.decrypt;
    let body = match args.body.clone() {
        Some(body) => read_note_body(args.no_input, Some(body), None, None)?,
        None if metadata_only => existing_body
            .as_deref()
            .map(|body| body.to_string())
            .ok_or_else(|| CliError::invalid_input("Note body is unavailable"))?,
        None => {
            // Decrypted text is never written to an editor temp file.
            let initial = if current.encrypted {
                None
            } else {
                existing_body.as_deref().map(|body| body.as_str())
            };
            read_note_body(args.no_input, None, ctx.editor()?, initial)?
        }
    };

    let title = args.title.clone().unwrap_or_else(|| current.title.clone());
    let mut request = UpdateNoteRequest::new(title, body);
    request.color = args.color.clone();
    if encrypt {
        let seal_with = if args.encrypt {
            prompt_new_password(interactive)?
        } else {
            match password {
                Some(password) => password,
                None => prompt_password(interactive)?,
            }
        };
        request.encrypted = true;
        request.password = Some(seal_with);
    }

    let note = service.update_note(&owner, &id, request)?;
    if !ctx.quiet() {
        println!("Edited note {}", note.id);
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;
    let id = parse_id("note", &args.id)?;

    if !args.yes && ctx.interactive(false) {
        let note = service.get_note(&owner, &id)?;
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete note \"{}\"?", note.title))
            .default(false)
            .interact()?;
        if !proceed {
            return Err(anyhow::anyhow!("Delete cancelled"));
        }
    }

    service.delete_note(&owner, &id)?;
    if !ctx.quiet() {
        println!("Deleted note {}", id);
    }
    Ok(())
}

pub fn handle_move(ctx: &AppContext, args: &MoveArgs) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;
    let id = parse_id("note", &args.id)?;
    let folder_id = parse_optional_id("folder", args.folder.as_deref())?;

    let note = service.move_note(&owner, &id, folder_id)?;
    if !ctx.quiet() {
        match note.folder_id {
            Some(folder_id) => println!("Moved note {} to folder {}", note.id, folder_id),
            None => println!("Moved note {} to the root", note.id),
        }
    }
    Ok(())
}

pub fn handle_migrate(ctx: &AppContext, args: &MigrateArgs) -> anyhow::Result<()> {
    let (service, owner) = ctx.open_service()?;
    let id = parse_id("note", &args.id)?;
    if !service.cipher().config().legacy_enabled() {
        return Err(CliError::invalid_input(
            "Legacy mode is not configured. Set [cipher] legacy_salt or NOTECRYPT_LEGACY_SALT.",
        )
        .into());
    }

    let password = prompt_new_password(ctx.interactive(args.no_input))?;
    let note = service.migrate_legacy_note(&owner, &id, &password)?;
    if !ctx.quiet() {
        println!("Migrated note {} to password encryption", note.id);
    }
    Ok(())
}
