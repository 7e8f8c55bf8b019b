use std::path::PathBuf;

use notecrypt_core::notes::{write_export, DecryptNoteRequest, ExportFormat};

use crate::app::AppContext;
use crate::cli::ExportArgs;
use crate::helpers::{parse_id, prompt_password};

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let format: ExportFormat = args.format.parse()?;
    let (service, owner) = ctx.open_service()?;
    let id = parse_id("note", &args.id)?;

    let note = if args.decrypt {
        let password = prompt_password(ctx.interactive(args.no_input))?;
        service.decrypt_note(
            &owner,
            &id,
            DecryptNoteRequest {
                password: Some(password),
            },
        )?
    } else {
        service.get_note(&owner, &id)?
    };

    let destination = args
        .output
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let path = write_export(&note, format, &destination)?;

    if !ctx.quiet() {
        println!("Exported note {} to {}", note.id, path.display());
        if note.is_redacted() {
            eprintln!("Hint: The note is encrypted; pass --decrypt to export its content.");
        }
    }
    Ok(())
}
