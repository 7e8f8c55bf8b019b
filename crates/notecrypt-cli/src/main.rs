//! notecrypt CLI - A CLI-first notebook with optional per-note password encryption
//!
//! This is the command-line interface for notecrypt. It provides a
//! user-friendly interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;

use clap::Parser;
use notecrypt_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{export, folders, init, maintenance, misc, notes, tags};
use crate::errors::{exit_code_for, hint_for};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        eprintln!("Error: {}", e);
        if let Some(hint) = hint_for(&e) {
            eprintln!("{}", hint);
        }
        std::process::exit(exit_code_for(&e));
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Add(args)) => {
            notes::handle_add(ctx, args)?;
        }
        Some(Commands::List(args)) => {
            notes::handle_list(ctx, args)?;
        }
        Some(Commands::Show(args)) => {
            notes::handle_show(ctx, args)?;
        }
        Some(Commands::Decrypt(args)) => {
            notes::handle_decrypt(ctx, args)?;
        }
        Some(Commands::Edit(args)) => {
            notes::handle_edit(ctx, args)?;
        }
        Some(Commands::Delete(args)) => {
            notes::handle_delete(ctx, args)?;
        }
        Some(Commands::Move(args)) => {
            notes::handle_move(ctx, args)?;
        }
        Some(Commands::Migrate(args)) => {
            notes::handle_migrate(ctx, args)?;
        }
        Some(Commands::Folder(args)) => {
            folders::handle_folder(ctx, &args.command)?;
        }
        Some(Commands::Tag(args)) => {
            tags::handle_tag(ctx, &args.command)?;
        }
        Some(Commands::Export(args)) => {
            export::handle_export(ctx, args)?;
        }
        Some(Commands::Check) => {
            maintenance::handle_check(ctx)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("notecrypt v{}", VERSION);
            println!("\nQuickstart:");
            println!("  notecrypt init --owner <ID>");
            println!("  notecrypt add --title \"Groceries\" --body \"milk\"");
            println!("  notecrypt add --title \"Diary\" --body \"...\" --encrypt");
            println!("  notecrypt list");
            println!("  notecrypt decrypt <id>");
            println!("\nRun `notecrypt --help` for full usage.");
        }
    }

    Ok(())
}
