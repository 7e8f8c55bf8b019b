use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use notecrypt_core::VERSION;

/// notecrypt - A CLI-first notebook with optional per-note password encryption
#[derive(Parser)]
#[command(name = "notecrypt")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the note store
    #[arg(long, global = true, env = "NOTECRYPT_DB")]
    pub db: Option<String>,

    /// Account that owns the notes
    #[arg(long, global = true, env = "NOTECRYPT_OWNER")]
    pub owner: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the note store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Legacy salt for opening notes sealed without a password
    #[arg(long)]
    pub legacy_salt: Option<String>,

    /// Set default editor
    #[arg(long)]
    pub editor: Option<String>,

    /// Config path override
    #[arg(long)]
    pub config_path: Option<String>,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Note title
    #[arg(long)]
    pub title: String,

    /// Note body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Seal the body under a password
    #[arg(long)]
    pub encrypt: bool,

    /// Display color (e.g. "#f59e0b")
    #[arg(long)]
    pub color: Option<String>,

    /// Folder ID to place the note in
    #[arg(long, value_name = "FOLDER_ID")]
    pub folder: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Only notes directly inside this folder
    #[arg(long, value_name = "FOLDER_ID", conflicts_with = "root")]
    pub folder: Option<String>,

    /// Only notes outside any folder
    #[arg(long)]
    pub root: bool,

    /// Only notes carrying this tag
    #[arg(long, value_name = "TAG_ID")]
    pub tag: Option<String>,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Note ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `decrypt` command
#[derive(Args)]
pub struct DecryptArgs {
    /// Note ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Open a legacy-mode note (sealed without a password)
    #[arg(long)]
    pub legacy: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Note ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Seal the note under a (new) password
    #[arg(long, conflicts_with = "decrypt")]
    pub encrypt: bool,

    /// Store the note as plaintext from now on
    #[arg(long)]
    pub decrypt: bool,

    /// Display color
    #[arg(long)]
    pub color: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Note ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `move` command
#[derive(Args)]
pub struct MoveArgs {
    /// Note ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Target folder ID (omit to move to the root)
    #[arg(long, value_name = "FOLDER_ID")]
    pub folder: Option<String>,
}

/// Arguments for the `migrate` command
#[derive(Args)]
pub struct MigrateArgs {
    /// Note ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Note ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output format (text, markdown, json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Output file or directory (defaults to the current directory)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Decrypt the note before exporting
    #[arg(long)]
    pub decrypt: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

/// Arguments for the `folder` command group
#[derive(Args)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderSubcommand,
}

#[derive(Subcommand)]
pub enum FolderSubcommand {
    /// Create a folder
    Add {
        /// Folder name
        #[arg(value_name = "NAME")]
        name: String,

        /// Parent folder ID
        #[arg(long, value_name = "FOLDER_ID")]
        parent: Option<String>,

        /// Display color
        #[arg(long)]
        color: Option<String>,
    },

    /// List folders
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename a folder
    Rename {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Move a folder under another one, or to the top level
    Move {
        #[arg(value_name = "ID")]
        id: String,

        /// New parent folder ID (omit for top level)
        #[arg(long, value_name = "FOLDER_ID")]
        parent: Option<String>,
    },

    /// Delete a folder and its subfolders (notes move to the root)
    Delete {
        #[arg(value_name = "ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the `tag` command group
#[derive(Args)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagSubcommand,
}

#[derive(Subcommand)]
pub enum TagSubcommand {
    /// Create a tag
    Add {
        #[arg(value_name = "NAME")]
        name: String,

        /// Display color (defaults to #3b82f6)
        #[arg(long)]
        color: Option<String>,
    },

    /// List tags
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename or recolor a tag
    Rename {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a tag (notes keep their other tags)
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Replace the tags on a note
    Set {
        /// Note ID
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        /// Tag IDs (none clears all tags)
        #[arg(value_name = "TAG_ID")]
        tag_ids: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new note store and write the config
    Init(InitArgs),

    /// Add a new note
    Add(AddArgs),

    /// List notes (encrypted bodies stay hidden)
    List(ListArgs),

    /// Show a note by ID
    Show(ShowArgs),

    /// Reveal an encrypted note's body
    Decrypt(DecryptArgs),

    /// Edit a note's title, body, color, or encryption
    Edit(EditArgs),

    /// Delete a note
    Delete(DeleteArgs),

    /// Move a note into a folder or back to the root
    Move(MoveArgs),

    /// Re-seal a legacy-mode note under a password
    Migrate(MigrateArgs),

    /// Manage folders
    Folder(FolderArgs),

    /// Manage tags
    Tag(TagArgs),

    /// Export a note to a file
    Export(ExportArgs),

    /// Check store integrity
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_folder_conflicts_with_root() {
        let result = Cli::try_parse_from(["notecrypt", "list", "--root", "--folder", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["notecrypt", "-vv", "check"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
