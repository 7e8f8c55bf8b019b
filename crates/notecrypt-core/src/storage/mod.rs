//! Storage abstraction for notecrypt.
//!
//! This module defines the `NoteStore` trait and the record types that flow
//! through it, plus the SQLite implementation.
//!
//! ## Security
//!
//! The store never sees passwords or keys. Note bodies arrive already sealed
//! (or plain) as [`StoredContent`], and the `encrypted` column is
//! derived from that value when the row is written. Reading an encrypted row
//! back requires a well-formed envelope; anything else is an integrity error.

pub mod sqlite;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export public types
pub use sqlite::SqliteStore;
pub use traits::NoteStore;
pub use types::{
    Folder, FolderChanges, FolderScope, NewFolder, NewNote, NewTag, Note, NoteChanges, NoteFilter,
    OwnerId, StoredContent, Tag, TagChanges,
};
