//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying notes, folders,
//! and tags as tables, plain text, or JSON.

mod json;
mod table;

// Re-export public API
pub use json::print_json;
pub use table::{folders_table, note_detail, notes_table, tags_table};
