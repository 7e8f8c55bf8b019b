//! Input and parsing helper functions for the CLI.
//!
//! This module provides utilities for:
//! - Password prompting and note body reading (`input`)
//! - ID parsing (`parsing`)

mod input;
mod parsing;

// Re-export public API
pub use input::{prompt_new_password, prompt_password, read_note_body};
pub use parsing::{parse_id, parse_ids, parse_optional_id};
