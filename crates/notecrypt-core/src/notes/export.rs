//! Single-note export.
//!
//! Exports render a [`NoteView`], so an encrypted note exports the
//! placeholder unless the caller decrypted it first.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use super::NoteView;
use crate::error::{NoteError, Result};
use crate::fs::write_atomic;
use crate::storage::validation::sanitize_file_stem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }

    /// Render `note` as a complete document in this format.
    pub fn render(&self, note: &NoteView) -> Result<String> {
        let created = note.created_at.to_rfc3339();
        let updated = note.updated_at.to_rfc3339();
        match self {
            ExportFormat::Text => Ok(format!(
                "{}\n\n{}\n\nCreated: {}\nUpdated: {}\n",
                note.title, note.content, created, updated
            )),
            ExportFormat::Markdown => Ok(format!(
                "# {}\n\n{}\n\n---\n\n*Created: {}*  \n*Updated: {}*\n",
                note.title, note.content, created, updated
            )),
            ExportFormat::Json => {
                let document = ExportDocument {
                    title: &note.title,
                    content: &note.content,
                    encrypted: note.encrypted,
                    created_at: &created,
                    updated_at: &updated,
                };
                let mut rendered = serde_json::to_string_pretty(&document)?;
                rendered.push('\n');
                Ok(rendered)
            }
        }
    }

    /// File name for `note`: the title with every non-alphanumeric
    /// character replaced by `_`.
    pub fn file_name(&self, note: &NoteView) -> String {
        format!("{}.{}", sanitize_file_stem(&note.title), self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = NoteError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            other => Err(NoteError::InvalidInput(format!(
                "Unknown export format '{}'. Expected text, markdown, or json",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Text => "text",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Json => "json",
        };
        f.write_str(name)
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    title: &'a str,
    content: &'a str,
    encrypted: bool,
    created_at: &'a str,
    updated_at: &'a str,
}

/// Write `note` to `destination`.
///
/// If `destination` is a directory the file is named by
/// [`ExportFormat::file_name`]. Returns the path written.
pub fn write_export(note: &NoteView, format: ExportFormat, destination: &Path) -> Result<PathBuf> {
    let path = if destination.is_dir() {
        destination.join(format.file_name(note))
    } else {
        destination.to_path_buf()
    };
    let rendered = format.render(note)?;
    write_atomic(&path, rendered.as_bytes())?;
    info!(note_id = %note.id, format = %format, redacted = note.is_redacted(), "exported note");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::ENCRYPTED_PLACEHOLDER;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;
    use uuid::Uuid;

    fn view(title: &str, content: &str, encrypted: bool) -> NoteView {
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap();
        NoteView {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            encrypted,
            color: None,
            folder_id: None,
            tags: Vec::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("MD".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(NoteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_file_name_sanitizes_title() {
        let note = view("Q3 roadmap: draft #2", "body", false);
        assert_eq!(
            ExportFormat::Markdown.file_name(&note),
            "Q3_roadmap__draft__2.md"
        );
    }

    #[test]
    fn test_text_layout() {
        let note = view("Groceries", "milk\neggs", false);
        let rendered = ExportFormat::Text.render(&note).unwrap();
        assert!(rendered.starts_with("Groceries\n\nmilk\neggs\n\nCreated: 2024-07-01T09:30:00+00:00"));
        assert!(rendered.contains("\nUpdated: "));
    }

    #[test]
    fn test_json_is_parseable() {
        let note = view("Groceries", "milk", false);
        let rendered = ExportFormat::Json.render(&note).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["title"], "Groceries");
        assert_eq!(value["content"], "milk");
        assert_eq!(value["encrypted"], false);
    }

    #[test]
    fn test_write_export_into_directory() {
        let dir = tempdir().unwrap();
        let note = view("Secret plans", ENCRYPTED_PLACEHOLDER, true);

        let path = write_export(&note, ExportFormat::Text, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Secret_plans.txt"));

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains(ENCRYPTED_PLACEHOLDER));
    }
}
