//! Title, name, and color validation shared by the note service and the store.

use crate::error::{NoteError, Result};

/// Maximum bytes for a note title, folder name, or tag name.
pub const MAX_NAME_BYTES: usize = 256;

/// Maximum bytes for a note body (before sealing).
pub const MAX_CONTENT_BYTES: usize = 1024 * 1024;

/// Maximum tags attached to one note.
pub const MAX_TAGS_PER_NOTE: usize = 100;

/// Color given to tags created without one.
pub const DEFAULT_TAG_COLOR: &str = "#3b82f6";

/// Trim a required name-like field and enforce length limits.
///
/// `label` names the field in error messages ("Title", "Folder name").
pub fn normalize_name(label: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NoteError::InvalidInput(format!("{} is required", label)));
    }
    if trimmed.len() > MAX_NAME_BYTES {
        return Err(NoteError::InvalidInput(format!(
            "{} too long (max {} bytes)",
            label, MAX_NAME_BYTES
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a note body. Content is required but kept verbatim.
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(NoteError::InvalidInput("Content is required".to_string()));
    }
    if content.len() > MAX_CONTENT_BYTES {
        return Err(NoteError::InvalidInput(format!(
            "Content too large (max {} bytes)",
            MAX_CONTENT_BYTES
        )));
    }
    Ok(())
}

/// Trim an optional color; blank values become `None`.
pub fn normalize_color(color: Option<&str>) -> Option<String> {
    color
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Replace every character outside `[A-Za-z0-9]` with `_` for use in file names.
pub fn sanitize_file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_trims() {
        assert_eq!(normalize_name("Title", "  Groceries ").unwrap(), "Groceries");
    }

    #[test]
    fn test_normalize_name_rejects_blank() {
        let err = normalize_name("Folder name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Folder name is required");
    }

    #[test]
    fn test_normalize_name_rejects_long() {
        let long = "x".repeat(MAX_NAME_BYTES + 1);
        assert!(normalize_name("Title", &long).is_err());
    }

    #[test]
    fn test_validate_content() {
        assert!(validate_content("  body  ").is_ok());
        assert!(validate_content(" \n ").is_err());
        assert!(validate_content(&"x".repeat(MAX_CONTENT_BYTES + 1)).is_err());
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color(Some(" #fff ")), Some("#fff".to_string()));
        assert_eq!(normalize_color(Some("  ")), None);
        assert_eq!(normalize_color(None), None);
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("Q3 roadmap: draft!"), "Q3_roadmap__draft_");
        assert_eq!(sanitize_file_stem("café"), "caf_");
    }
}
