//! Core data types for the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::CipherText;
use crate::error::{NoteError, Result};

/// Identifier of the authenticated account that owns a record.
///
/// Every store operation is scoped by owner; a record owned by someone else
/// behaves exactly like a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(NoteError::InvalidInput(
                "Owner id cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OwnerId {
    type Error = NoteError;

    fn try_from(value: String) -> Result<Self> {
        OwnerId::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(owner: OwnerId) -> Self {
        owner.0
    }
}

/// Note body as persisted.
///
/// The `encrypted` column is derived from the variant, so a note can never be
/// flagged encrypted while holding plaintext, or the reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredContent {
    Plain(String),
    Sealed(CipherText),
}

impl StoredContent {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, StoredContent::Sealed(_))
    }

    /// The raw column value (plaintext or envelope).
    pub fn as_stored(&self) -> &str {
        match self {
            StoredContent::Plain(text) => text,
            StoredContent::Sealed(sealed) => sealed.as_str(),
        }
    }
}

/// A stored note.
///
/// Not `Serialize`: the outward shape is
/// [`NoteView`](crate::notes::NoteView), which never carries ciphertext.
#[derive(Debug, Clone)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub title: String,
    pub content: StoredContent,
    pub color: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn is_encrypted(&self) -> bool {
        self.content.is_encrypted()
    }
}

/// Builder for inserting a note.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: StoredContent,
    pub color: Option<String>,
    pub folder_id: Option<Uuid>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: StoredContent) -> Self {
        Self {
            title: title.into(),
            content,
            color: None,
            folder_id: None,
        }
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    pub fn with_folder(mut self, folder_id: Option<Uuid>) -> Self {
        self.folder_id = folder_id;
        self
    }
}

/// Replacement values for a note update. Title and content always travel
/// together; color is only touched when set.
#[derive(Debug, Clone)]
pub struct NoteChanges {
    pub title: String,
    pub content: StoredContent,
    pub color: Option<String>,
}

/// Which folders a note listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FolderScope {
    /// Every note regardless of folder
    #[default]
    Any,
    /// Only notes outside any folder
    Root,
    /// Only notes directly inside the given folder
    Folder(Uuid),
}

/// Filter for listing notes.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    pub folder: FolderScope,
    pub tag_id: Option<Uuid>,
    pub limit: Option<usize>,
}

impl NoteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self) -> Self {
        self.folder = FolderScope::Root;
        self
    }

    pub fn folder(mut self, id: Uuid) -> Self {
        self.folder = FolderScope::Folder(id);
        self
    }

    pub fn tag(mut self, id: Uuid) -> Self {
        self.tag_id = Some(id);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A folder grouping notes; folders nest through `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub color: Option<String>,
    pub note_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFolder {
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub color: Option<String>,
}

/// Partial folder update. `None` leaves a field unchanged; `Some(None)`
/// clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct FolderChanges {
    pub name: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
    pub color: Option<Option<String>>,
}

/// A label attached to notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct TagChanges {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_legacy_key, seal};

    #[test]
    fn test_owner_id_trims_and_rejects_blank() {
        assert_eq!(OwnerId::new("  user_42 ").unwrap().as_str(), "user_42");
        assert!(OwnerId::new("   ").is_err());
    }

    #[test]
    fn test_owner_id_deserialize_validates() {
        let ok: OwnerId = serde_json::from_str("\"user_42\"").unwrap();
        assert_eq!(ok.as_str(), "user_42");
        assert!(serde_json::from_str::<OwnerId>("\"\"").is_err());
    }

    #[test]
    fn test_stored_content_flag_follows_variant() {
        let plain = StoredContent::Plain("hello".to_string());
        assert!(!plain.is_encrypted());
        assert_eq!(plain.as_stored(), "hello");

        let key = derive_legacy_key("user_42", "salt").unwrap();
        let sealed = StoredContent::Sealed(seal(&key, "hello").unwrap());
        assert!(sealed.is_encrypted());
        assert_ne!(sealed.as_stored(), "hello");
    }

    #[test]
    fn test_note_filter_builder() {
        let folder = Uuid::new_v4();
        let tag = Uuid::new_v4();
        let filter = NoteFilter::new().folder(folder).tag(tag).limit(5);
        assert_eq!(filter.folder, FolderScope::Folder(folder));
        assert_eq!(filter.tag_id, Some(tag));
        assert_eq!(filter.limit, Some(5));
        assert_eq!(NoteFilter::new().root().folder, FolderScope::Root);
    }
}
