//! Row types for database queries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::crypto::CipherText;
use crate::error::{NoteError, Result};
use crate::storage::types::{Folder, Note, OwnerId, StoredContent, Tag};

pub(super) const NOTE_COLUMNS: &str =
    "n.id, n.owner_id, n.title, n.content, n.encrypted, n.color, n.folder_id, n.created_at, n.updated_at";

pub(super) const FOLDER_COLUMNS: &str = "f.id, f.name, f.parent_id, f.color, \
     (SELECT COUNT(*) FROM notes n WHERE n.folder_id = f.id), f.created_at, f.updated_at";

pub(super) const TAG_COLUMNS: &str = "t.id, t.name, t.color, t.created_at";

/// Raw row data from the notes table, before parsing into domain types.
#[derive(Debug)]
pub(super) struct NoteRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub encrypted: bool,
    pub color: Option<String>,
    pub folder_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl NoteRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            encrypted: row.get(4)?,
            color: row.get(5)?,
            folder_id: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl TryFrom<NoteRow> for Note {
    type Error = NoteError;

    fn try_from(row: NoteRow) -> Result<Self> {
        let id = parse_uuid("note", &row.id)?;
        let owner_id = OwnerId::new(row.owner_id)
            .map_err(|e| NoteError::Storage(format!("Invalid owner id: {}", e)))?;
        let content = if row.encrypted {
            let sealed = CipherText::parse(row.content).map_err(|_| {
                NoteError::Integrity(format!("note {} is flagged encrypted but not sealed", id))
            })?;
            StoredContent::Sealed(sealed)
        } else {
            StoredContent::Plain(row.content)
        };
        let folder_id = row
            .folder_id
            .as_deref()
            .map(|value| parse_uuid("folder", value))
            .transpose()?;

        Ok(Note {
            id,
            owner_id,
            title: row.title,
            content,
            color: row.color,
            folder_id,
            tags: Vec::new(),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Raw row data from the folders table.
#[derive(Debug)]
pub(super) struct FolderRow {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub color: Option<String>,
    pub note_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl FolderRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            parent_id: row.get(2)?,
            color: row.get(3)?,
            note_count: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl TryFrom<FolderRow> for Folder {
    type Error = NoteError;

    fn try_from(row: FolderRow) -> Result<Self> {
        Ok(Folder {
            id: parse_uuid("folder", &row.id)?,
            name: row.name,
            parent_id: row
                .parent_id
                .as_deref()
                .map(|value| parse_uuid("parent folder", value))
                .transpose()?,
            color: row.color,
            note_count: u64::try_from(row.note_count)
                .map_err(|_| NoteError::Storage("Negative note count".to_string()))?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Raw row data from the tags table.
#[derive(Debug)]
pub(super) struct TagRow {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: String,
}

impl TagRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            color: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl TryFrom<TagRow> for Tag {
    type Error = NoteError;

    fn try_from(row: TagRow) -> Result<Self> {
        Ok(Tag {
            id: parse_uuid("tag", &row.id)?,
            name: row.name,
            color: row.color,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

fn parse_uuid(kind: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| NoteError::Storage(format!("Invalid {} UUID: {}", kind, e)))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| NoteError::Storage(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}
