//! SQLite note store.
//!
//! Notes, folders, and tags live in a single SQLite database file. Sealed
//! note bodies are stored as envelope text alongside an `encrypted` flag; both
//! columns are always written by the same statement.

mod row;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use tracing::{debug, info};
use uuid::Uuid;

use crate::crypto::CipherText;
use crate::error::{NoteError, Result};
use crate::storage::traits::NoteStore;
use crate::storage::types::{
    Folder, FolderChanges, FolderScope, NewFolder, NewNote, NewTag, Note, NoteChanges, NoteFilter,
    OwnerId, Tag, TagChanges,
};
use crate::storage::validation::MAX_TAGS_PER_NOTE;

use row::{FolderRow, NoteRow, TagRow, FOLDER_COLUMNS, NOTE_COLUMNS, TAG_COLUMNS};

/// Schema version recorded in the `meta` table.
pub const SCHEMA_VERSION: &str = "1";

const SCHEMA: &str = r#"
CREATE TABLE meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE folders (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    parent_id TEXT,
    color TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    FOREIGN KEY (parent_id) REFERENCES folders(id) ON DELETE CASCADE
);

CREATE TABLE notes (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    encrypted INTEGER NOT NULL DEFAULT 0 CHECK (encrypted IN (0, 1)),
    color TEXT,
    folder_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    FOREIGN KEY (folder_id) REFERENCES folders(id) ON DELETE SET NULL
);

CREATE TABLE tags (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    created_at TEXT NOT NULL,

    UNIQUE (owner_id, name)
);

-- Note-Tag join table (many-to-many)
CREATE TABLE note_tags (
    note_id TEXT NOT NULL,
    tag_id TEXT NOT NULL,

    PRIMARY KEY (note_id, tag_id),
    FOREIGN KEY (note_id) REFERENCES notes(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
);

CREATE INDEX notes_owner_created ON notes (owner_id, created_at);
CREATE INDEX folders_owner ON folders (owner_id);
"#;

/// SQLite-backed [`NoteStore`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new store file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::Storage` if the file already exists.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(NoteError::Storage("Store file already exists".to_string()));
        }
        let conn = Connection::open(path)?;
        let store = Self::initialize(conn)?;
        info!(path = %path.display(), "created note store");
        Ok(store)
    }

    /// Open an existing store file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(NoteError::NotFound(format!(
                "No note store at {}",
                path.display()
            )));
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let version: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match version.as_deref() {
            Some(SCHEMA_VERSION) => {}
            Some(other) => {
                return Err(NoteError::Storage(format!(
                    "Unsupported schema version: {}",
                    other
                )))
            }
            None => return Err(NoteError::Storage("Missing schema version".to_string())),
        }

        debug!(path = %path.display(), "opened note store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// A fresh store held entirely in memory.
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        let created_at = timestamp();
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["schema_version", SCHEMA_VERSION],
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            params!["created_at", created_at],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| NoteError::Storage("SQLite connection poisoned".to_string()))
    }
}

/// Fixed-width RFC 3339 so lexical order matches chronological order.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn fetch_note(conn: &Connection, owner: &OwnerId, id: &Uuid) -> Result<Option<Note>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {} FROM notes n WHERE n.id = ? AND n.owner_id = ?",
                NOTE_COLUMNS
            ),
            params![id.to_string(), owner.as_str()],
            NoteRow::from_row,
        )
        .optional()?;

    match row {
        Some(row) => {
            let mut note: Note = row.try_into()?;
            note.tags = fetch_note_tags(conn, &note.id)?;
            Ok(Some(note))
        }
        None => Ok(None),
    }
}

fn fetch_note_tags(conn: &Connection, note_id: &Uuid) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM tags t JOIN note_tags nt ON nt.tag_id = t.id WHERE nt.note_id = ? ORDER BY t.name",
        TAG_COLUMNS
    ))?;
    let rows = stmt.query_map([note_id.to_string()], TagRow::from_row)?;
    let mut tags = Vec::new();
    for row in rows {
        tags.push(row?.try_into()?);
    }
    Ok(tags)
}

fn fetch_folder(conn: &Connection, owner: &OwnerId, id: &Uuid) -> Result<Option<Folder>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {} FROM folders f WHERE f.id = ? AND f.owner_id = ?",
                FOLDER_COLUMNS
            ),
            params![id.to_string(), owner.as_str()],
            FolderRow::from_row,
        )
        .optional()?;
    row.map(Folder::try_from).transpose()
}

fn ensure_folder_owned(conn: &Connection, owner: &OwnerId, folder_id: &Uuid) -> Result<()> {
    let exists: Option<String> = conn
        .query_row(
            "SELECT id FROM folders WHERE id = ? AND owner_id = ?",
            params![folder_id.to_string(), owner.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(NoteError::NotFound("Folder not found".to_string()));
    }
    Ok(())
}

fn folder_parent(conn: &Connection, owner: &OwnerId, id: &Uuid) -> Result<Option<Uuid>> {
    let parent: Option<Option<String>> = conn
        .query_row(
            "SELECT parent_id FROM folders WHERE id = ? AND owner_id = ?",
            params![id.to_string(), owner.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    parent
        .flatten()
        .map(|value| {
            Uuid::parse_str(&value)
                .map_err(|e| NoteError::Storage(format!("Invalid parent folder UUID: {}", e)))
        })
        .transpose()
}

/// Reject `parent_id` if it is `folder_id` itself or one of its descendants.
fn ensure_no_cycle(
    conn: &Connection,
    owner: &OwnerId,
    folder_id: &Uuid,
    parent_id: &Uuid,
) -> Result<()> {
    if parent_id == folder_id {
        return Err(NoteError::InvalidInput(
            "Cannot set folder as its own parent".to_string(),
        ));
    }
    let mut cursor = folder_parent(conn, owner, parent_id)?;
    while let Some(ancestor) = cursor {
        if &ancestor == folder_id {
            return Err(NoteError::InvalidInput(
                "Cannot move a folder inside its own subfolder".to_string(),
            ));
        }
        cursor = folder_parent(conn, owner, &ancestor)?;
    }
    Ok(())
}

fn tag_name_taken(
    conn: &Connection,
    owner: &OwnerId,
    name: &str,
    except: Option<&Uuid>,
) -> Result<bool> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM tags WHERE owner_id = ? AND name = ?",
            params![owner.as_str(), name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(match (existing, except) {
        (Some(id), Some(except)) => id != except.to_string(),
        (Some(_), None) => true,
        (None, _) => false,
    })
}

impl NoteStore for SqliteStore {
    fn insert_note(&self, owner: &OwnerId, note: &NewNote) -> Result<Note> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        if let Some(folder_id) = note.folder_id.as_ref() {
            ensure_folder_owned(&tx, owner, folder_id)?;
        }

        let id = Uuid::new_v4();
        let now = timestamp();
        tx.execute(
            r#"
            INSERT INTO notes (
                id,
                owner_id,
                title,
                content,
                encrypted,
                color,
                folder_id,
                created_at,
                updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                id.to_string(),
                owner.as_str(),
                note.title,
                note.content.as_stored(),
                note.content.is_encrypted(),
                note.color,
                note.folder_id.map(|id| id.to_string()),
                now,
                now,
            ],
        )?;

        let created = fetch_note(&tx, owner, &id)?
            .ok_or_else(|| NoteError::Storage("Inserted note vanished".to_string()))?;
        tx.commit()?;

        debug!(note_id = %id, encrypted = created.is_encrypted(), "inserted note");
        Ok(created)
    }

    fn get_note(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<Note>> {
        let conn = self.lock_conn()?;
        fetch_note(&conn, owner, id)
    }

    fn list_notes(&self, owner: &OwnerId, filter: &NoteFilter) -> Result<Vec<Note>> {
        let conn = self.lock_conn()?;

        let mut conditions: Vec<String> = vec!["n.owner_id = ?".to_string()];
        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(owner.as_str().to_string())];

        match filter.folder {
            FolderScope::Any => {}
            FolderScope::Root => conditions.push("n.folder_id IS NULL".to_string()),
            FolderScope::Folder(folder_id) => {
                conditions.push("n.folder_id = ?".to_string());
                values.push(Box::new(folder_id.to_string()));
            }
        }

        if let Some(tag_id) = filter.tag_id {
            conditions.push(
                "EXISTS (SELECT 1 FROM note_tags nt WHERE nt.note_id = n.id AND nt.tag_id = ?)"
                    .to_string(),
            );
            values.push(Box::new(tag_id.to_string()));
        }

        let mut sql = format!(
            "SELECT {} FROM notes n WHERE {} ORDER BY n.created_at DESC, n.rowid DESC",
            NOTE_COLUMNS,
            conditions.join(" AND ")
        );
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            let limit = i64::try_from(limit)
                .map_err(|_| NoteError::InvalidInput("Limit too large".to_string()))?;
            values.push(Box::new(limit));
        }

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn ToSql> = values.iter().map(|value| value.as_ref()).collect();
        let rows = stmt.query_map(params.as_slice(), NoteRow::from_row)?;

        let mut notes = Vec::new();
        for row in rows {
            let mut note: Note = row?.try_into()?;
            note.tags = fetch_note_tags(&conn, &note.id)?;
            notes.push(note);
        }
        Ok(notes)
    }

    fn update_note(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        changes: &NoteChanges,
    ) -> Result<Option<Note>> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let updated = tx.execute(
            r#"
            UPDATE notes
            SET title = ?,
                content = ?,
                encrypted = ?,
                color = COALESCE(?, color),
                updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
            params![
                changes.title,
                changes.content.as_stored(),
                changes.content.is_encrypted(),
                changes.color,
                timestamp(),
                id.to_string(),
                owner.as_str(),
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }

        let note = fetch_note(&tx, owner, id)?;
        tx.commit()?;
        debug!(note_id = %id, encrypted = changes.content.is_encrypted(), "updated note");
        Ok(note)
    }

    fn delete_note(&self, owner: &OwnerId, id: &Uuid) -> Result<bool> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute(
            "DELETE FROM notes WHERE id = ? AND owner_id = ?",
            params![id.to_string(), owner.as_str()],
        )?;
        Ok(deleted > 0)
    }

    fn move_note(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        folder_id: Option<Uuid>,
    ) -> Result<Option<Note>> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        if fetch_note(&tx, owner, id)?.is_none() {
            return Ok(None);
        }
        if let Some(folder_id) = folder_id.as_ref() {
            ensure_folder_owned(&tx, owner, folder_id)?;
        }

        tx.execute(
            "UPDATE notes SET folder_id = ?, updated_at = ? WHERE id = ? AND owner_id = ?",
            params![
                folder_id.map(|id| id.to_string()),
                timestamp(),
                id.to_string(),
                owner.as_str(),
            ],
        )?;

        let note = fetch_note(&tx, owner, id)?;
        tx.commit()?;
        Ok(note)
    }

    fn set_note_tags(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        tag_ids: &[Uuid],
    ) -> Result<Option<Note>> {
        if tag_ids.len() > MAX_TAGS_PER_NOTE {
            return Err(NoteError::InvalidInput(format!(
                "Too many tags (max {})",
                MAX_TAGS_PER_NOTE
            )));
        }

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        if fetch_note(&tx, owner, id)?.is_none() {
            return Ok(None);
        }

        let mut unique: Vec<Uuid> = tag_ids.to_vec();
        unique.sort();
        unique.dedup();
        for tag_id in &unique {
            let owned: Option<String> = tx
                .query_row(
                    "SELECT id FROM tags WHERE id = ? AND owner_id = ?",
                    params![tag_id.to_string(), owner.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            if owned.is_none() {
                return Err(NoteError::NotFound(
                    "One or more tags not found".to_string(),
                ));
            }
        }

        tx.execute("DELETE FROM note_tags WHERE note_id = ?", [id.to_string()])?;
        for tag_id in &unique {
            tx.execute(
                "INSERT INTO note_tags (note_id, tag_id) VALUES (?, ?)",
                params![id.to_string(), tag_id.to_string()],
            )?;
        }

        let note = fetch_note(&tx, owner, id)?;
        tx.commit()?;
        Ok(note)
    }

    fn insert_folder(&self, owner: &OwnerId, folder: &NewFolder) -> Result<Folder> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        if let Some(parent_id) = folder.parent_id.as_ref() {
            ensure_folder_owned(&tx, owner, parent_id)
                .map_err(|_| NoteError::NotFound("Parent folder not found".to_string()))?;
        }

        let id = Uuid::new_v4();
        let now = timestamp();
        tx.execute(
            r#"
            INSERT INTO folders (id, owner_id, name, parent_id, color, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                id.to_string(),
                owner.as_str(),
                folder.name,
                folder.parent_id.map(|id| id.to_string()),
                folder.color,
                now,
                now,
            ],
        )?;

        let created = fetch_folder(&tx, owner, &id)?
            .ok_or_else(|| NoteError::Storage("Inserted folder vanished".to_string()))?;
        tx.commit()?;
        Ok(created)
    }

    fn get_folder(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<Folder>> {
        let conn = self.lock_conn()?;
        fetch_folder(&conn, owner, id)
    }

    fn list_folders(&self, owner: &OwnerId) -> Result<Vec<Folder>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM folders f WHERE f.owner_id = ? ORDER BY f.created_at DESC, f.rowid DESC",
            FOLDER_COLUMNS
        ))?;
        let rows = stmt.query_map([owner.as_str()], FolderRow::from_row)?;
        let mut folders = Vec::new();
        for row in rows {
            folders.push(row?.try_into()?);
        }
        Ok(folders)
    }

    fn update_folder(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        changes: &FolderChanges,
    ) -> Result<Option<Folder>> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let Some(current) = fetch_folder(&tx, owner, id)? else {
            return Ok(None);
        };

        if let Some(Some(parent_id)) = changes.parent_id.as_ref() {
            ensure_folder_owned(&tx, owner, parent_id)
                .map_err(|_| NoteError::NotFound("Parent folder not found".to_string()))?;
            ensure_no_cycle(&tx, owner, id, parent_id)?;
        }

        let name = changes.name.clone().unwrap_or(current.name);
        let parent_id = changes.parent_id.unwrap_or(current.parent_id);
        let color = changes.color.clone().unwrap_or(current.color);

        tx.execute(
            r#"
            UPDATE folders
            SET name = ?, parent_id = ?, color = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
            params![
                name,
                parent_id.map(|id| id.to_string()),
                color,
                timestamp(),
                id.to_string(),
                owner.as_str(),
            ],
        )?;

        let folder = fetch_folder(&tx, owner, id)?;
        tx.commit()?;
        Ok(folder)
    }

    fn delete_folder(&self, owner: &OwnerId, id: &Uuid) -> Result<bool> {
        let conn = self.lock_conn()?;
        // Child folders cascade; notes inside fall back to the root.
        let deleted = conn.execute(
            "DELETE FROM folders WHERE id = ? AND owner_id = ?",
            params![id.to_string(), owner.as_str()],
        )?;
        Ok(deleted > 0)
    }

    fn insert_tag(&self, owner: &OwnerId, tag: &NewTag) -> Result<Tag> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        if tag_name_taken(&tx, owner, &tag.name, None)? {
            return Err(NoteError::Conflict(
                "Tag with this name already exists".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        let created_at = timestamp();
        tx.execute(
            "INSERT INTO tags (id, owner_id, name, color, created_at) VALUES (?, ?, ?, ?, ?)",
            params![id.to_string(), owner.as_str(), tag.name, tag.color, created_at],
        )?;
        tx.commit()?;

        Ok(Tag {
            id,
            name: tag.name.clone(),
            color: tag.color.clone(),
            created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| NoteError::Storage(format!("Invalid timestamp: {}", e)))?
                .with_timezone(&Utc),
        })
    }

    fn list_tags(&self, owner: &OwnerId) -> Result<Vec<Tag>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tags t WHERE t.owner_id = ? ORDER BY t.name ASC",
            TAG_COLUMNS
        ))?;
        let rows = stmt.query_map([owner.as_str()], TagRow::from_row)?;
        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?.try_into()?);
        }
        Ok(tags)
    }

    fn update_tag(&self, owner: &OwnerId, id: &Uuid, changes: &TagChanges) -> Result<Option<Tag>> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let current = tx
            .query_row(
                &format!(
                    "SELECT {} FROM tags t WHERE t.id = ? AND t.owner_id = ?",
                    TAG_COLUMNS
                ),
                params![id.to_string(), owner.as_str()],
                TagRow::from_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };

        let name = changes.name.clone().unwrap_or(current.name);
        let color = changes.color.clone().unwrap_or(current.color);
        if tag_name_taken(&tx, owner, &name, Some(id))? {
            return Err(NoteError::Conflict(
                "Tag with this name already exists".to_string(),
            ));
        }

        tx.execute(
            "UPDATE tags SET name = ?, color = ? WHERE id = ? AND owner_id = ?",
            params![name, color, id.to_string(), owner.as_str()],
        )?;
        tx.commit()?;

        Ok(Some(
            TagRow {
                id: current.id,
                name,
                color,
                created_at: current.created_at,
            }
            .try_into()?,
        ))
    }

    fn delete_tag(&self, owner: &OwnerId, id: &Uuid) -> Result<bool> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute(
            "DELETE FROM tags WHERE id = ? AND owner_id = ?",
            params![id.to_string(), owner.as_str()],
        )?;
        Ok(deleted > 0)
    }

    fn check_integrity(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        let status: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if status != "ok" {
            return Err(NoteError::Integrity(format!("SQLite reported: {}", status)));
        }

        let dangling: Option<String> = conn
            .query_row("PRAGMA foreign_key_check", [], |row| row.get(0))
            .optional()?;
        if let Some(table) = dangling {
            return Err(NoteError::Integrity(format!(
                "Dangling reference in table {}",
                table
            )));
        }

        let mut stmt = conn.prepare("SELECT id, content, encrypted FROM notes")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let content: String = row.get(1)?;
            let encrypted: bool = row.get(2)?;
            let sealed = CipherText::is_envelope(&content);
            if encrypted && !sealed {
                return Err(NoteError::Integrity(format!(
                    "note {} is flagged encrypted but holds unsealed content",
                    id
                )));
            }
            if !encrypted && sealed {
                return Err(NoteError::Integrity(format!(
                    "note {} holds sealed content without the encrypted flag",
                    id
                )));
            }
        }

        Ok(())
    }
}
