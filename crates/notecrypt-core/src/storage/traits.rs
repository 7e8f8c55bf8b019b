//! Note store trait definition.
//!
//! The `NoteStore` trait defines the interface that record stores implement.
//! The note service depends only on this trait.

use uuid::Uuid;

use super::types::{
    Folder, FolderChanges, NewFolder, NewNote, NewTag, Note, NoteChanges, NoteFilter, OwnerId, Tag,
    TagChanges,
};
use crate::error::Result;

/// Owner-scoped persistence for notes, folders, and tags.
///
/// All implementations must ensure:
/// - Every lookup is filtered by owner; foreign records read as missing
/// - A note's content and `encrypted` flag are written in one statement
/// - Writes to a single record are serialized
/// - Referenced folders and tags belong to the same owner
pub trait NoteStore: Send + Sync {
    // --- Note operations ---

    /// Insert a new note.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::NotFound` if `folder_id` is set but not owned by `owner`.
    fn insert_note(&self, owner: &OwnerId, note: &NewNote) -> Result<Note>;

    /// Get a note by ID.
    ///
    /// Returns `Ok(None)` if the note does not exist or belongs to another owner.
    fn get_note(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<Note>>;

    /// List notes matching the filter, newest first.
    fn list_notes(&self, owner: &OwnerId, filter: &NoteFilter) -> Result<Vec<Note>>;

    /// Replace title and content (and color when given).
    ///
    /// Returns `Ok(None)` if the note is missing.
    fn update_note(&self, owner: &OwnerId, id: &Uuid, changes: &NoteChanges)
        -> Result<Option<Note>>;

    /// Delete a note. Returns `false` if it did not exist.
    fn delete_note(&self, owner: &OwnerId, id: &Uuid) -> Result<bool>;

    /// Move a note into a folder, or to the root with `None`.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::NotFound` if the target folder is not owned by `owner`.
    fn move_note(&self, owner: &OwnerId, id: &Uuid, folder_id: Option<Uuid>)
        -> Result<Option<Note>>;

    /// Replace the set of tags on a note.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::NotFound` if any tag is not owned by `owner`.
    fn set_note_tags(&self, owner: &OwnerId, id: &Uuid, tag_ids: &[Uuid])
        -> Result<Option<Note>>;

    // --- Folder operations ---

    fn insert_folder(&self, owner: &OwnerId, folder: &NewFolder) -> Result<Folder>;

    fn get_folder(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<Folder>>;

    /// List folders, newest first.
    fn list_folders(&self, owner: &OwnerId) -> Result<Vec<Folder>>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::InvalidInput` if the new parent would create a cycle.
    fn update_folder(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        changes: &FolderChanges,
    ) -> Result<Option<Folder>>;

    /// Delete a folder and its descendants; notes inside move to the root.
    fn delete_folder(&self, owner: &OwnerId, id: &Uuid) -> Result<bool>;

    // --- Tag operations ---

    /// # Errors
    ///
    /// Returns `NoteError::Conflict` if the owner already has a tag with this name.
    fn insert_tag(&self, owner: &OwnerId, tag: &NewTag) -> Result<Tag>;

    /// List tags by name, ascending.
    fn list_tags(&self, owner: &OwnerId) -> Result<Vec<Tag>>;

    fn update_tag(&self, owner: &OwnerId, id: &Uuid, changes: &TagChanges) -> Result<Option<Tag>>;

    fn delete_tag(&self, owner: &OwnerId, id: &Uuid) -> Result<bool>;

    // --- Maintenance operations ---

    /// Check store integrity.
    ///
    /// Verifies:
    /// - Every encrypted row holds a well-formed sealed envelope
    /// - No plaintext row holds something shaped like an envelope
    /// - SQLite's own consistency checks pass
    fn check_integrity(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_dyn(_store: &dyn NoteStore) {}
    }
}
