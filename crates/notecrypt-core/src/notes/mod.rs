//! Note service: validation, sealing, and redaction on top of a [`NoteStore`].
//!
//! Every operation is scoped to the calling owner. Encrypted bodies are
//! replaced by [`ENCRYPTED_PLACEHOLDER`] on every read path; the only way to
//! see one is [`NoteService::decrypt_note`], which takes the password for one
//! record and never writes anything back.
//!
//! New content is only ever sealed in password mode. Legacy-mode envelopes can
//! still be opened (when a legacy salt is configured) and upgraded through
//! [`NoteService::migrate_legacy_note`].

pub mod export;
pub mod requests;

pub use export::{write_export, ExportFormat};
pub use requests::{
    CreateNoteRequest, DecryptNoteRequest, NoteView, UpdateNoteRequest, ENCRYPTED_PLACEHOLDER,
};

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::{validate_password, CipherText, ContentCipher, KeyMode};
use crate::error::{NoteError, Result};
use crate::storage::validation::{
    normalize_color, normalize_name, validate_content, DEFAULT_TAG_COLOR,
};
use crate::storage::{
    Folder, FolderChanges, NewFolder, NewNote, NewTag, Note, NoteChanges, NoteFilter, NoteStore,
    OwnerId, StoredContent, Tag, TagChanges,
};

fn note_not_found() -> NoteError {
    NoteError::NotFound("Note not found".to_string())
}

fn folder_not_found() -> NoteError {
    NoteError::NotFound("Folder not found".to_string())
}

fn tag_not_found() -> NoteError {
    NoteError::NotFound("Tag not found".to_string())
}

/// Owner-scoped note operations.
pub struct NoteService<S: NoteStore> {
    store: S,
    cipher: ContentCipher,
}

impl<S: NoteStore> NoteService<S> {
    pub fn new(store: S, cipher: ContentCipher) -> Self {
        Self { store, cipher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cipher(&self) -> &ContentCipher {
        &self.cipher
    }

    // --- Notes ---

    /// Create a note, sealing the body when `encrypted` is set.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank title or body, a missing or short
    ///   password when encrypting, or plain content shaped like an envelope
    /// - `NotFound` if `folder_id` is not one of the owner's folders
    pub fn create_note(&self, owner: &OwnerId, request: CreateNoteRequest) -> Result<NoteView> {
        let title = normalize_name("Title", &request.title)?;
        validate_content(&request.content)?;
        let content = self.prepare_content(
            owner,
            request.content,
            request.encrypted,
            request.password.as_ref(),
        )?;

        let new_note = NewNote::new(title, content)
            .with_color(normalize_color(request.color.as_deref()))
            .with_folder(request.folder_id);
        let note = self.store.insert_note(owner, &new_note)?;

        info!(owner_id = %owner, note_id = %note.id, encrypted = note.is_encrypted(), "created note");
        Ok(NoteView::redacted(note))
    }

    pub fn get_note(&self, owner: &OwnerId, id: &Uuid) -> Result<NoteView> {
        self.store
            .get_note(owner, id)?
            .map(NoteView::redacted)
            .ok_or_else(note_not_found)
    }

    /// List notes newest first. Encrypted bodies are always redacted.
    pub fn list_notes(&self, owner: &OwnerId, filter: &NoteFilter) -> Result<Vec<NoteView>> {
        Ok(self
            .store
            .list_notes(owner, filter)?
            .into_iter()
            .map(NoteView::redacted)
            .collect())
    }

    /// Replace a note's title and body.
    ///
    /// With `encrypted = true` the body is re-sealed under the supplied
    /// password. With `encrypted = false` the supplied body is stored as is.
    pub fn update_note(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        request: UpdateNoteRequest,
    ) -> Result<NoteView> {
        let title = normalize_name("Title", &request.title)?;
        validate_content(&request.content)?;
        let content = self.prepare_content(
            owner,
            request.content,
            request.encrypted,
            request.password.as_ref(),
        )?;

        let changes = NoteChanges {
            title,
            content,
            color: normalize_color(request.color.as_deref()),
        };
        let note = self
            .store
            .update_note(owner, id, &changes)?
            .ok_or_else(note_not_found)?;

        info!(owner_id = %owner, note_id = %id, encrypted = note.is_encrypted(), "updated note");
        Ok(NoteView::redacted(note))
    }

    /// Reveal one note's body. Nothing is written.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the note is missing or owned by someone else
    /// - `InvalidInput` if the note is not encrypted, a password-sealed note
    ///   is requested without a password, or a legacy-sealed note with one
    /// - `DecryptionFailed` for a wrong password or damaged ciphertext
    pub fn decrypt_note(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        request: DecryptNoteRequest,
    ) -> Result<NoteView> {
        let note = self.store.get_note(owner, id)?.ok_or_else(note_not_found)?;
        let sealed = sealed_content(&note)?;

        let supplied = request
            .password
            .as_ref()
            .map(|password| password.expose_secret())
            .filter(|password| !password.is_empty());
        let password = match sealed.mode() {
            Some(KeyMode::Legacy) if supplied.is_some() => {
                return Err(NoteError::InvalidInput(
                    "Note is sealed in legacy mode and opens without a password".to_string(),
                ));
            }
            Some(KeyMode::Legacy) => None,
            _ => Some(supplied.ok_or_else(|| {
                NoteError::InvalidInput("Password is required to decrypt".to_string())
            })?),
        };

        let plaintext = self
            .cipher
            .decrypt(sealed.as_str(), owner.as_str(), password)
            .inspect_err(|err| {
                if err.is_decryption_failure() {
                    warn!(owner_id = %owner, note_id = %id, "note decryption failed");
                }
            })?;

        info!(owner_id = %owner, note_id = %id, "decrypted note");
        Ok(NoteView::revealed(note, plaintext))
    }

    /// Key mode of an encrypted note, `None` for plain notes.
    pub fn key_mode(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<KeyMode>> {
        let note = self.store.get_note(owner, id)?.ok_or_else(note_not_found)?;
        Ok(match &note.content {
            StoredContent::Sealed(sealed) => sealed.mode(),
            StoredContent::Plain(_) => None,
        })
    }

    /// Re-seal a legacy-mode note under `password`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the note is not sealed in legacy mode or the password
    /// is too short.
    pub fn migrate_legacy_note(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        password: &SecretString,
    ) -> Result<NoteView> {
        validate_password(password.expose_secret())?;

        let note = self.store.get_note(owner, id)?.ok_or_else(note_not_found)?;
        let sealed = sealed_content(&note)?;
        if sealed.mode() != Some(KeyMode::Legacy) {
            return Err(NoteError::InvalidInput(
                "Note is not sealed in legacy mode".to_string(),
            ));
        }

        let plaintext = Zeroizing::new(self.cipher.decrypt(sealed.as_str(), owner.as_str(), None)?);
        let resealed = self.cipher.encrypt(
            &plaintext,
            owner.as_str(),
            Some(password.expose_secret()),
        )?;

        let changes = NoteChanges {
            title: note.title,
            content: StoredContent::Sealed(resealed),
            color: None,
        };
        let note = self
            .store
            .update_note(owner, id, &changes)?
            .ok_or_else(note_not_found)?;

        info!(owner_id = %owner, note_id = %id, "migrated legacy note");
        Ok(NoteView::redacted(note))
    }

    pub fn delete_note(&self, owner: &OwnerId, id: &Uuid) -> Result<()> {
        if !self.store.delete_note(owner, id)? {
            return Err(note_not_found());
        }
        info!(owner_id = %owner, note_id = %id, "deleted note");
        Ok(())
    }

    /// Move a note into one of the owner's folders, or to the root with `None`.
    pub fn move_note(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        folder_id: Option<Uuid>,
    ) -> Result<NoteView> {
        self.store
            .move_note(owner, id, folder_id)?
            .map(NoteView::redacted)
            .ok_or_else(note_not_found)
    }

    pub fn set_note_tags(&self, owner: &OwnerId, id: &Uuid, tag_ids: &[Uuid]) -> Result<NoteView> {
        self.store
            .set_note_tags(owner, id, tag_ids)?
            .map(NoteView::redacted)
            .ok_or_else(note_not_found)
    }

    fn prepare_content(
        &self,
        owner: &OwnerId,
        content: String,
        encrypted: bool,
        password: Option<&SecretString>,
    ) -> Result<StoredContent> {
        if !encrypted {
            // A plain row must never look sealed, or the pairing check breaks.
            if CipherText::is_envelope(&content) {
                return Err(NoteError::InvalidInput(
                    "Plain content cannot be a sealed envelope".to_string(),
                ));
            }
            return Ok(StoredContent::Plain(content));
        }

        let password = password.map(|password| password.expose_secret()).ok_or_else(|| {
            NoteError::InvalidInput("Password is required to encrypt a note".to_string())
        })?;
        validate_password(password)?;

        let content = Zeroizing::new(content);
        let sealed = self.cipher.encrypt(&content, owner.as_str(), Some(password))?;
        Ok(StoredContent::Sealed(sealed))
    }

    // --- Folders ---

    pub fn create_folder(
        &self,
        owner: &OwnerId,
        name: &str,
        parent_id: Option<Uuid>,
        color: Option<&str>,
    ) -> Result<Folder> {
        let folder = NewFolder {
            name: normalize_name("Folder name", name)?,
            parent_id,
            color: normalize_color(color),
        };
        let folder = self.store.insert_folder(owner, &folder)?;
        info!(owner_id = %owner, folder_id = %folder.id, "created folder");
        Ok(folder)
    }

    pub fn get_folder(&self, owner: &OwnerId, id: &Uuid) -> Result<Folder> {
        self.store.get_folder(owner, id)?.ok_or_else(folder_not_found)
    }

    pub fn list_folders(&self, owner: &OwnerId) -> Result<Vec<Folder>> {
        self.store.list_folders(owner)
    }

    /// Rename, re-parent, or recolor a folder.
    pub fn update_folder(
        &self,
        owner: &OwnerId,
        id: &Uuid,
        changes: FolderChanges,
    ) -> Result<Folder> {
        let changes = FolderChanges {
            name: changes
                .name
                .map(|name| normalize_name("Folder name", &name))
                .transpose()?,
            parent_id: changes.parent_id,
            color: changes
                .color
                .map(|color| normalize_color(color.as_deref())),
        };
        self.store
            .update_folder(owner, id, &changes)?
            .ok_or_else(folder_not_found)
    }

    /// Delete a folder with its subfolders. Notes inside move to the root.
    pub fn delete_folder(&self, owner: &OwnerId, id: &Uuid) -> Result<()> {
        if !self.store.delete_folder(owner, id)? {
            return Err(folder_not_found());
        }
        info!(owner_id = %owner, folder_id = %id, "deleted folder");
        Ok(())
    }

    // --- Tags ---

    pub fn create_tag(&self, owner: &OwnerId, name: &str, color: Option<&str>) -> Result<Tag> {
        let tag = NewTag {
            name: normalize_name("Tag name", name)?,
            color: normalize_color(color).unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string()),
        };
        self.store.insert_tag(owner, &tag)
    }

    pub fn list_tags(&self, owner: &OwnerId) -> Result<Vec<Tag>> {
        self.store.list_tags(owner)
    }

    pub fn update_tag(&self, owner: &OwnerId, id: &Uuid, changes: TagChanges) -> Result<Tag> {
        let changes = TagChanges {
            name: changes
                .name
                .map(|name| normalize_name("Tag name", &name))
                .transpose()?,
            color: normalize_color(changes.color.as_deref()),
        };
        self.store
            .update_tag(owner, id, &changes)?
            .ok_or_else(tag_not_found)
    }

    pub fn delete_tag(&self, owner: &OwnerId, id: &Uuid) -> Result<()> {
        if !self.store.delete_tag(owner, id)? {
            return Err(tag_not_found());
        }
        Ok(())
    }

    // --- Maintenance ---

    /// Verify the store, including that every `encrypted` flag matches its
    /// content.
    pub fn check_integrity(&self) -> Result<()> {
        self.store.check_integrity()
    }
}

fn sealed_content(note: &Note) -> Result<&CipherText> {
    match &note.content {
        StoredContent::Sealed(sealed) => Ok(sealed),
        StoredContent::Plain(_) => Err(NoteError::InvalidInput(
            "Note is not encrypted".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CipherConfig;
    use crate::crypto::derive_legacy_key;
    use crate::storage::SqliteStore;

    const LEGACY_SALT: &str = "installation-salt";

    fn service() -> NoteService<SqliteStore> {
        NoteService::new(
            SqliteStore::open_in_memory().unwrap(),
            ContentCipher::new(CipherConfig::new().with_legacy_salt(LEGACY_SALT)),
        )
    }

    fn owner() -> OwnerId {
        OwnerId::new("user_42").unwrap()
    }

    #[test]
    fn test_plain_note_reads_back() {
        let service = service();
        let created = service
            .create_note(&owner(), CreateNoteRequest::new(" Groceries ", "milk"))
            .unwrap();
        assert_eq!(created.title, "Groceries");

        let fetched = service.get_note(&owner(), &created.id).unwrap();
        assert_eq!(fetched.content, "milk");
        assert!(!fetched.encrypted);
    }

    #[test]
    fn test_blank_fields_rejected() {
        let service = service();
        assert!(matches!(
            service.create_note(&owner(), CreateNoteRequest::new("  ", "body")),
            Err(NoteError::InvalidInput(_))
        ));
        assert!(matches!(
            service.create_note(&owner(), CreateNoteRequest::new("Title", "   ")),
            Err(NoteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_encrypt_requires_valid_password() {
        let service = service();
        let mut missing = CreateNoteRequest::new("Diary", "dear diary");
        missing.encrypted = true;
        assert!(matches!(
            service.create_note(&owner(), missing),
            Err(NoteError::InvalidInput(_))
        ));

        let short = CreateNoteRequest::new("Diary", "dear diary").encrypted_with("abc");
        assert!(matches!(
            service.create_note(&owner(), short),
            Err(NoteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_plain_envelope_rejected() {
        let service = service();
        let key = derive_legacy_key("user_42", LEGACY_SALT).unwrap();
        let sealed = crate::crypto::seal(&key, "x").unwrap();
        let result =
            service.create_note(&owner(), CreateNoteRequest::new("Sneaky", sealed.as_str()));
        assert!(matches!(result, Err(NoteError::InvalidInput(_))));
    }

    #[test]
    fn test_decrypt_plain_note_rejected() {
        let service = service();
        let note = service
            .create_note(&owner(), CreateNoteRequest::new("Groceries", "milk"))
            .unwrap();
        assert!(matches!(
            service.decrypt_note(&owner(), &note.id, DecryptNoteRequest::new("hunter2")),
            Err(NoteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_legacy_note_decrypts_without_password_and_migrates() {
        let service = service();
        let key = derive_legacy_key("user_42", LEGACY_SALT).unwrap();
        let sealed = crate::crypto::seal(&key, "old secret").unwrap();
        let note = service
            .store()
            .insert_note(&owner(), &NewNote::new("Old", StoredContent::Sealed(sealed)))
            .unwrap();

        assert_eq!(
            service.key_mode(&owner(), &note.id).unwrap(),
            Some(KeyMode::Legacy)
        );
        let revealed = service
            .decrypt_note(&owner(), &note.id, DecryptNoteRequest::legacy())
            .unwrap();
        assert_eq!(revealed.content, "old secret");

        // Any password, right or wrong, is refused for a legacy note.
        assert!(matches!(
            service.decrypt_note(&owner(), &note.id, DecryptNoteRequest::new("totally-wrong")),
            Err(NoteError::InvalidInput(_))
        ));

        let migrated = service
            .migrate_legacy_note(&owner(), &note.id, &SecretString::from("hunter2"))
            .unwrap();
        assert!(migrated.is_redacted());
        assert_eq!(
            service.key_mode(&owner(), &note.id).unwrap(),
            Some(KeyMode::Password)
        );

        assert!(matches!(
            service.decrypt_note(&owner(), &note.id, DecryptNoteRequest::legacy()),
            Err(NoteError::InvalidInput(_))
        ));
        assert!(matches!(
            service.migrate_legacy_note(&owner(), &note.id, &SecretString::from("hunter2")),
            Err(NoteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_note_is_not_found() {
        let service = service();
        let id = Uuid::new_v4();
        assert!(matches!(
            service.get_note(&owner(), &id),
            Err(NoteError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_note(&owner(), &id),
            Err(NoteError::NotFound(_))
        ));
    }

    #[test]
    fn test_tag_defaults_and_conflicts() {
        let service = service();
        let tag = service.create_tag(&owner(), " work ", None).unwrap();
        assert_eq!(tag.name, "work");
        assert_eq!(tag.color, DEFAULT_TAG_COLOR);

        assert!(matches!(
            service.create_tag(&owner(), "work", Some("#000000")),
            Err(NoteError::Conflict(_))
        ));

        let renamed = service
            .update_tag(
                &owner(),
                &tag.id,
                TagChanges {
                    name: Some("office".to_string()),
                    color: None,
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "office");
        assert_eq!(renamed.color, DEFAULT_TAG_COLOR);
    }

    #[test]
    fn test_folder_rename_validates() {
        let service = service();
        let folder = service
            .create_folder(&owner(), "Work", None, Some("  "))
            .unwrap();
        assert_eq!(folder.color, None);

        let result = service.update_folder(
            &owner(),
            &folder.id,
            FolderChanges {
                name: Some("   ".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(NoteError::InvalidInput(_))));
    }
}
