//! Typed requests and responses for the note service.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use uuid::Uuid;

use crate::storage::{Note, StoredContent, Tag};

/// Shown in place of the body of every encrypted note until it is decrypted.
pub const ENCRYPTED_PLACEHOLDER: &str = "🔒 Encrypted content";

/// Input for [`NoteService::create_note`](super::NoteService::create_note).
#[derive(Debug)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    pub encrypted: bool,
    pub password: Option<SecretString>,
    pub color: Option<String>,
    pub folder_id: Option<Uuid>,
}

impl CreateNoteRequest {
    /// A plain note with no folder or color.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            encrypted: false,
            password: None,
            color: None,
            folder_id: None,
        }
    }

    /// Seal the body under `password`.
    pub fn encrypted_with(mut self, password: impl Into<String>) -> Self {
        self.encrypted = true;
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn in_folder(mut self, folder_id: Uuid) -> Self {
        self.folder_id = Some(folder_id);
        self
    }
}

/// Input for [`NoteService::update_note`](super::NoteService::update_note).
///
/// Title and content are always replaced. With `encrypted = false` the
/// content is stored as given, so turning encryption off means sending back
/// plaintext obtained from an earlier decrypt.
#[derive(Debug)]
pub struct UpdateNoteRequest {
    pub title: String,
    pub content: String,
    pub encrypted: bool,
    pub password: Option<SecretString>,
    pub color: Option<String>,
}

impl UpdateNoteRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            encrypted: false,
            password: None,
            color: None,
        }
    }

    pub fn encrypted_with(mut self, password: impl Into<String>) -> Self {
        self.encrypted = true;
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Input for [`NoteService::decrypt_note`](super::NoteService::decrypt_note).
///
/// The password may be omitted only for notes sealed in legacy mode.
#[derive(Debug, Default)]
pub struct DecryptNoteRequest {
    pub password: Option<SecretString>,
}

impl DecryptNoteRequest {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Some(SecretString::from(password.into())),
        }
    }

    /// A request for a legacy-mode note, which opens with the installation salt.
    pub fn legacy() -> Self {
        Self::default()
    }
}

/// Outward shape of a note.
///
/// Built either redacted (encrypted bodies replaced by
/// [`ENCRYPTED_PLACEHOLDER`]) or revealed (after an explicit decrypt). It
/// never carries ciphertext.
#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub encrypted: bool,
    pub color: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NoteView {
    pub fn redacted(note: Note) -> Self {
        let content = match &note.content {
            StoredContent::Plain(text) => text.clone(),
            StoredContent::Sealed(_) => ENCRYPTED_PLACEHOLDER.to_string(),
        };
        Self::with_content(note, content)
    }

    pub(crate) fn revealed(note: Note, plaintext: String) -> Self {
        Self::with_content(note, plaintext)
    }

    fn with_content(note: Note, content: String) -> Self {
        Self {
            id: note.id,
            encrypted: note.is_encrypted(),
            title: note.title,
            content,
            color: note.color,
            folder_id: note.folder_id,
            tags: note.tags,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    /// Whether `content` holds the placeholder rather than the real body.
    pub fn is_redacted(&self) -> bool {
        self.encrypted && self.content == ENCRYPTED_PLACEHOLDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_legacy_key, seal};
    use crate::storage::OwnerId;

    fn sealed_note() -> Note {
        let key = derive_legacy_key("user_42", "salt").unwrap();
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            owner_id: OwnerId::new("user_42").unwrap(),
            title: "Diary".to_string(),
            content: StoredContent::Sealed(seal(&key, "dear diary").unwrap()),
            color: None,
            folder_id: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_redacted_view_hides_ciphertext() {
        let note = sealed_note();
        let stored = note.content.as_stored().to_string();
        let view = NoteView::redacted(note);

        assert!(view.encrypted);
        assert!(view.is_redacted());
        assert_eq!(view.content, ENCRYPTED_PLACEHOLDER);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains(&stored));
    }

    #[test]
    fn test_revealed_view_carries_plaintext() {
        let view = NoteView::revealed(sealed_note(), "dear diary".to_string());
        assert!(view.encrypted);
        assert!(!view.is_redacted());
        assert_eq!(view.content, "dear diary");
    }

    #[test]
    fn test_request_debug_redacts_password() {
        let request = CreateNoteRequest::new("t", "c").encrypted_with("hunter2");
        assert!(!format!("{:?}", request).contains("hunter2"));
    }
}
