//! Table and text output for notes, folders, and tags.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use uuid::Uuid;

use notecrypt_core::notes::NoteView;
use notecrypt_core::storage::{Folder, Tag};

const SUMMARY_MAX: usize = 60;

/// First eight characters of an ID for compact display.
pub fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

fn summary(text: &str) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= SUMMARY_MAX {
        return single_line;
    }
    let truncated: String = single_line.chars().take(SUMMARY_MAX - 1).collect();
    format!("{}…", truncated)
}

fn new_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

/// Render a note listing. Encrypted bodies arrive already redacted.
pub fn notes_table(notes: &[NoteView]) -> String {
    let mut table = new_table(vec!["ID", "Title", "Content", "Tags", "Updated"]);
    for note in notes {
        let tags = note
            .tags
            .iter()
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            short_id(&note.id),
            note.title.clone(),
            summary(&note.content),
            tags,
            format_timestamp(&note.updated_at),
        ]);
    }
    table.to_string()
}

/// Render one note in full.
pub fn note_detail(note: &NoteView) -> String {
    let mut lines = vec![
        format!("ID:        {}", note.id),
        format!("Title:     {}", note.title),
        format!(
            "Encrypted: {}",
            if note.encrypted { "yes" } else { "no" }
        ),
    ];
    if let Some(folder_id) = note.folder_id {
        lines.push(format!("Folder:    {}", folder_id));
    }
    if let Some(color) = note.color.as_deref() {
        lines.push(format!("Color:     {}", color));
    }
    if !note.tags.is_empty() {
        let tags = note
            .tags
            .iter()
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Tags:      {}", tags));
    }
    lines.push(format!("Created:   {}", note.created_at.to_rfc3339()));
    lines.push(format!("Updated:   {}", note.updated_at.to_rfc3339()));
    lines.push(String::new());
    lines.push(note.content.clone());
    lines.join("\n")
}

/// Render folders with their parent's name and note count.
pub fn folders_table(folders: &[Folder]) -> String {
    let names: HashMap<Uuid, &str> = folders
        .iter()
        .map(|folder| (folder.id, folder.name.as_str()))
        .collect();

    let mut table = new_table(vec!["ID", "Name", "Parent", "Notes", "Color"]);
    for folder in folders {
        let parent = folder
            .parent_id
            .map(|id| names.get(&id).map(|name| name.to_string()).unwrap_or_else(|| short_id(&id)))
            .unwrap_or_default();
        table.add_row(vec![
            folder.id.to_string(),
            folder.name.clone(),
            parent,
            folder.note_count.to_string(),
            folder.color.clone().unwrap_or_default(),
        ]);
    }
    table.to_string()
}

pub fn tags_table(tags: &[Tag]) -> String {
    let mut table = new_table(vec!["ID", "Name", "Color"]);
    for tag in tags {
        table.add_row(vec![tag.id.to_string(), tag.name.clone(), tag.color.clone()]);
    }
    table.to_string()
}
