//! Input handling helpers for passwords and note bodies.

use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use std::process::Command;

use dialoguer::Password;
use secrecy::SecretString;
use zeroize::Zeroizing;

use notecrypt_core::crypto::validate_password;

use crate::constants::env_vars;
use crate::errors::CliError;

fn password_from_env() -> Option<String> {
    std::env::var(env_vars::PASSWORD)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Prompt for a note password, or read it from NOTECRYPT_PASSWORD.
pub fn prompt_password(interactive: bool) -> anyhow::Result<SecretString> {
    if let Some(value) = password_from_env() {
        return Ok(SecretString::from(value));
    }
    if !interactive {
        return Err(CliError::invalid_input(
            "No password provided and no TTY available. Set NOTECRYPT_PASSWORD.",
        )
        .into());
    }
    let password = Password::new()
        .with_prompt("Note password")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    Ok(SecretString::from(password))
}

/// Prompt for a new note password with confirmation, or read it from
/// NOTECRYPT_PASSWORD. The password is validated either way.
pub fn prompt_new_password(interactive: bool) -> anyhow::Result<SecretString> {
    if let Some(value) = password_from_env() {
        validate_password(&value)?;
        return Ok(SecretString::from(value));
    }
    if !interactive {
        return Err(CliError::invalid_input(
            "No password provided and no TTY available. Set NOTECRYPT_PASSWORD.",
        )
        .into());
    }
    loop {
        let password = Zeroizing::new(
            Password::new()
                .with_prompt("New note password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?,
        );
        if let Err(err) = validate_password(&password) {
            eprintln!("Password does not meet requirements: {}", err);
            continue;
        }
        return Ok(SecretString::from(password.to_string()));
    }
}

/// Read a note body from --body flag, stdin, or $EDITOR.
pub fn read_note_body(
    no_input: bool,
    body: Option<String>,
    editor_override: Option<&str>,
    initial_body: Option<&str>,
) -> anyhow::Result<String> {
    if let Some(value) = body {
        if value.trim().is_empty() {
            return Err(CliError::invalid_input("--body cannot be empty").into());
        }
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end().to_string();
        if trimmed.is_empty() {
            return Err(CliError::invalid_input("No input provided on stdin").into());
        }
        return Ok(trimmed);
    }

    if no_input {
        return Err(CliError::invalid_input("--no-input requires --body or content on stdin").into());
    }

    read_body_from_editor(editor_override, initial_body)
}

/// Open $EDITOR to compose a note body.
fn read_body_from_editor(
    editor_override: Option<&str>,
    initial_body: Option<&str>,
) -> anyhow::Result<String> {
    let editor = editor_override
        .map(|value| value.to_string())
        .or_else(|| std::env::var("EDITOR").ok())
        .ok_or_else(|| {
            anyhow::anyhow!("$EDITOR is not set; use --body or pipe content via stdin")
        })?;

    edit_in_temp_file(&editor, initial_body, &std::env::temp_dir())
}

/// Run `editor` on an owner-only temp file in `dir`. The file is removed when
/// this returns, on success or failure.
fn edit_in_temp_file(
    editor: &str,
    initial_body: Option<&str>,
    dir: &Path,
) -> anyhow::Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("notecrypt_note_")
        .suffix(".md")
        .tempfile_in(dir)
        .map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;
    if let Some(initial) = initial_body {
        file.write_all(initial.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| anyhow::anyhow!("Failed to write temp file: {}", e))?;
    }

    let status = Command::new(editor)
        .arg(file.path())
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = Zeroizing::new(
        std::fs::read_to_string(file.path())
            .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?,
    );

    let trimmed = contents.trim_end().to_string();
    if trimmed.is_empty() {
        return Err(CliError::invalid_input("Note body is empty").into());
    }

    Ok(trimmed)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn write_script(dir: &Path, body: &str) -> String {
        let path = dir.join("editor.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn leftover_notes(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("notecrypt_note_"))
            .collect()
    }

    #[test]
    fn test_editor_file_is_private_and_removed() {
        let scratch = tempdir().unwrap();
        let work = tempdir().unwrap();
        let mode_file = scratch.path().join("mode");
        let editor = write_script(
            scratch.path(),
            &format!(
                "ls -l \"$1\" | cut -c1-10 > '{}'\nprintf 'typed in editor' >> \"$1\"",
                mode_file.display()
            ),
        );

        let body = edit_in_temp_file(&editor, None, work.path()).unwrap();

        assert_eq!(body, "typed in editor");
        assert_eq!(std::fs::read_to_string(&mode_file).unwrap().trim(), "-rw-------");
        assert!(leftover_notes(work.path()).is_empty());
    }

    #[test]
    fn test_failed_editor_leaves_no_file() {
        let scratch = tempdir().unwrap();
        let work = tempdir().unwrap();
        let editor = write_script(scratch.path(), "printf 'secret draft' >> \"$1\"\nexit 1");

        let result = edit_in_temp_file(&editor, Some("seed"), work.path());

        assert!(result.is_err());
        assert!(leftover_notes(work.path()).is_empty());
    }
}
