//! JSON output.

use serde::Serialize;

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow::anyhow!("Failed to render JSON: {}", e))?;
    println!("{}", rendered);
    Ok(())
}
