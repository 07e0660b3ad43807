//! Writing and reading the JSON result file.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failure to persist or load a result file
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pretty-printed JSON with two-space indentation, non-ASCII text kept as is
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write `value` to `path`, creating parent directories as needed
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = to_pretty_json(value)?;
    fs::write(path, content)?;
    tracing::info!("Saved JSON -> {}", path.display());
    Ok(())
}

/// Read a result file written by [`write_json`]
///
/// `results` is untagged, so pass-through JSON that happens to look like one
/// of the typed records comes back as that record. Read into
/// [`serde_json::Value`] to get the file content exactly.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, OutputError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
