//! Whole-file read/write helpers for the flat-file data tree.
//!
//! Every failure is mapped to a [`StoreError`] carrying the offending path.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// One directory entry, as returned by [`list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Read a UTF-8 text file.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| StoreError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Write (create or truncate) a text file.
pub fn write_text(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data).map_err(|e| StoreError::io(path, e))
}

/// Read and decode a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode `value` as JSON and replace `path` atomically.
///
/// The data is written to a sibling temp file first and then renamed over
/// the target, so readers never observe a partially written file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = temp_path(path);
    write_text(&tmp, &json)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        StoreError::io(path, e)
    })?;

    debug!(path = %path.display(), bytes = json.len(), "wrote json file");
    Ok(())
}

/// Create `path` and any missing parents.  Returns `true` if it was created.
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| StoreError::io(path, e))?;
    Ok(true)
}

/// Remove a directory tree.  Failures are logged, never returned.
pub fn remove_dir(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_dir_all(path) {
        warn!(path = %path.display(), error = %e, "failed to remove directory");
    }
}

/// List a directory, sorted by entry name.  Entries whose names are not
/// valid UTF-8 are skipped.
pub fn list_dir(path: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let read = fs::read_dir(path).map_err(|e| StoreError::io(path, e))?;

    for entry in read {
        let entry = entry.map_err(|e| StoreError::io(path, e))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %entry.path().display(), "skipping non UTF-8 entry");
            continue;
        };
        let entry_path = entry.path();
        entries.push(Entry {
            is_dir: entry_path.is_dir(),
            name,
            path: entry_path,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
