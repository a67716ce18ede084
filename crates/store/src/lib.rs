//! JSON merge-store — reads, merges, and rewrites a JSON document on disk.
//!
//! Writing to a path that does not exist (or holds an empty file) stores
//! the data verbatim. Writing to a path holding a JSON object updates it
//! key-by-key: new values override old values for identical keys, keys
//! present only in the old document are preserved. The merged object then
//! replaces the file contents with a plain truncate-and-write — no
//! crash-atomicity beyond what the filesystem gives a single write.

use std::fs;
use std::path::Path;

use fieldscout_core::StoreError;
use serde_json::{Map, Value};
use tracing::debug;

/// Merge `data` into the JSON object stored at `path` and write it back.
///
/// Fails with [`StoreError::Decode`] if the existing file is present but
/// not valid JSON, and with [`StoreError::NotAnObject`] if it parses to
/// something other than an object.
pub fn merge_write(data: &Map<String, Value>, path: &Path) -> Result<(), StoreError> {
    let merged = match read_object(path)? {
        Some(mut existing) => {
            for (key, value) in data {
                existing.insert(key.clone(), value.clone());
            }
            existing
        }
        None => data.clone(),
    };

    let body = serde_json::to_vec_pretty(&Value::Object(merged)).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    fs::write(path, body).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), keys = data.len(), "merge-wrote JSON document");
    Ok(())
}

/// Read the JSON object at `path`, or `None` for a missing/empty file.
pub fn read_object(path: &Path) -> Result<Option<Map<String, Value>>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if raw.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(&raw).map_err(|e| StoreError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(StoreError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}
