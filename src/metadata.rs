//! Descriptive template metadata read from `__metadata.json`.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

/// Read-only description of a template. Unknown fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Metadata {
    /// Loads metadata, returning `None` when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Metadata>> {
        let path = path.as_ref();
        let read_error = |reason: String| Error::MetadataRead { path: path.to_path_buf(), reason };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_error(e.to_string())),
        };

        serde_json::from_str(&content).map(Some).map_err(|e| read_error(e.to_string()))
    }
}
