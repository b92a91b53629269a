//! Persisted selection state (selection.json)

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Which base configuration and patch a host object has selected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionState {
    /// Selected base configuration name
    pub configuration: String,

    /// Selected patch name (empty = no patch)
    pub active_patch_name: String,

    /// The live configuration carries a dynamic overlay not described by
    /// `active_patch_name`
    pub dynamic_patch_applied: bool,
}

/// Errors for selection state persistence
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SelectionState {
    /// Selection of `configuration` with no patch
    pub fn new(configuration: impl Into<String>) -> Self {
        Self {
            configuration: configuration.into(),
            ..Self::default()
        }
    }

    pub fn has_patch(&self) -> bool {
        !self.active_patch_name.is_empty()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write atomically to file (write-then-rename)
    pub fn write_to_file(&self, path: &Path) -> Result<(), SelectionError> {
        let json = self.to_json()?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &json)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Load from file
    pub fn from_file(path: &Path) -> Result<Self, SelectionError> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}
