//! Effective settings with full provenance
//!
//! The effective settings capture the merged settings plus information about
//! where each layer came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;
use crate::catalog::{DisplayFilter, SortOrder};

/// Schema version for effective settings
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "patchcfg/effective_settings@1";

/// Project settings file name, looked up in the working directory
pub const PROJECT_SETTINGS_FILE: &str = ".patchcfg.toml";

/// Origin of a settings source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SettingsOrigin {
    Builtin,
    Host,
    Project,
    Cli,
}

/// A contributing settings source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSource {
    /// Origin of this source
    pub origin: SettingsOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Display filtering and ordering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub hide_unavailable: bool,
    #[serde(default)]
    pub unlocked_techs: Vec<String>,
    pub sort: SortOrder,
}

/// Config info rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribeSettings {
    pub include_description: bool,
    pub color: bool,
}

/// Typed view of the merged settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Catalog file to load configurations from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    pub display: DisplaySettings,

    pub describe: DescribeSettings,
}

impl Settings {
    /// Display filter described by these settings
    pub fn display_filter(&self) -> DisplayFilter {
        DisplayFilter {
            hide_unavailable: self.display.hide_unavailable,
            unlocked_techs: self.display.unlocked_techs.iter().cloned().collect(),
            sort: self.display.sort,
        }
    }
}

/// Effective settings with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveSettings {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When these settings were computed
    pub created_at: DateTime<Utc>,

    /// The merged settings object
    pub settings: Settings,

    /// Contributing sources in precedence order
    pub sources: Vec<SettingsSource>,
}

impl EffectiveSettings {
    /// Build effective settings from layers
    pub fn build(
        host_settings_path: Option<&Path>,
        project_settings_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, SettingsError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(SettingsSource {
            origin: SettingsOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layers 2 and 3: settings files, skipped when absent
        for (origin, path) in [
            (SettingsOrigin::Host, host_settings_path),
            (SettingsOrigin::Project, project_settings_path),
        ] {
            let Some(path) = path else { continue };
            if !path.exists() {
                log::debug!("settings file {} not present, skipping", path.display());
                continue;
            }
            let (value, digest) = Self::load_toml_file(path)?;
            layers.push(value);
            sources.push(SettingsSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 4: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(SettingsSource {
                origin: SettingsOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let settings: Settings = serde_json::from_value(merged)
            .map_err(|e| SettingsError::ParseError(format!("Invalid settings: {}", e)))?;

        Self::validate(&settings)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            settings,
            sources,
        })
    }

    /// Build from the project settings in the working directory and the host
    /// settings at `host_override`, else the default host location
    pub fn build_default(
        host_override: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, SettingsError> {
        let host = host_override
            .map(Path::to_path_buf)
            .or_else(Self::default_host_path);
        let project = PathBuf::from(PROJECT_SETTINGS_FILE);
        Self::build(host.as_deref(), Some(project.as_path()), cli_overrides)
    }

    /// Default host settings path (None when HOME is unset)
    pub fn default_host_path() -> Option<PathBuf> {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config/patchcfg/settings.toml"))
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), SettingsError> {
        let bytes = fs::read(path).map_err(|e| SettingsError::IoError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| SettingsError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        // toml values serialize straight into JSON values
        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))?;
        let json_value = serde_json::to_value(toml_value)
            .map_err(|e| SettingsError::ParseError(format!("TOML conversion error: {}", e)))?;

        Ok((json_value, digest))
    }

    /// Validate settings values
    fn validate(settings: &Settings) -> Result<(), SettingsError> {
        if let Some(catalog) = &settings.catalog {
            if catalog.trim().is_empty() {
                return Err(SettingsError::ValidationError(
                    "catalog must not be empty".to_string(),
                ));
            }
        }

        let mut seen = HashSet::new();
        for tech in &settings.display.unlocked_techs {
            if tech.trim().is_empty() {
                return Err(SettingsError::ValidationError(
                    "display.unlocked_techs must not contain empty entries".to_string(),
                ));
            }
            if !seen.insert(tech) {
                return Err(SettingsError::ValidationError(format!(
                    "display.unlocked_techs lists '{}' more than once",
                    tech
                )));
            }
        }

        Ok(())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
