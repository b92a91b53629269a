//! Configuration Catalog
//!
//! Parses and validates a catalog file holding the selectable base
//! configurations. Each `[[CONFIG]]` table is one base configuration; its
//! `[[CONFIG.SUBCONFIG]]` tables are the patches it owns.
//!
//! The catalog is the in-repo implementation of [`ConfigRegistry`], the lookup
//! and display-filter interface the resolver is written against.

mod filter;

pub use filter::{DisplayFilter, SortOrder, TECH_REQUIRED_KEY};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use config_node::{ConfigNode, ConvertError};
use sha2::{Digest, Sha256};

use crate::patch::PATCH_NODE_TAG;

/// Tag of base configuration blocks in a catalog file
pub const CONFIG_NODE_TAG: &str = "CONFIG";

/// Lookup and display-filter interface over the catalogue of base configurations
pub trait ConfigRegistry {
    /// Base configuration with the given `name`, if any
    fn config_by_name(&self, name: &str) -> Option<&ConfigNode>;

    /// Configuration used when a requested name is unknown
    fn default_config(&self) -> Option<&ConfigNode>;

    /// Apply visibility rules and display order
    fn filter_display_configs(&self, configs: Vec<ConfigNode>) -> Vec<ConfigNode>;

    /// Every base configuration, in catalog order
    fn configs(&self) -> &[ConfigNode];

    /// Base resolution: the named configuration, else the default
    fn resolve_base(&self, name: &str) -> Option<&ConfigNode> {
        self.config_by_name(name).or_else(|| self.default_config())
    }
}

impl<T: ConfigRegistry + ?Sized> ConfigRegistry for &T {
    fn config_by_name(&self, name: &str) -> Option<&ConfigNode> {
        (**self).config_by_name(name)
    }
    fn default_config(&self) -> Option<&ConfigNode> {
        (**self).default_config()
    }
    fn filter_display_configs(&self, configs: Vec<ConfigNode>) -> Vec<ConfigNode> {
        (**self).filter_display_configs(configs)
    }
    fn configs(&self) -> &[ConfigNode] {
        (**self).configs()
    }
}

impl<T: ConfigRegistry + ?Sized> ConfigRegistry for Rc<T> {
    fn config_by_name(&self, name: &str) -> Option<&ConfigNode> {
        (**self).config_by_name(name)
    }
    fn default_config(&self) -> Option<&ConfigNode> {
        (**self).default_config()
    }
    fn filter_display_configs(&self, configs: Vec<ConfigNode>) -> Vec<ConfigNode> {
        (**self).filter_display_configs(configs)
    }
    fn configs(&self) -> &[ConfigNode] {
        (**self).configs()
    }
}

impl<T: ConfigRegistry + ?Sized> ConfigRegistry for Arc<T> {
    fn config_by_name(&self, name: &str) -> Option<&ConfigNode> {
        (**self).config_by_name(name)
    }
    fn default_config(&self) -> Option<&ConfigNode> {
        (**self).default_config()
    }
    fn filter_display_configs(&self, configs: Vec<ConfigNode>) -> Vec<ConfigNode> {
        (**self).filter_display_configs(configs)
    }
    fn configs(&self) -> &[ConfigNode] {
        (**self).configs()
    }
}

/// Errors that can occur when loading or validating a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid catalog layout: {0}")]
    Layout(String),

    #[error("CONFIG #{index}: {source}")]
    Convert {
        index: usize,
        #[source]
        source: ConvertError,
    },

    #[error("CONFIG #{index}: missing required field 'name'")]
    MissingName { index: usize },

    #[error("Duplicate configuration name: '{0}'")]
    DuplicateName(String),

    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),
}

/// Where a catalog was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub path: PathBuf,
    /// SHA-256 digest of the raw file bytes
    pub digest: String,
}

/// Validated catalogue of base configurations
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    configs: Vec<ConfigNode>,
    filter: DisplayFilter,
    source: Option<CatalogSource>,
}

impl Catalog {
    /// Build a catalog from already-constructed configurations
    pub fn new(configs: Vec<ConfigNode>) -> Result<Self, CatalogError> {
        let catalog = Self {
            configs,
            filter: DisplayFilter::default(),
            source: None,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Replace the display filter
    pub fn with_filter(mut self, filter: DisplayFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Load a catalog from a specific path
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let digest = hex::encode(Sha256::digest(&bytes));
        let content = String::from_utf8(bytes).map_err(|e| {
            CatalogError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        let mut catalog = Self::parse(&content)?;
        catalog.source = Some(CatalogSource {
            path: path.to_path_buf(),
            digest,
        });
        log::debug!(
            "loaded {} configuration(s) from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a catalog from TOML text
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let table: toml::Table = toml::from_str(content)?;

        let entries = match table.get(CONFIG_NODE_TAG) {
            None => Vec::new(),
            Some(toml::Value::Array(items)) => items.clone(),
            Some(_) => {
                return Err(CatalogError::Layout(format!(
                    "'{}' must be an array of tables ([[{}]])",
                    CONFIG_NODE_TAG, CONFIG_NODE_TAG
                )))
            }
        };

        let mut configs = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let toml::Value::Table(entry) = entry else {
                return Err(CatalogError::Layout(format!(
                    "{} #{} is not a table",
                    CONFIG_NODE_TAG, index
                )));
            };
            let node = ConfigNode::from_toml_table(CONFIG_NODE_TAG, entry)
                .map_err(|source| CatalogError::Convert { index, source })?;
            configs.push(node);
        }

        Self::new(configs)
    }

    /// Validate the catalog
    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen_names = HashSet::new();
        for (index, config) in self.configs.iter().enumerate() {
            let name = config.name().ok_or(CatalogError::MissingName { index })?;
            if !seen_names.insert(name) {
                return Err(CatalogError::DuplicateName(name.to_string()));
            }

            // Lookups take the first match, so later duplicates are unreachable
            let mut patch_names = HashSet::new();
            for patch in config.get_nodes(PATCH_NODE_TAG) {
                match patch.name() {
                    Some(patch_name) if !patch_names.insert(patch_name) => {
                        log::warn!(
                            "configuration '{}' declares patch '{}' more than once; only the first is selectable",
                            name,
                            patch_name
                        );
                    }
                    None => {
                        log::warn!("configuration '{}' has a patch without a name", name);
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Names of all configurations, in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.configs.iter().filter_map(ConfigNode::name).collect()
    }

    pub fn filter(&self) -> &DisplayFilter {
        &self.filter
    }

    pub fn source(&self) -> Option<&CatalogSource> {
        self.source.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }
}

impl ConfigRegistry for Catalog {
    fn config_by_name(&self, name: &str) -> Option<&ConfigNode> {
        self.configs.iter().find(|c| c.name() == Some(name))
    }

    fn default_config(&self) -> Option<&ConfigNode> {
        self.configs.first()
    }

    fn filter_display_configs(&self, configs: Vec<ConfigNode>) -> Vec<ConfigNode> {
        self.filter.apply(configs)
    }

    fn configs(&self) -> &[ConfigNode] {
        &self.configs
    }
}
