//! Test fixtures shared by the integration tests
//!
//! - `engines.toml`: three engine configurations, two owning patches
//! - `throttled.toml`: a standalone patch used as a dynamic overlay

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use patchable_configs::{Catalog, ConfigNode, PATCH_NODE_TAG};

/// Path to the engine catalog fixture
pub fn engines_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/engines.toml")
}

/// Path to the dynamic patch fixture
pub fn throttled_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/throttled.toml")
}

/// Load the engine catalog with the default display filter
pub fn engines() -> Catalog {
    Catalog::load(&engines_path()).expect("Failed to load engines fixture")
}

/// Load the dynamic patch fixture as a patch node
pub fn throttled() -> ConfigNode {
    let content = std::fs::read_to_string(throttled_path()).expect("Failed to read throttled fixture");
    let table: toml::Table = toml::from_str(&content).expect("Failed to parse throttled fixture");
    ConfigNode::from_toml_table(PATCH_NODE_TAG, &table).expect("Failed to convert throttled fixture")
}
