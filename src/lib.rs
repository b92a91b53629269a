//! Patchable configurations
//!
//! Resolves a named base configuration, optionally overlaid by one of its
//! named patches (`SUBCONFIG` blocks), into the flattened configuration a host
//! object should run with. Patches replace whole fields and blocks by name;
//! untouched names survive unchanged.

pub mod catalog;
pub mod config;
pub mod patch;
pub mod presentation;
pub mod resolver;

pub use catalog::{Catalog, CatalogError, ConfigRegistry, DisplayFilter, SortOrder};
pub use config::{EffectiveSettings, Settings, SettingsError};
pub use config_node::{ConfigNode, NAME_KEY};
pub use patch::{
    apply_patch, find_patch, has_patches, is_patched, patches_of, Provenance, ResolvedConfig,
    PATCH_NAME_KEY, PATCH_NODE_TAG,
};
pub use presentation::{config_info_string, describe, display_name, Selector};
pub use resolver::{
    ConfigHost, EventBus, LiveConfig, PatchEvent, PatchableConfigs, ResolveError,
    SelectionState, SymmetryCounterpart,
};
