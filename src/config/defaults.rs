//! Built-in settings defaults (layer 1)
//!
//! Hardcoded defaults for all settings values.

use serde::{Deserialize, Serialize};

use crate::catalog::SortOrder;

/// Built-in default settings values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Hide configurations whose required tech is not unlocked (default: false)
    pub hide_unavailable: bool,

    /// Display ordering of configurations and patches (default: declared)
    pub sort: SortOrder,

    /// Include the `description` field in config info (default: true)
    pub include_description: bool,

    /// Colorize display names (default: false)
    pub color: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            hide_unavailable: false,
            sort: SortOrder::Declared,
            include_description: true,
            color: false,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "display": {
                "hide_unavailable": self.hide_unavailable,
                "unlocked_techs": [],
                "sort": self.sort,
            },
            "describe": {
                "include_description": self.include_description,
                "color": self.color,
            }
        })
    }
}
