//! Read-only rendering of configurations
//!
//! Labels and info text are recomputed from the registry on every call;
//! nothing here caches patched derivatives.

mod selectors;

pub use selectors::Selector;

use colored::Colorize;
use config_node::{ConfigNode, NAME_KEY};

use crate::catalog::ConfigRegistry;
use crate::patch::{apply_patch, is_patched, patches_of, PATCH_NAME_KEY, PATCH_NODE_TAG};
use crate::resolver::{ConfigHost, PatchableConfigs};

/// Field overriding the generated label
pub const DISPLAY_NAME_KEY: &str = "displayName";

/// Free-text description shown under the field listing
pub const DESCRIPTION_KEY: &str = "description";

/// Fields already shown by the heading or description
const HIDDEN_INFO_KEYS: &[&str] = &[NAME_KEY, DISPLAY_NAME_KEY, DESCRIPTION_KEY, PATCH_NAME_KEY];

/// Label for a (possibly patched) configuration
pub fn display_name(node: &ConfigNode) -> String {
    if let Some(label) = node.get_value(DISPLAY_NAME_KEY) {
        return label.to_string();
    }
    let name = node.name().unwrap_or_default();
    match node.get_value(PATCH_NAME_KEY) {
        None => name.to_string(),
        Some(patch_name) => format!("{} [Subconfig {}]", name, patch_name),
    }
}

/// Info text for a single configuration: heading, one line per field, one
/// line per child block group, then the description if requested.
pub fn config_info_string(config: &ConfigNode, add_description: bool, colorize: bool) -> String {
    let label = display_name(config);
    let mut info = if colorize {
        format!("{}\n", label.as_str().yellow().bold())
    } else {
        format!("{}\n", label)
    };

    for name in config
        .distinct_value_names()
        .filter(|name| !HIDDEN_INFO_KEYS.contains(name))
    {
        info.push_str(&format!("  {}: {}\n", name, config.get_values(name).join(", ")));
    }

    for tag in config
        .distinct_node_names()
        .filter(|tag| *tag != PATCH_NODE_TAG)
    {
        let count = config.get_nodes(tag).len();
        let plural = if count == 1 { "" } else { "s" };
        info.push_str(&format!("  {} ({} block{})\n", tag, count, plural));
    }

    if add_description {
        if let Some(description) = config.get_value(DESCRIPTION_KEY) {
            info.push_str(description);
            info.push('\n');
        }
    }

    info
}

/// Info text for `config` followed by one section per selectable patch.
///
/// Configurations without patches, and configurations that are already a
/// patch result, get only their own section.
pub fn describe<R: ConfigRegistry + ?Sized>(
    registry: &R,
    config: &ConfigNode,
    add_description: bool,
    colorize: bool,
) -> String {
    let mut info = config_info_string(config, add_description, colorize);

    let patches = patches_of(registry, config);
    if patches.is_empty() || is_patched(config) {
        return info;
    }

    if add_description {
        info.push('\n');
    }
    for patch in &patches {
        let patched = apply_patch(config, patch, false);
        info.push_str(&config_info_string(&patched, false, colorize));
    }
    info
}

impl<R: ConfigRegistry, H: ConfigHost> PatchableConfigs<R, H> {
    /// [`describe`] against this object's registry
    pub fn config_info(&self, config: &ConfigNode, add_description: bool, colorize: bool) -> String {
        describe(self.registry(), config, add_description, colorize)
    }
}
