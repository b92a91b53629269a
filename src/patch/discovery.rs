//! Patch discovery

use config_node::ConfigNode;

use super::{PATCH_NAME_KEY, PATCH_NODE_TAG};
use crate::catalog::ConfigRegistry;

/// Patches owned by `config`, filtered and ordered for display
pub fn patches_of<R: ConfigRegistry + ?Sized>(registry: &R, config: &ConfigNode) -> Vec<ConfigNode> {
    registry.filter_display_configs(config.get_nodes(PATCH_NODE_TAG).to_vec())
}

pub fn has_patches<R: ConfigRegistry + ?Sized>(registry: &R, config: &ConfigNode) -> bool {
    !patches_of(registry, config).is_empty()
}

/// First patch named `patch_name` under the base configuration `config_name`.
///
/// `None` when the base configuration is unknown or owns no such patch.
pub fn find_patch<R: ConfigRegistry + ?Sized>(
    registry: &R,
    config_name: &str,
    patch_name: &str,
) -> Option<ConfigNode> {
    let config = registry.config_by_name(config_name)?;
    patches_of(registry, config)
        .into_iter()
        .find(|patch| patch.name() == Some(patch_name))
}

/// Whether `config` was persistently produced by a patch
pub fn is_patched(config: &ConfigNode) -> bool {
    config.has_value(PATCH_NAME_KEY)
}
