//! Selector entries for choosing a base configuration or one of its patches

use config_node::ConfigNode;
use serde::Serialize;

use super::display_name;
use crate::catalog::ConfigRegistry;
use crate::patch::{apply_patch, patches_of};
use crate::resolver::{ConfigHost, PatchableConfigs, ResolveError};

/// One choosable variant: a base configuration, or a base plus one patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    pub config_name: String,

    /// `None` for the unpatched base
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_name: Option<String>,

    pub label: String,

    /// Matches the current selection
    pub selected: bool,
}

impl Selector {
    /// Nesting level: patch variants sit one level under their base
    pub fn depth(&self) -> usize {
        usize::from(self.patch_name.is_some())
    }
}

impl<R: ConfigRegistry, H: ConfigHost> PatchableConfigs<R, H> {
    /// Base configurations offered for selection, after display filtering
    pub fn available_configs(&self) -> Vec<ConfigNode> {
        let registry = self.registry();
        registry.filter_display_configs(registry.configs().to_vec())
    }

    /// Selectors for `candidates`: each base followed by its patch variants.
    ///
    /// Patches without a name are skipped; selecting one would be
    /// indistinguishable from selecting the base.
    pub fn selectors(&self, candidates: &[ConfigNode]) -> Vec<Selector> {
        let mut selectors = Vec::new();

        for node in candidates {
            let config_name = node.name().unwrap_or_default();
            let is_current = config_name == self.configuration();

            selectors.push(Selector {
                config_name: config_name.to_string(),
                patch_name: None,
                label: display_name(node),
                selected: is_current && self.active_patch_name().is_empty(),
            });

            for patch in patches_of(self.registry(), node) {
                let Some(patch_name) = patch.name().filter(|name| !name.is_empty()) else {
                    log::debug!("skipping unnamed patch under '{}'", config_name);
                    continue;
                };
                let patched = apply_patch(node, &patch, false);
                selectors.push(Selector {
                    config_name: config_name.to_string(),
                    patch_name: Some(patch_name.to_string()),
                    label: display_name(&patched),
                    selected: is_current && patch_name == self.active_patch_name(),
                });
            }
        }

        selectors
    }

    /// Make `selector` the current selection and commit it
    pub fn select(&mut self, selector: &Selector) -> Result<(), ResolveError> {
        self.set_active_patch_name(selector.patch_name.clone().unwrap_or_default());
        self.set_configuration(&selector.config_name, true)
    }
}
