//! Resolution orchestration
//!
//! [`PatchableConfigs`] owns one host object's selection state and turns it
//! into a committed configuration:
//!
//! ```text
//! set_configuration(name) ──► resolve_target(name) ──► host.set_configuration
//!                               │
//!                               ├─ no active patch ─► registry base
//!                               └─ active patch ────► apply_patch(base, patch)
//!
//! apply_dynamic_patch(p) ───► apply_patch(resolve_target(current), p, dynamic)
//! ```
//!
//! A dynamic overlay is dropped, and `PatchEvent::DynamicPatchReset`
//! published, on the next `set_configuration`.

mod events;
mod host;
mod selection;

pub use events::{EventBus, PatchEvent};
pub use host::{ConfigHost, LiveConfig};
pub use selection::{SelectionError, SelectionState};

use config_node::ConfigNode;

use crate::catalog::ConfigRegistry;
use crate::patch::{find_patch, ResolvedConfig};

/// Errors raised while resolving a selection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("No base configurations are available")]
    NoConfigurations,
}

/// A sibling host object whose selection mirrors another's
pub trait SymmetryCounterpart {
    fn set_active_patch_name(&mut self, patch_name: &str);

    /// Resolve and commit `configuration` using the sibling's own state
    fn apply_selection(&mut self, configuration: &str) -> Result<(), ResolveError>;
}

/// Patch-aware configuration selection for one host object
#[derive(Debug)]
pub struct PatchableConfigs<R: ConfigRegistry, H: ConfigHost> {
    registry: R,
    host: H,
    selection: SelectionState,
    events: EventBus,
}

impl<R: ConfigRegistry, H: ConfigHost> PatchableConfigs<R, H> {
    /// Create with the default selection (no configuration, no patch)
    pub fn new(registry: R, host: H) -> Self {
        Self::with_selection(registry, host, SelectionState::default())
    }

    /// Create with a previously persisted selection
    pub fn with_selection(registry: R, host: H, selection: SelectionState) -> Self {
        Self {
            registry,
            host,
            selection,
            events: EventBus::new(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn configuration(&self) -> &str {
        &self.selection.configuration
    }

    pub fn active_patch_name(&self) -> &str {
        &self.selection.active_patch_name
    }

    pub fn dynamic_patch_applied(&self) -> bool {
        self.selection.dynamic_patch_applied
    }

    /// Event bus for `PatchEvent` subscriptions
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Select a patch for the next resolution; empty clears it
    pub fn set_active_patch_name(&mut self, patch_name: impl Into<String>) {
        self.selection.active_patch_name = patch_name.into();
    }

    /// Resolve `config_name` against the current patch selection.
    ///
    /// An unknown `config_name` resolves to the default configuration, and the
    /// patch is looked up under that base. A selected patch the base does not
    /// own is cleared from the selection and the unpatched base is returned.
    pub fn resolve_target(&mut self, config_name: &str) -> Result<ResolvedConfig, ResolveError> {
        let base = self
            .registry
            .resolve_base(config_name)
            .cloned()
            .ok_or(ResolveError::NoConfigurations)?;
        let base_name = base.name().unwrap_or(config_name).to_string();

        if self.selection.active_patch_name.is_empty() {
            return Ok(ResolvedConfig::unpatched(base));
        }

        match find_patch(&self.registry, &base_name, &self.selection.active_patch_name) {
            Some(patch) => {
                log::debug!(
                    "resolving '{}' with patch '{}'",
                    base_name,
                    self.selection.active_patch_name
                );
                Ok(ResolvedConfig::patched(&base, &patch, false))
            }
            None => {
                log::warn!(
                    "patch '{}' not found under configuration '{}', falling back to the unpatched base",
                    self.selection.active_patch_name,
                    base_name
                );
                self.selection.active_patch_name.clear();
                Ok(ResolvedConfig::unpatched(base))
            }
        }
    }

    /// The current selection resolved without any dynamic overlay
    pub fn non_dynamic_configuration(&mut self) -> Result<ResolvedConfig, ResolveError> {
        let configuration = self.selection.configuration.clone();
        self.resolve_target(&configuration)
    }

    /// Commit `patch` as a dynamic overlay on the persistent resolution.
    ///
    /// Overlays never stack: the previous overlay, if any, is replaced.
    /// Tech-level state is left alone.
    pub fn apply_dynamic_patch(&mut self, patch: &ConfigNode) -> Result<(), ResolveError> {
        let persistent = self.non_dynamic_configuration()?;
        let overlay = ResolvedConfig::patched(&persistent.node, patch, true);

        log::debug!(
            "dynamic patch '{}' applied to '{}'",
            patch.name().unwrap_or_default(),
            self.selection.configuration
        );
        self.host.set_configuration(overlay.into_node(), false);
        self.selection.dynamic_patch_applied = true;
        Ok(())
    }

    /// Select `config_name`, resolve it and commit it to the host.
    ///
    /// Discards a live dynamic overlay and publishes exactly one
    /// [`PatchEvent::DynamicPatchReset`] when one was applied.
    pub fn set_configuration(
        &mut self,
        config_name: &str,
        reset_tech_levels: bool,
    ) -> Result<(), ResolveError> {
        let resolved = self.resolve_target(config_name)?;
        let committed = resolved.name().unwrap_or(config_name).to_string();

        self.host
            .set_configuration(resolved.into_node(), reset_tech_levels);
        self.selection.configuration = committed;

        if self.selection.dynamic_patch_applied {
            self.selection.dynamic_patch_applied = false;
            let notified = self.events.publish(&PatchEvent::DynamicPatchReset {
                configuration: self.selection.configuration.clone(),
            });
            log::debug!("dynamic patch reset, {} listener(s) notified", notified);
        }
        Ok(())
    }

    /// Mirror this selection onto symmetry counterparts.
    ///
    /// Each sibling receives the patch name before it resolves, since its
    /// resolution reads its own patch selection. Returns the number of
    /// siblings updated.
    pub fn propagate_to_counterparts(
        &self,
        counterparts: &mut [&mut dyn SymmetryCounterpart],
    ) -> Result<usize, ResolveError> {
        for counterpart in counterparts.iter_mut() {
            counterpart.set_active_patch_name(&self.selection.active_patch_name);
            counterpart.apply_selection(&self.selection.configuration)?;
        }
        Ok(counterparts.len())
    }
}

impl<R: ConfigRegistry, H: ConfigHost> SymmetryCounterpart for PatchableConfigs<R, H> {
    fn set_active_patch_name(&mut self, patch_name: &str) {
        self.selection.active_patch_name = patch_name.to_string();
    }

    fn apply_selection(&mut self, configuration: &str) -> Result<(), ResolveError> {
        self.set_configuration(configuration, false)
    }
}
