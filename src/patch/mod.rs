//! Patch discovery and application
//!
//! A patch is a `SUBCONFIG` block nested under a base configuration. Applying
//! one replaces, by name, every field group and child block group it mentions;
//! nothing is merged inside a replaced block.

mod apply;
mod discovery;
mod resolved;

pub use apply::apply_patch;
pub use discovery::{find_patch, has_patches, is_patched, patches_of};
pub use resolved::{Provenance, ResolvedConfig};

/// Child tag marking a patch inside a base configuration
pub const PATCH_NODE_TAG: &str = "SUBCONFIG";

/// Field recording which patch persistently produced a resolved configuration
pub const PATCH_NAME_KEY: &str = "__patchName";
