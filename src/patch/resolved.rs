//! Resolved configurations and their provenance

use config_node::ConfigNode;
use serde::{Deserialize, Serialize};

use super::{apply_patch, PATCH_NAME_KEY};

/// How a resolved configuration was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Base configuration as stored in the registry
    Unpatched,
    /// Base configuration with a selected patch applied
    Persistent { patch_name: String },
    /// Runtime overlay on top of the persistent resolution
    Dynamic,
}

impl Provenance {
    /// Provenance recorded on a node. A node alone cannot tell a dynamic
    /// overlay from an unpatched base; both read as `Unpatched`.
    pub fn of(node: &ConfigNode) -> Self {
        match node.get_value(PATCH_NAME_KEY) {
            Some(patch_name) => Provenance::Persistent {
                patch_name: patch_name.to_string(),
            },
            None => Provenance::Unpatched,
        }
    }

    /// Persistent patch name, if any
    pub fn patch_name(&self) -> Option<&str> {
        match self {
            Provenance::Persistent { patch_name } => Some(patch_name),
            Provenance::Unpatched | Provenance::Dynamic => None,
        }
    }
}

/// A configuration ready to be committed to a host object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub node: ConfigNode,
    pub provenance: Provenance,
}

impl ResolvedConfig {
    pub fn unpatched(node: ConfigNode) -> Self {
        Self {
            node,
            provenance: Provenance::Unpatched,
        }
    }

    /// Apply `patch` over `base`, tagging the provenance to match
    pub fn patched(base: &ConfigNode, patch: &ConfigNode, dynamic: bool) -> Self {
        let node = apply_patch(base, patch, dynamic);
        let provenance = if dynamic {
            Provenance::Dynamic
        } else {
            Provenance::Persistent {
                patch_name: patch.name().unwrap_or_default().to_string(),
            }
        };
        Self { node, provenance }
    }

    pub fn name(&self) -> Option<&str> {
        self.node.name()
    }

    pub fn into_node(self) -> ConfigNode {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ConfigNode {
        ConfigNode::new("CONFIG")
            .with_value("name", "E1")
            .with_value("thrust", "100")
    }

    fn patch() -> ConfigNode {
        ConfigNode::new("SUBCONFIG")
            .with_value("name", "HighThrust")
            .with_value("thrust", "150")
    }

    #[test]
    fn test_patched_provenance_matches_marker() {
        let persistent = ResolvedConfig::patched(&base(), &patch(), false);
        assert_eq!(persistent.provenance, Provenance::of(&persistent.node));
        assert_eq!(persistent.provenance.patch_name(), Some("HighThrust"));

        let dynamic = ResolvedConfig::patched(&base(), &patch(), true);
        assert_eq!(dynamic.provenance, Provenance::Dynamic);
        assert_eq!(Provenance::of(&dynamic.node), Provenance::Unpatched);
        assert_eq!(dynamic.provenance.patch_name(), None);
    }

    #[test]
    fn test_unpatched() {
        let resolved = ResolvedConfig::unpatched(base());
        assert_eq!(resolved.provenance, Provenance::Unpatched);
        assert_eq!(resolved.name(), Some("E1"));
        assert_eq!(resolved.into_node(), base());
    }

    #[test]
    fn test_provenance_serialization() {
        let json = serde_json::to_value(Provenance::Persistent {
            patch_name: "HighThrust".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "persistent");
        assert_eq!(json["patch_name"], "HighThrust");

        let json = serde_json::to_value(Provenance::Dynamic).unwrap();
        assert_eq!(json["kind"], "dynamic");
    }
}
