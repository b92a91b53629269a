//! Display filtering and ordering of configurations and patches

use std::collections::BTreeSet;

use config_node::ConfigNode;
use serde::{Deserialize, Serialize};

/// Field naming the tech node a configuration is unlocked by
pub const TECH_REQUIRED_KEY: &str = "techRequired";

/// Display ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep catalog order
    #[default]
    Declared,
    /// Stable sort by `name` field
    Name,
}

/// Visibility rules and ordering applied to displayed configurations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayFilter {
    /// Drop nodes whose `techRequired` is not in `unlocked_techs`
    pub hide_unavailable: bool,
    pub unlocked_techs: BTreeSet<String>,
    pub sort: SortOrder,
}

impl DisplayFilter {
    /// A node without `techRequired` is always available
    pub fn is_available(&self, node: &ConfigNode) -> bool {
        node.get_value(TECH_REQUIRED_KEY)
            .map_or(true, |tech| self.unlocked_techs.contains(tech))
    }

    /// Filter then order `configs`
    pub fn apply(&self, configs: Vec<ConfigNode>) -> Vec<ConfigNode> {
        let mut visible: Vec<ConfigNode> = if self.hide_unavailable {
            configs
                .into_iter()
                .filter(|node| self.is_available(node))
                .collect()
        } else {
            configs
        };

        if self.sort == SortOrder::Name {
            visible.sort_by(|a, b| a.name().unwrap_or("").cmp(b.name().unwrap_or("")));
        }
        visible
    }
}
