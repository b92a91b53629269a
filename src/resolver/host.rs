//! Committing resolved configurations to a host object

use config_node::ConfigNode;

/// Receiver of resolved configurations
pub trait ConfigHost {
    /// Make `config` the live configuration. `reset_tech_levels` asks the
    /// host to drop state derived from the previous configuration's tech level.
    fn set_configuration(&mut self, config: ConfigNode, reset_tech_levels: bool);
}

/// Host that keeps the live configuration in memory
#[derive(Debug, Clone, Default)]
pub struct LiveConfig {
    current: Option<ConfigNode>,
    commits: u32,
    tech_level_resets: u32,
}

impl LiveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently committed configuration
    pub fn current(&self) -> Option<&ConfigNode> {
        self.current.as_ref()
    }

    pub fn commits(&self) -> u32 {
        self.commits
    }

    pub fn tech_level_resets(&self) -> u32 {
        self.tech_level_resets
    }
}

impl ConfigHost for LiveConfig {
    fn set_configuration(&mut self, config: ConfigNode, reset_tech_levels: bool) {
        self.current = Some(config);
        self.commits += 1;
        if reset_tech_levels {
            self.tech_level_resets += 1;
        }
    }
}
