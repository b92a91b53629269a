//! Tool settings merge system
//!
//! Implements the 4-layer settings merge:
//! 1. Built-in defaults
//! 2. Host/user settings (~/.config/patchcfg/settings.toml)
//! 3. Project settings (.patchcfg.toml)
//! 4. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{
    DescribeSettings, DisplaySettings, EffectiveSettings, SettingsError, SettingsOrigin,
    SettingsSource, Settings, PROJECT_SETTINGS_FILE,
};
pub use merge::{deep_merge, merge_layers};
