//! Patchable configurations CLI
//!
//! Entry point for the `patchcfg` command-line tool.

use clap::{Parser, Subcommand};
use colored::Colorize;
use patchable_configs::{
    describe, display_name, Catalog, ConfigNode, ConfigRegistry, EffectiveSettings, LiveConfig,
    PatchableConfigs, Provenance, SelectionState, PATCH_NODE_TAG,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "patchcfg")]
#[command(about = "Resolve base configurations and their patches", version)]
struct Cli {
    /// Catalog file (overrides the `catalog` setting)
    #[arg(long, short = 'c', global = true)]
    catalog: Option<PathBuf>,

    /// Host settings file (default: ~/.config/patchcfg/settings.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Colorize configuration names
    #[arg(long, global = true)]
    color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List selectable configurations and their patches
    List {
        /// Selection state file used to mark the current choice
        #[arg(long, short = 's')]
        state: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration for a selection
    Resolve {
        /// Base configuration name
        #[arg(long)]
        config: String,

        /// Patch to apply
        #[arg(long, short = 'p')]
        patch: Option<String>,

        /// TOML file holding a dynamic patch to layer on top
        #[arg(long)]
        dynamic: Option<PathBuf>,

        /// Output as a config block instead of JSON
        #[arg(long)]
        human: bool,
    },

    /// Describe a configuration and each of its patch variants
    Describe {
        /// Base configuration name
        #[arg(long)]
        config: String,

        /// Leave out the description text
        #[arg(long)]
        no_description: bool,
    },

    /// Select a configuration (and patch) and persist the selection
    Select {
        /// Selection state file
        #[arg(long, short = 's')]
        state: PathBuf,

        /// Base configuration name
        #[arg(long)]
        config: String,

        /// Patch to select; omit for the unpatched base
        #[arg(long, short = 'p')]
        patch: Option<String>,
    },

    /// Validate the catalog
    Verify,

    /// Print the effective settings with provenance
    Settings,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let settings = load_settings(&cli);

    match cli.command {
        Commands::List { state, json } => {
            run_list(&settings, state, json);
        }
        Commands::Resolve {
            config,
            patch,
            dynamic,
            human,
        } => {
            run_resolve(&settings, &config, patch, dynamic, human);
        }
        Commands::Describe {
            config,
            no_description,
        } => {
            run_describe(&settings, &config, no_description);
        }
        Commands::Select {
            state,
            config,
            patch,
        } => {
            run_select(&settings, &state, &config, patch);
        }
        Commands::Verify => {
            run_verify(&settings);
        }
        Commands::Settings => match settings.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        },
    }
}

fn load_settings(cli: &Cli) -> EffectiveSettings {
    let mut overrides = serde_json::Map::new();
    if let Some(ref catalog) = cli.catalog {
        overrides.insert(
            "catalog".to_string(),
            serde_json::Value::String(catalog.to_string_lossy().to_string()),
        );
    }
    if cli.color {
        overrides.insert("describe".to_string(), serde_json::json!({"color": true}));
    }
    let overrides = (!overrides.is_empty()).then(|| serde_json::Value::Object(overrides));

    match EffectiveSettings::build_default(cli.settings.as_deref(), overrides) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    }
}

fn load_catalog(settings: &EffectiveSettings) -> Catalog {
    let Some(ref path) = settings.settings.catalog else {
        eprintln!("No catalog configured. Pass --catalog or set `catalog` in settings.");
        process::exit(1);
    };

    match Catalog::load(Path::new(path)) {
        Ok(catalog) => catalog.with_filter(settings.settings.display_filter()),
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            process::exit(1);
        }
    }
}

fn load_state(path: &Path) -> SelectionState {
    if !path.exists() {
        return SelectionState::default();
    }
    match SelectionState::from_file(path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error loading selection state: {}", e);
            process::exit(1);
        }
    }
}

fn run_list(settings: &EffectiveSettings, state_path: Option<PathBuf>, json_output: bool) {
    let catalog = load_catalog(settings);
    let selection = state_path
        .as_deref()
        .map(load_state)
        .unwrap_or_default();
    let resolver = PatchableConfigs::with_selection(catalog, LiveConfig::new(), selection);

    let selectors = resolver.selectors(&resolver.available_configs());

    if json_output {
        match serde_json::to_string_pretty(&selectors) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if selectors.is_empty() {
        println!("No configurations available.");
        return;
    }

    let color = settings.settings.describe.color;
    for selector in selectors {
        let indent = "    ".repeat(selector.depth() + 1);
        let mark = if selector.selected { "*" } else { " " };
        if color && selector.selected {
            println!("{}{} {}", indent, mark, selector.label.as_str().green().bold());
        } else {
            println!("{}{} {}", indent, mark, selector.label);
        }
    }
}

fn run_resolve(
    settings: &EffectiveSettings,
    config_name: &str,
    patch: Option<String>,
    dynamic: Option<PathBuf>,
    human: bool,
) {
    let catalog = load_catalog(settings);
    let mut resolver = PatchableConfigs::new(catalog, LiveConfig::new());

    if let Some(ref patch_name) = patch {
        resolver.set_active_patch_name(patch_name.as_str());
    }
    if let Err(e) = resolver.set_configuration(config_name, false) {
        eprintln!("Error resolving configuration: {}", e);
        process::exit(1);
    }
    if let Some(ref patch_name) = patch {
        if resolver.active_patch_name().is_empty() {
            eprintln!(
                "Warning: patch '{}' not found under '{}'; using the unpatched configuration",
                patch_name,
                resolver.configuration()
            );
        }
    }

    if let Some(ref path) = dynamic {
        let overlay = match load_patch_file(path) {
            Ok(node) => node,
            Err(e) => {
                eprintln!("Error loading dynamic patch: {}", e);
                process::exit(1);
            }
        };
        if let Err(e) = resolver.apply_dynamic_patch(&overlay) {
            eprintln!("Error applying dynamic patch: {}", e);
            process::exit(1);
        }
    }

    let Some(live) = resolver.host().current() else {
        eprintln!("Nothing was committed");
        process::exit(1);
    };

    if human {
        print!("{}", live);
        return;
    }

    let provenance = if resolver.dynamic_patch_applied() {
        Provenance::Dynamic
    } else {
        Provenance::of(live)
    };
    let output = serde_json::json!({
        "configuration": resolver.configuration(),
        "display_name": display_name(live),
        "provenance": provenance,
        "node": live,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

/// Read a single patch block from a TOML file
fn load_patch_file(path: &Path) -> Result<ConfigNode, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let table: toml::Table = toml::from_str(&content).map_err(|e| e.to_string())?;
    ConfigNode::from_toml_table(PATCH_NODE_TAG, &table).map_err(|e| e.to_string())
}

fn run_describe(settings: &EffectiveSettings, config_name: &str, no_description: bool) {
    let catalog = load_catalog(settings);

    let config = match catalog.config_by_name(config_name) {
        Some(config) => config,
        None => {
            eprintln!("Configuration '{}' not found in catalog.", config_name);
            eprintln!("Available configurations: {}", catalog.names().join(", "));
            process::exit(1);
        }
    };

    let add_description = settings.settings.describe.include_description && !no_description;
    print!(
        "{}",
        describe(&catalog, config, add_description, settings.settings.describe.color)
    );
}

fn run_select(
    settings: &EffectiveSettings,
    state_path: &Path,
    config_name: &str,
    patch: Option<String>,
) {
    let catalog = load_catalog(settings);
    let selection = load_state(state_path);
    let mut resolver = PatchableConfigs::with_selection(catalog, LiveConfig::new(), selection);

    resolver.set_active_patch_name(patch.clone().unwrap_or_default());
    if let Err(e) = resolver.set_configuration(config_name, true) {
        eprintln!("Error resolving configuration: {}", e);
        process::exit(1);
    }
    if patch.is_some() && resolver.active_patch_name().is_empty() {
        eprintln!(
            "Warning: patch '{}' not found under '{}'; selected the unpatched configuration",
            patch.unwrap_or_default(),
            resolver.configuration()
        );
    }

    if let Err(e) = resolver.selection().write_to_file(state_path) {
        eprintln!("Error writing selection state: {}", e);
        process::exit(1);
    }

    if let Some(live) = resolver.host().current() {
        println!("Selected: {}", display_name(live));
    }
}

fn run_verify(settings: &EffectiveSettings) {
    let catalog = load_catalog(settings);

    println!("Catalog valid: {} configuration(s)", catalog.len());
    if let Some(source) = catalog.source() {
        println!("  Path: {}", source.path.display());
        println!("  SHA-256: {}", source.digest);
    }
    println!();

    for config in catalog.configs() {
        let patches = config.get_nodes(PATCH_NODE_TAG);
        let available = if catalog.filter().is_available(config) {
            ""
        } else {
            " (locked)"
        };
        println!("  {}{}", display_name(config), available);
        if !patches.is_empty() {
            let names: Vec<&str> = patches.iter().map(|p| p.name().unwrap_or("(unnamed)")).collect();
            println!("    Patches: {}", names.join(", "));
        }
    }
}
