//! Patch resolution tests against the engine catalog fixture
//!
//! Covers override-by-name application, display labels and display
//! filtering of both configurations and patches.

mod fixtures;

use patchable_configs::{
    apply_patch, describe, display_name, find_patch, ConfigRegistry, DisplayFilter, LiveConfig,
    PatchableConfigs, Provenance, SortOrder, PATCH_NAME_KEY,
};

fn unlocked(techs: &[&str]) -> DisplayFilter {
    DisplayFilter {
        hide_unavailable: true,
        unlocked_techs: techs.iter().map(|t| t.to_string()).collect(),
        sort: SortOrder::Declared,
    }
}

// =============================================================================
// Application
// =============================================================================

#[test]
fn test_hypergolic_replaces_named_groups_only() {
    let catalog = fixtures::engines();
    let base = catalog.config_by_name("RF-Engine-1").unwrap();
    let patch = find_patch(&catalog, "RF-Engine-1", "Hypergolic").unwrap();

    let patched = apply_patch(base, &patch, false);

    assert_eq!(patched.name(), Some("RF-Engine-1"));
    assert_eq!(patched.get_values("propellant"), ["Aerozine50", "NTO"]);
    assert_eq!(patched.get_value(PATCH_NAME_KEY), Some("Hypergolic"));

    // Ignitor block replaced wholesale: ullage is gone
    let ignitors = patched.get_nodes("Ignitor");
    assert_eq!(ignitors.len(), 1);
    assert_eq!(ignitors[0].get_value("count"), Some("8"));
    assert!(!ignitors[0].has_value("ullage"));

    // Untouched names survive
    assert_eq!(patched.get_value("maxThrust"), Some("100"));
    assert_eq!(patched.get_value("minThrust"), Some("60"));
    assert_eq!(patched.get_node("Gimbal"), base.get_node("Gimbal"));
    assert_eq!(patched.get_value("description"), Some("Kerolox sustainer"));
}

#[test]
fn test_application_leaves_catalog_untouched() {
    let catalog = fixtures::engines();
    let before = catalog.config_by_name("RF-Engine-1").unwrap().clone();
    let patch = find_patch(&catalog, "RF-Engine-1", "HighThrust").unwrap();

    let _ = apply_patch(&before, &patch, false);
    let _ = apply_patch(&before, &patch, true);

    assert_eq!(catalog.config_by_name("RF-Engine-1").unwrap(), &before);
}

#[test]
fn test_same_patch_name_under_different_bases() {
    let catalog = fixtures::engines();

    let first = find_patch(&catalog, "RF-Engine-1", "HighThrust").unwrap();
    let second = find_patch(&catalog, "RF-Engine-2", "HighThrust").unwrap();

    assert_eq!(first.get_value("maxThrust"), Some("150"));
    assert_eq!(second.get_value("maxThrust"), Some("55"));
    assert!(find_patch(&catalog, "RF-Engine-3", "HighThrust").is_none());
    assert!(find_patch(&catalog, "RF-Engine-9", "HighThrust").is_none());
}

#[test]
fn test_dynamic_overlay_on_persistent_patch() {
    let mut resolver = PatchableConfigs::new(fixtures::engines(), LiveConfig::new());
    resolver.set_active_patch_name("HighThrust");
    resolver.set_configuration("RF-Engine-1", false).unwrap();

    resolver.apply_dynamic_patch(&fixtures::throttled()).unwrap();

    let live = resolver.host().current().unwrap();
    assert_eq!(live.name(), Some("RF-Engine-1"));
    assert_eq!(live.get_value("maxThrust"), Some("150"));
    assert_eq!(live.get_value("minThrust"), Some("20"));
    assert_eq!(Provenance::of(live), Provenance::Unpatched);
    assert!(!live.has_value(PATCH_NAME_KEY));

    // The persistent resolution is still derivable
    let persistent = resolver.non_dynamic_configuration().unwrap();
    assert_eq!(persistent.node.get_value("minThrust"), Some("60"));
    assert_eq!(persistent.provenance.patch_name(), Some("HighThrust"));
}

// =============================================================================
// Presentation
// =============================================================================

#[test]
fn test_labels() {
    let catalog = fixtures::engines();
    let e1 = catalog.config_by_name("RF-Engine-1").unwrap();
    let e2 = catalog.config_by_name("RF-Engine-2").unwrap();

    assert_eq!(display_name(e1), "RF-Engine-1");
    assert_eq!(display_name(e2), "Vacuum Sustainer");

    let patch = find_patch(&catalog, "RF-Engine-1", "Hypergolic").unwrap();
    assert_eq!(
        display_name(&apply_patch(e1, &patch, false)),
        "RF-Engine-1 [Subconfig Hypergolic]"
    );
    assert_eq!(display_name(&apply_patch(e1, &patch, true)), "RF-Engine-1");
}

#[test]
fn test_describe_lists_every_patch() {
    let catalog = fixtures::engines();
    let e1 = catalog.config_by_name("RF-Engine-1").unwrap();

    let info = describe(&catalog, e1, true, false);

    assert!(info.starts_with("RF-Engine-1\n"));
    assert!(info.contains("Kerolox sustainer\n"));
    let hyper = info.find("RF-Engine-1 [Subconfig Hypergolic]\n").unwrap();
    let high = info.find("RF-Engine-1 [Subconfig HighThrust]\n").unwrap();
    assert!(hyper < high);
    assert!(info[high..].contains("  maxThrust: 150\n"));
}

// =============================================================================
// Display filtering
// =============================================================================

#[test]
fn test_locked_configs_and_patches_are_hidden() {
    let catalog = fixtures::engines().with_filter(unlocked(&["start"]));
    let resolver = PatchableConfigs::new(catalog, LiveConfig::new());

    let selectors = resolver.selectors(&resolver.available_configs());
    let labels: Vec<_> = selectors.iter().map(|s| s.label.as_str()).collect();

    assert_eq!(
        labels,
        [
            "RF-Engine-1",
            "RF-Engine-1 [Subconfig Hypergolic]",
            "Vacuum Sustainer",
            "Vacuum Sustainer",
        ]
    );
    assert_eq!(selectors[3].patch_name.as_deref(), Some("HighThrust"));
}

#[test]
fn test_unlocking_reveals_everything() {
    let catalog = fixtures::engines().with_filter(unlocked(&["start", "heavyRocketry"]));
    let resolver = PatchableConfigs::new(catalog, LiveConfig::new());

    let selectors = resolver.selectors(&resolver.available_configs());
    assert_eq!(selectors.len(), 6);
}

#[test]
fn test_hidden_patch_is_treated_as_stale() {
    let catalog = fixtures::engines().with_filter(unlocked(&[]));
    let mut resolver = PatchableConfigs::new(catalog, LiveConfig::new());
    resolver.set_active_patch_name("HighThrust");

    resolver.set_configuration("RF-Engine-1", false).unwrap();

    assert_eq!(resolver.active_patch_name(), "");
    let live = resolver.host().current().unwrap();
    assert_eq!(live.get_value("maxThrust"), Some("100"));
}

#[test]
fn test_sort_by_name() {
    let filter = DisplayFilter {
        sort: SortOrder::Name,
        ..DisplayFilter::default()
    };
    let catalog = fixtures::engines().with_filter(filter);
    let e1 = catalog.config_by_name("RF-Engine-1").unwrap();

    let patches = catalog.filter_display_configs(e1.get_nodes("SUBCONFIG").to_vec());
    let names: Vec<_> = patches.iter().map(|p| p.name().unwrap()).collect();
    assert_eq!(names, ["HighThrust", "Hypergolic"]);
}
