//! Override-by-name patch application

use config_node::{ConfigNode, NAME_KEY};

use super::PATCH_NAME_KEY;

/// Apply `patch` over `base`, returning the derived configuration.
///
/// Every field name and child tag present in `patch` is first stripped from a
/// copy of `base`, then the patch's entries are appended, so a patched block
/// is replaced wholesale. The result keeps `base`'s `name`. Unless `dynamic`,
/// the result is marked with the patch name under [`PATCH_NAME_KEY`]; dynamic
/// results never carry the marker.
///
/// Pure: neither input is modified and equal inputs give equal outputs.
pub fn apply_patch(base: &ConfigNode, patch: &ConfigNode, dynamic: bool) -> ConfigNode {
    let mut patched = base.clone();

    // Strip before append
    for name in patch.distinct_value_names() {
        patched.remove_values(name);
    }
    for tag in patch.distinct_node_names() {
        patched.remove_nodes(tag);
    }
    patch.copy_to(&mut patched);

    // Patches never rename the base
    patched.replace_values(NAME_KEY, base.get_values(NAME_KEY).to_vec());

    if dynamic {
        patched.remove_values(PATCH_NAME_KEY);
    } else {
        let patch_name = patch.name().unwrap_or_default().to_string();
        patched.replace_values(PATCH_NAME_KEY, vec![patch_name]);
    }

    patched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ConfigNode {
        ConfigNode::new("CONFIG")
            .with_value("name", "E1")
            .with_value("thrust", "100")
            .with_node(ConfigNode::new("Gimbal").with_value("range", "5"))
    }

    fn high_thrust() -> ConfigNode {
        ConfigNode::new("SUBCONFIG")
            .with_value("name", "HighThrust")
            .with_value("thrust", "150")
    }

    #[test]
    fn test_high_thrust_scenario() {
        let result = apply_patch(&base(), &high_thrust(), false);

        let expected = ConfigNode::new("CONFIG")
            .with_value("name", "E1")
            .with_value("thrust", "150")
            .with_node(ConfigNode::new("Gimbal").with_value("range", "5"))
            .with_value(PATCH_NAME_KEY, "HighThrust");
        assert_eq!(result, expected);
    }

    #[test]
    fn test_strip_before_append_with_fewer_entries() {
        let base = base()
            .with_value("propellant", "Kerosene")
            .with_value("propellant", "LqdOxygen")
            .with_node(ConfigNode::new("Gimbal").with_value("range", "3"));
        let patch = ConfigNode::new("SUBCONFIG")
            .with_value("name", "Hypergolic")
            .with_value("propellant", "Aerozine50")
            .with_node(ConfigNode::new("Gimbal").with_value("range", "1"));

        let result = apply_patch(&base, &patch, false);

        assert_eq!(result.get_values("propellant"), ["Aerozine50"]);
        let gimbals = result.get_nodes("Gimbal");
        assert_eq!(gimbals.len(), 1);
        assert_eq!(gimbals[0].get_value("range"), Some("1"));
    }

    #[test]
    fn test_replaced_block_is_not_merged() {
        let base = base().with_node(
            ConfigNode::new("Ignitor")
                .with_value("count", "2")
                .with_value("ullage", "true"),
        );
        let patch = ConfigNode::new("SUBCONFIG")
            .with_value("name", "Restartable")
            .with_node(ConfigNode::new("Ignitor").with_value("count", "8"));

        let result = apply_patch(&base, &patch, false);
        let ignitor = result.get_node("Ignitor").unwrap();

        assert_eq!(ignitor.get_value("count"), Some("8"));
        assert!(!ignitor.has_value("ullage"));
    }

    #[test]
    fn test_untouched_names_preserved() {
        let base = base().with_value("isp", "310");
        let result = apply_patch(&base, &high_thrust(), true);

        assert_eq!(result.get_values("isp"), base.get_values("isp"));
        assert_eq!(result.get_nodes("Gimbal"), base.get_nodes("Gimbal"));
    }

    #[test]
    fn test_name_preserved_for_both_modes() {
        for dynamic in [false, true] {
            let result = apply_patch(&base(), &high_thrust(), dynamic);
            assert_eq!(result.name(), Some("E1"));
            assert_eq!(result.get_values("name").len(), 1);
        }
    }

    #[test]
    fn test_unnamed_base_stays_unnamed() {
        let base = ConfigNode::new("CONFIG").with_value("thrust", "1");
        let result = apply_patch(&base, &high_thrust(), false);
        assert!(!result.has_value("name"));
    }

    #[test]
    fn test_marker_correctness() {
        let persistent = apply_patch(&base(), &high_thrust(), false);
        assert_eq!(persistent.get_value(PATCH_NAME_KEY), Some("HighThrust"));

        let dynamic = apply_patch(&base(), &high_thrust(), true);
        assert!(!dynamic.has_value(PATCH_NAME_KEY));
    }

    #[test]
    fn test_dynamic_over_persistent_drops_marker() {
        let persistent = apply_patch(&base(), &high_thrust(), false);
        let throttled = ConfigNode::new("SUBCONFIG")
            .with_value("name", "Throttled")
            .with_value("minThrust", "40");

        let dynamic = apply_patch(&persistent, &throttled, true);

        assert!(!dynamic.has_value(PATCH_NAME_KEY));
        assert_eq!(dynamic.get_value("thrust"), Some("150"));
        assert_eq!(dynamic.get_value("minThrust"), Some("40"));
    }

    #[test]
    fn test_repeated_persistent_application_keeps_single_marker() {
        let first = apply_patch(&base(), &high_thrust(), false);
        let other = ConfigNode::new("SUBCONFIG").with_value("name", "Other");
        let second = apply_patch(&first, &other, false);

        assert_eq!(second.get_values(PATCH_NAME_KEY), ["Other"]);
    }

    #[test]
    fn test_idempotent_rederivation() {
        let a = apply_patch(&base(), &high_thrust(), false);
        let b = apply_patch(&base(), &high_thrust(), false);
        assert_eq!(a, b);
    }

    #[test]
    fn test_inputs_untouched() {
        let base = base();
        let patch = high_thrust();
        let (base_before, patch_before) = (base.clone(), patch.clone());

        let _ = apply_patch(&base, &patch, false);

        assert_eq!(base, base_before);
        assert_eq!(patch, patch_before);
    }

    #[test]
    fn test_malformed_patch_is_accepted() {
        let empty = ConfigNode::new("SUBCONFIG");
        let result = apply_patch(&base(), &empty, false);

        assert_eq!(result.get_value(PATCH_NAME_KEY), Some(""));
        assert_eq!(result.get_value("thrust"), Some("100"));

        let dynamic = apply_patch(&base(), &empty, true);
        assert_eq!(dynamic, base());
    }
}
