//! Property-based tests for name classification using proptest
//!
//! The classifier must be total and deterministic: any string terminates,
//! never panics, and always yields the same answer for the same input.

use azinv::classify::classify;
use proptest::prelude::*;

proptest! {
    /// Any input classifies without panicking.
    #[test]
    fn classify_is_total(name in ".*") {
        let _ = classify(&name);
    }

    /// Same input, same output.
    #[test]
    fn classify_is_deterministic(name in ".*") {
        prop_assert_eq!(classify(&name), classify(&name));
    }

    /// Classification ignores letter case.
    #[test]
    fn classify_ignores_case(name in "[a-zA-Z0-9_-]{0,40}") {
        prop_assert_eq!(classify(&name.to_uppercase()), classify(&name.to_lowercase()));
    }

    /// Unclassified names carry no owner or description.
    #[test]
    fn unclassified_names_are_empty(name in "[x-z]{1,20}") {
        let info = classify(&name);
        prop_assert!(!info.is_default);
        prop_assert_eq!(info.created_by, "");
        prop_assert_eq!(info.description, "");
    }

    /// Every DefaultResourceGroup-<region> name is attributed the same way.
    #[test]
    fn default_resource_group_prefix_always_matches(region in "[a-zA-Z0-9]{1,10}") {
        let info = classify(&format!("DefaultResourceGroup-{region}"));
        prop_assert!(info.is_default);
        prop_assert_eq!(info.created_by, "Azure CLI / Cloud Shell / Visual Studio");
    }
}

#[test]
fn classify_handles_pathological_inputs() {
    let long = "a".repeat(100_000);
    for name in ["", " ", "\u{0}", "名前-グループ", "mc___", long.as_str()] {
        let info = classify(name);
        assert_eq!(info, classify(name));
    }
}
