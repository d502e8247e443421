//! Property tests for posix path helpers.

use proptest::prelude::*;

use repack::domain::value_objects::path;

fn posix_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just(".".to_string()), Just("..".to_string()), "[a-z]{1,5}"], 0..=6)
        .prop_map(|parts| parts.join("/"))
}

fn clean_path() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{1,5}", 0..=5).prop_map(|parts| parts.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: normalizing twice is the same as normalizing once.
    #[test]
    fn property_normalize_is_idempotent(p in posix_path()) {
        let once = path::normalize(&p);
        prop_assert_eq!(path::normalize(&once), once);
    }

    /// PROPERTY: an explicit relative path always starts with a dot and resolves back.
    #[test]
    fn property_explicit_relative_resolves_back(from in clean_path(), to in clean_path()) {
        let rel = path::explicit_relative(&from, &to);
        prop_assert!(rel.starts_with('.'));
        prop_assert_eq!(path::join(&from, &rel), path::normalize(&to));
    }
}
