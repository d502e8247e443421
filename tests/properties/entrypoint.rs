//! Property tests for entrypoint generation.

use proptest::prelude::*;
use serde_json::json;

use repack::domain::entities::Namespace;
use repack::domain::services::{namespace_records, render_app_entrypoint, AppEntrypoint};
use repack::domain::value_objects::RuntimeBridge;

fn namespace_file() -> impl Strategy<Value = String> {
    (
        proptest::collection::vec("[a-z]{1,6}", 1..=3),
        prop_oneof![Just(".js"), Just(".hbs"), Just(".css")],
    )
        .prop_map(|(parts, ext)| format!("{}{}", parts.join("/"), ext))
}

fn render(files: &[String]) -> String {
    let mut namespace = Namespace::new();
    for file in files {
        namespace.insert(file.clone());
    }
    let bridge = RuntimeBridge::default();
    let config = json!({ "modulePrefix": "my-app" });
    let input = AppEntrypoint {
        module_prefix: "my-app",
        auto_run: true,
        main_module: "app",
        app_config: &config,
        bridge: &bridge,
    };
    render_app_entrypoint(&input, &namespace_records(&namespace, "my-app"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the entrypoint does not depend on discovery order.
    #[test]
    fn property_entrypoint_is_order_independent(
        files in proptest::collection::vec(namespace_file(), 0..=12),
    ) {
        let mut reversed = files.clone();
        reversed.reverse();
        prop_assert_eq!(render(&files), render(&reversed));
    }

    /// PROPERTY: runtime names are unique, sorted, and prefer scripts over templates.
    #[test]
    fn property_records_are_unique_and_scripts_win(
        files in proptest::collection::vec(namespace_file(), 0..=12),
    ) {
        let mut namespace = Namespace::new();
        for file in &files {
            namespace.insert(file.clone());
        }
        let records = namespace_records(&namespace, "my-app");

        for pair in records.windows(2) {
            prop_assert!(pair[0].runtime < pair[1].runtime);
        }
        for record in &records {
            let stem = record.runtime.trim_start_matches("my-app/");
            if namespace.contains(&format!("{stem}.js")) {
                prop_assert!(!record.buildtime.ends_with(".hbs"));
            }
        }
        let scripts_and_templates = files
            .iter()
            .filter(|f| !f.ends_with(".css") && !f.starts_with("tests/"))
            .map(|f| f.trim_end_matches(".js").trim_end_matches(".hbs").to_string())
            .collect::<std::collections::BTreeSet<_>>();
        prop_assert_eq!(records.len(), scripts_and_templates.len());
    }
}
