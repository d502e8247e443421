//! Scenario: an app with addon dependencies
//!
//! Journey: the app depends on the legacy loader and on addons that merge
//! modules into the app namespace, ship implied assets, rename packages,
//! and declare externals.

use serde_json::json;

use crate::common::*;

use repack::RepackError;

/// SCENARIO: the loader's implied script comes first, right after the env bootstrap
#[test]
fn scenario_loader_scripts_come_first() {
    let env = TestEnv::my_app();
    env.add_dependency(
        "addon-a",
        json!({ "implicit-scripts": ["vendor/a.js"] }),
        &[("vendor/a.js", "window.a = 1;\n")],
    );
    env.add_dependency(
        "loader.js",
        json!({ "implicit-scripts": ["dist/loader.js"] }),
        &[("dist/loader.js", "var define, require;\n")],
    );

    let report = env.build().unwrap();

    let html = env.read("dist/index.html");
    let env_tag = position(&html, "/_runtime_env_.js");
    let loader = position(&html, "/implied/loader.js/dist/loader.js");
    let addon = position(&html, "/implied/addon-a/vendor/a.js");
    let app = position(&html, "/assets/my-app.js");
    assert!(env_tag < loader && loader < addon && addon < app);

    assert_eq!(env.read("dist/implied/addon-a/vendor/a.js"), "window.a = 1;\n");
    assert!(report
        .assets
        .contains(&"implied/loader.js/dist/loader.js".to_string()));
}

/// SCENARIO: addon app trees merge into the namespace; the app wins conflicts
#[test]
fn scenario_addon_app_tree_merges_under_app() {
    let env = TestEnv::my_app();
    env.add_dependency(
        "widgets",
        json!({ "app-js": "_app_" }),
        &[
            ("_app_/components/widget.js", "export { default } from 'widgets/components/widget';\n"),
            ("_app_/components/greeting.js", "// addon greeting\n"),
            ("components/widget.js", "export default 1;\n"),
        ],
    );

    let report = env.build().unwrap();

    assert_eq!(report.namespace_size, 5);
    assert_eq!(
        env.read("dist/components/widget.js"),
        "export { default } from 'widgets/components/widget';\n"
    );
    assert!(env.read("dist/components/greeting.js").starts_with("import format"));
    assert!(env
        .read("dist/assets/my-app.js")
        .contains("d(\"my-app/components/widget\""));
}

/// SCENARIO: a dependency's package rename applies to app modules
#[test]
fn scenario_renamed_packages_are_rewritten() {
    let env = TestEnv::my_app();
    env.write("app/utils/legacy.js", "import thing from 'old-addon/thing';\n");
    env.add_dependency(
        "new-addon",
        json!({ "renamed-modules": { "old-addon": "new-addon" } }),
        &[],
    );

    env.build().unwrap();

    assert_eq!(
        env.read("dist/utils/legacy.js"),
        "import thing from 'new-addon/thing';\n"
    );
}

/// SCENARIO: implicit modules join the app entrypoint; missing ones fail
#[test]
fn scenario_implicit_modules() {
    let env = TestEnv::my_app();
    env.add_dependency(
        "setup-addon",
        json!({ "implicit-modules": ["./lib/setup"] }),
        &[("lib/setup.js", "export default 1;\n")],
    );

    env.build().unwrap();
    assert!(env
        .read("dist/assets/my-app.js")
        .contains("from \"setup-addon/lib/setup\";"));

    env.add_dependency(
        "broken-addon",
        json!({ "implicit-modules": ["lib/missing"] }),
        &[],
    );
    let err = env.build().unwrap_err();
    assert!(matches!(
        err,
        RepackError::UnresolvedImplicitModule { ref package, .. } if package == "broken-addon"
    ));
}

/// SCENARIO: an addon naming an undeclared active dependency as external
#[test]
fn scenario_undeclared_external_is_diagnosed() {
    let env = TestEnv::my_app();
    env.write(
        "repack.toml",
        &format!("externals = [\"@ember/owner\"]\n{CONFIG}"),
    );
    env.add_dependency("b", json!({}), &[]);
    env.add_dependency("c", json!({ "externals": ["b/utils"] }), &[]);

    let report = env.build().unwrap();

    assert_eq!(report.externals, vec!["@ember/owner", "b/utils"]);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].package, "c");

    let pkg: serde_json::Value = serde_json::from_str(&env.read("dist/package.json")).unwrap();
    assert_eq!(pkg["repack"]["externals"], json!(["@ember/owner", "b/utils"]));
}
