//! Scenario: a plain app with no dependencies
//!
//! Journey: a developer points repack at an app with one HTML page, builds
//! it, edits it, and builds again.

use crate::common::*;

use repack::domain::value_objects::Anchor;
use repack::domain::ports::StageInputs;
use repack::RepackError;

/// SCENARIO: first build lays the app out as a package
#[test]
fn scenario_first_build_produces_complete_package() {
    let env = TestEnv::my_app();

    let report = env.build().unwrap();

    assert_eq!(report.assets, vec!["index.html", "assets/my-app.js"]);
    assert_eq!(report.namespace_size, 4);

    // Self-references become explicit relative paths
    assert_eq!(
        env.read("dist/components/greeting.js"),
        "import format from '../utils/format';\nimport layout from '../templates/greeting.hbs';\n"
    );

    let entry = env.read("dist/assets/my-app.js");
    assert!(entry.starts_with("// Generated by repack. Do not edit.\n"));
    assert!(entry.contains("d(\"my-app/components/greeting\""));
    assert!(entry.contains("d(\"my-app/templates/greeting\""));
    assert!(entry.contains("mainModule.create({\"modulePrefix\":\"my-app\"});"));

    let html = env.read("dist/index.html");
    let env_tag = position(&html, "<script src=\"/_runtime_env_.js\"></script>");
    let app_tag = position(&html, "<script src=\"/assets/my-app.js\"></script>");
    assert!(env_tag < app_tag);
    assert!(html.contains("<link rel=\"stylesheet\" href=\"/assets/my-app.css\">"));
    assert!(!html.contains("repack:app-script"));

    let pkg: serde_json::Value = serde_json::from_str(&env.read("dist/package.json")).unwrap();
    assert_eq!(pkg["name"], "my-app");
    assert_eq!(pkg["repack"]["type"], "app");
    assert_eq!(pkg["repack"]["root-url"], "/");
    assert_eq!(pkg["repack"]["assets"][1], "assets/my-app.js");
}

/// SCENARIO: a page without the app script anchor fails the build
#[test]
fn scenario_missing_anchor_fails_without_metadata() {
    let env = TestEnv::my_app();
    env.write(
        "pages/index.html",
        &PAGE.replace("<!-- repack:app-script -->\n", ""),
    );

    let err = env.build().unwrap_err();

    assert!(matches!(
        err,
        RepackError::MissingAnchor { anchor: Anchor::AppScript, ref document } if document == "index.html"
    ));
    assert!(!env.path("dist/package.json").exists());
}

/// SCENARIO: deleting a module and rebuilding drops it from the output
#[test]
fn scenario_rebuild_tracks_deletions() {
    let env = TestEnv::my_app();
    let mut builder = env.builder();
    builder.build(&StageInputs::new()).unwrap();
    assert!(env.path("dist/utils/format.js").is_file());

    std::fs::remove_file(env.path("app/utils/format.js")).unwrap();
    let report = builder.build(&StageInputs::new()).unwrap();

    assert_eq!(report.namespace_size, 3);
    assert!(!env.path("dist/utils/format.js").exists());
    assert!(!env.read("dist/assets/my-app.js").contains("my-app/utils/format"));
}

/// SCENARIO: extra assets and a custom root URL
#[test]
fn scenario_extra_assets_and_root_url() {
    let env = TestEnv::my_app();
    env.write("public/robots.txt", "User-agent: *\n");
    env.write(
        "repack.toml",
        &(CONFIG.replace("name = \"my-app\"", "name = \"my-app\"\nroot_url = \"/base/\"")
            + "\n[[assets]]\nkind = \"file\"\npath = \"robots.txt\"\nsource = \"public/robots.txt\"\n"),
    );

    let report = env.build().unwrap();

    assert!(report.assets.contains(&"robots.txt".to_string()));
    assert_eq!(env.read("dist/robots.txt"), "User-agent: *\n");
    assert!(env
        .read("dist/index.html")
        .contains("<script src=\"/base/assets/my-app.js\"></script>"));
}
