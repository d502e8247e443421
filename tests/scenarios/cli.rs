//! Scenario: driving repack from the command line

use crate::common::*;

/// SCENARIO: `repack build --json` reports the build as one JSON line
#[test]
fn scenario_cli_build_json() {
    let env = TestEnv::my_app();

    let result = env.run(&["build", "--json"]);

    assert!(result.success, "stderr:\n{}", result.stderr);
    let output: serde_json::Value = serde_json::from_str(result.stdout.trim()).unwrap();
    assert_eq!(output["event"], "build");
    assert_eq!(output["status"], "success");
    assert_eq!(output["report"]["assets"][0], "index.html");
    assert!(env.path("dist/assets/my-app.js").is_file());
}

/// SCENARIO: `--out` wins over the configured output directory
#[test]
fn scenario_cli_out_flag() {
    let env = TestEnv::my_app();

    let result = env.run(&["build", "--out", "public-out"]);

    assert!(result.success, "stderr:\n{}", result.stderr);
    assert!(result.stdout.contains("✓ Built"));
    assert!(env.path("public-out/index.html").is_file());
    assert!(!env.path("dist").exists());
}

/// SCENARIO: a typo in repack.toml is reported with a suggestion
#[test]
fn scenario_cli_warns_on_unknown_key() {
    let env = TestEnv::my_app();
    env.write("repack.toml", &CONFIG.replace("name = \"my-app\"", "name = \"my-app\"\nauto_rn = false"));

    let result = env.run(&["build"]);

    assert!(result.success, "stderr:\n{}", result.stderr);
    assert!(result.stderr.contains("unknown key 'app.auto_rn'"));
    assert!(result.stderr.contains("did you mean 'auto_run'?"));
}

/// SCENARIO: a missing config file is an error, not an empty build
#[test]
fn scenario_cli_missing_config_fails() {
    let env = TestEnv::new();

    let result = env.run(&["build"]);

    assert!(!result.success);
    assert!(result.stderr.contains("repack.toml"));
}
