//! Common test utilities for Repack scenario tests.
//!
//! `TestEnv` is an isolated project directory with helpers to lay out an
//! app, its dependencies and `repack.toml`, then build it either through
//! the library or through the CLI binary.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

use repack::application::BuildReport;
use repack::config::Config;
use repack::domain::ports::StageInputs;
use repack::error::RepackResult;
use repack::{AppBuilder, LocalFs, ManifestAdapter, SnapshotDiffer};

pub const CONFIG: &str = r#"
[app]
name = "my-app"

[app.config]
modulePrefix = "my-app"

[[documents]]
path = "index.html"
source = "pages/index.html"
"#;

pub const PAGE: &str = "<html>\n<head>\n<!-- repack:implied-styles -->\n<!-- repack:app-styles -->\n</head>\n<body>\n<!-- repack:implied-scripts -->\n<!-- repack:app-script -->\n</body>\n</html>\n";

/// Result of running the repack binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Isolated project directory
pub struct TestEnv {
    pub project_root: TempDir,
}

impl TestEnv {
    /// An empty project
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().unwrap(),
        }
    }

    /// A minimal `my-app` project with one document
    pub fn my_app() -> Self {
        let env = Self::new();
        env.write("repack.toml", CONFIG);
        env.write("package.json", r#"{"name":"my-app","dependencies":{}}"#);
        env.write("pages/index.html", PAGE);
        env.write("app/app.js", "export default class App {}\n");
        env.write(
            "app/components/greeting.js",
            "import format from 'my-app/utils/format';\nimport layout from 'my-app/templates/greeting';\n",
        );
        env.write("app/templates/greeting.hbs", "<p>{{this.name}}</p>\n");
        env.write("app/utils/format.js", "export default (s) => s;\n");
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
    }

    /// Add a dependency package and list it in the app's `package.json`
    pub fn add_dependency(&self, name: &str, meta: serde_json::Value, files: &[(&str, &str)]) {
        let manifest = serde_json::json!({ "name": name, "repack": meta });
        self.write(&format!("node_modules/{name}/package.json"), &manifest.to_string());
        for (rel, content) in files {
            self.write(&format!("node_modules/{name}/{rel}"), content);
        }

        let mut app: serde_json::Value = serde_json::from_str(&self.read("package.json")).unwrap();
        app["dependencies"][name] = serde_json::json!("*");
        self.write("package.json", &app.to_string());
    }

    /// Builder wired the way the CLI wires it
    pub fn builder(&self) -> AppBuilder {
        let config = Config::load(&self.path("repack.toml")).unwrap();
        let adapter = ManifestAdapter::from_config(config, self.project_root.path()).unwrap();
        let output_root = adapter.output_root();
        AppBuilder::new(
            Box::new(adapter),
            std::sync::Arc::new(LocalFs::new()),
            Box::new(SnapshotDiffer::new()),
            output_root,
        )
    }

    pub fn build(&self) -> RepackResult<BuildReport> {
        self.builder().build(&StageInputs::new())
    }

    /// Run the repack binary from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_repack"))
            .args(args)
            .current_dir(self.project_root.path())
            .env_remove("REPACK_OUTPUT_DIR")
            .env_remove("REPACK_ROOT_URL")
            .env_remove("REPACK_AUTO_RUN")
            .env_remove("RUST_LOG")
            .output()
            .unwrap();
        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Position of `needle` in `haystack`, failing the test when absent
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("expected to find {needle:?} in:\n{haystack}"))
}

