//! Entrypoint synthesis
//!
//! Generates the two modules every legacy app needs in the output package:
//!
//! - the application entrypoint, which statically imports every module of
//!   the namespace and defines it in the old runtime under its runtime name,
//!   then optionally boots the app;
//! - the test entrypoint, which eagerly imports every test file and defines
//!   the dependencies' implicit test modules.
//!
//! Output depends only on the namespace (already sorted), the module records
//! (in package order) and the runtime bridge, so it is byte-reproducible.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde_json::Value;

use crate::domain::entities::{ModuleRecord, Namespace, Package};
use crate::domain::value_objects::{path, RuntimeBridge};
use crate::error::{RepackError, RepackResult};

/// Directory (relative to the output root) entrypoints are written to
pub const ENTRY_DIR: &str = "assets";

/// Output path of the test entrypoint
pub const TEST_ENTRYPOINT: &str = "assets/test.js";

/// Namespace prefix holding test files
pub const TEST_PREFIX: &str = "tests/";

/// Suffix identifying a test file
pub const TEST_SUFFIX: &str = "-test.js";

/// Module imported after every test file, without extension
pub const TEST_BOOTSTRAP: &str = "tests/test-helper";

const SCRIPT_EXTENSION: &str = ".js";
const TEMPLATE_EXTENSION: &str = ".hbs";
const HEADER: &str = "// Generated by repack. Do not edit.";

/// Output path of the application entrypoint
pub fn app_entrypoint_path(module_prefix: &str) -> String {
    format!("{ENTRY_DIR}/{module_prefix}.js")
}

/// Inputs for the application entrypoint
#[derive(Debug, Clone)]
pub struct AppEntrypoint<'a> {
    pub module_prefix: &'a str,
    pub auto_run: bool,
    /// Main module, relative to the output root without extension
    pub main_module: &'a str,
    pub app_config: &'a Value,
    pub bridge: &'a RuntimeBridge,
}

/// Module records for every script or template of the namespace
///
/// Test files are excluded. When a script and a template share a runtime
/// name the script wins.
pub fn namespace_records(namespace: &Namespace, module_prefix: &str) -> Vec<ModuleRecord> {
    let mut by_runtime: BTreeMap<String, ModuleRecord> = BTreeMap::new();

    for file in namespace.iter() {
        if file.starts_with(TEST_PREFIX) {
            continue;
        }
        let (stem, buildtime_target) = if let Some(stem) = file.strip_suffix(SCRIPT_EXTENSION) {
            (stem, stem)
        } else if let Some(stem) = file.strip_suffix(TEMPLATE_EXTENSION) {
            (stem, file)
        } else {
            continue;
        };

        let runtime = format!("{module_prefix}/{stem}");
        let record = ModuleRecord::new(
            runtime.clone(),
            path::explicit_relative(ENTRY_DIR, buildtime_target),
        );
        let is_script = file.ends_with(SCRIPT_EXTENSION);
        match by_runtime.get(&runtime) {
            Some(_) if !is_script => {}
            _ => {
                by_runtime.insert(runtime, record);
            }
        }
    }

    by_runtime.into_values().collect()
}

/// Module records for the implicit (test) modules of active dependencies
///
/// Each declared name must resolve to a file inside its package.
pub fn implicit_module_records(
    packages: &[Package],
    tests: bool,
) -> RepackResult<Vec<ModuleRecord>> {
    let mut records = Vec::new();
    for package in packages {
        for declared in package.meta().implicit_modules(tests) {
            let name = path::normalize(declared);
            let exists = ["", SCRIPT_EXTENSION, TEMPLATE_EXTENSION]
                .iter()
                .any(|ext| package.root().join(format!("{name}{ext}")).is_file());
            if name.is_empty() || name.starts_with("..") || !exists {
                return Err(RepackError::UnresolvedImplicitModule {
                    package: package.name().to_string(),
                    specifier: declared.clone(),
                });
            }

            let specifier = format!(
                "{}/{}",
                package.name(),
                path::strip_extension(&name, SCRIPT_EXTENSION)
            );
            records.push(ModuleRecord::new(specifier.clone(), specifier));
        }
    }
    Ok(records)
}

/// Render the application entrypoint
pub fn render_app_entrypoint(input: &AppEntrypoint<'_>, records: &[ModuleRecord]) -> String {
    let bridge = input.bridge;
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "import * as m{i} from {};", js_string(&record.buildtime));
    }
    if input.auto_run {
        let main = path::explicit_relative(ENTRY_DIR, input.main_module);
        let _ = writeln!(out, "import mainModule from {};", js_string(&main));
    }
    out.push('\n');

    let _ = writeln!(out, "const w = {};", bridge.global);
    let _ = writeln!(out, "const d = w.{};", bridge.define);
    let _ = writeln!(out, "const r = w.{};", bridge.require);
    out.push_str("const own = {\n");
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "  {}: m{i},", js_string(&record.runtime));
    }
    out.push_str("};\n");
    let _ = writeln!(out, "w.{} = function (name) {{", bridge.lookup);
    out.push_str("  let m = Object.prototype.hasOwnProperty.call(own, name) ? own[name] : r(name);\n");
    out.push_str("  if (m && m.default !== undefined && !m.__esModule) {\n");
    out.push_str("    m = Object.assign({ __esModule: true }, m);\n");
    out.push_str("  }\n");
    out.push_str("  return m;\n");
    out.push_str("};\n");

    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "d({}, function () {{ return m{i}; }});",
            js_string(&record.runtime)
        );
    }

    if input.auto_run {
        let config = serde_json::to_string(input.app_config).unwrap_or_else(|_| "{}".into());
        let _ = writeln!(out, "mainModule.create({config});");
    }
    out
}

/// Test files of the namespace, in namespace order
pub fn test_files(namespace: &Namespace) -> Vec<&str> {
    namespace
        .iter()
        .filter(|f| f.starts_with(TEST_PREFIX) && f.ends_with(TEST_SUFFIX))
        .collect()
}

/// Render the test entrypoint
pub fn render_test_entrypoint(
    namespace: &Namespace,
    records: &[ModuleRecord],
    bridge: &RuntimeBridge,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    for file in test_files(namespace) {
        let specifier = path::explicit_relative(
            ENTRY_DIR,
            path::strip_extension(file, SCRIPT_EXTENSION),
        );
        let _ = writeln!(out, "import {};", js_string(&specifier));
    }
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "import * as t{i} from {};", js_string(&record.buildtime));
    }
    let bootstrap = path::explicit_relative(ENTRY_DIR, TEST_BOOTSTRAP);
    let _ = writeln!(out, "import {};", js_string(&bootstrap));
    out.push('\n');

    let _ = writeln!(out, "const w = {};", bridge.global);
    let _ = writeln!(out, "const d = w.{};", bridge.define);
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "d({}, function () {{ return t{i}; }});",
            js_string(&record.runtime)
        );
    }
    let _ = writeln!(out, "w.{}.TESTS_FILE_LOADED = true;", bridge.env_global);
    out
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}
