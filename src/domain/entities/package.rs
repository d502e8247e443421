//! Package entity - a node in the dependency graph
//!
//! Packages are discovered by the legacy adapter and stay immutable for the
//! duration of a build. Their build-relevant metadata lives under the
//! `repack` key of their `package.json`.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ImpliedCategory;

/// Key under which packages declare their metadata in `package.json`
pub const META_KEY: &str = "repack";

/// Build metadata declared by a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PackageMeta {
    pub implicit_scripts: Vec<String>,
    pub implicit_styles: Vec<String>,
    pub implicit_test_scripts: Vec<String>,
    pub implicit_test_styles: Vec<String>,

    /// Directory (relative to the package root) merged into the app namespace
    pub app_js: Option<String>,

    pub implicit_modules: Vec<String>,
    pub implicit_test_modules: Vec<String>,

    /// Old package name → new package name
    pub renamed_modules: BTreeMap<String, String>,

    /// Specifiers this package imports but does not ship
    pub externals: Vec<String>,
}

impl PackageMeta {
    /// Implied asset list for a category, verbatim
    pub fn implied(&self, category: ImpliedCategory) -> &[String] {
        match category {
            ImpliedCategory::Scripts => &self.implicit_scripts,
            ImpliedCategory::Styles => &self.implicit_styles,
            ImpliedCategory::TestScripts => &self.implicit_test_scripts,
            ImpliedCategory::TestStyles => &self.implicit_test_styles,
        }
    }

    /// Implicit module list for the runtime or test entrypoint
    pub fn implicit_modules(&self, tests: bool) -> &[String] {
        if tests {
            &self.implicit_test_modules
        } else {
            &self.implicit_modules
        }
    }
}

/// A dependency package
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    name: String,
    root: PathBuf,
    meta: PackageMeta,
    dependencies: Vec<Package>,
}

impl Package {
    /// Create a package with empty metadata
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            meta: PackageMeta::default(),
            dependencies: Vec::new(),
        }
    }

    /// Builder: set the metadata
    pub fn with_meta(mut self, meta: PackageMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Builder: set owned dependencies
    pub fn with_dependencies(mut self, dependencies: Vec<Package>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta(&self) -> &PackageMeta {
        &self.meta
    }

    pub fn dependencies(&self) -> &[Package] {
        &self.dependencies
    }

    /// Absolute path of the directory this package merges into the app namespace
    pub fn app_js_dir(&self) -> Option<PathBuf> {
        self.meta.app_js.as_ref().map(|dir| self.root.join(dir))
    }

    /// All transitive dependencies, depth-first, each name listed once
    pub fn descendants(&self) -> Vec<&Package> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        collect_descendants(self, &mut seen, &mut out);
        out
    }
}

fn collect_descendants<'a>(
    package: &'a Package,
    seen: &mut HashSet<&'a str>,
    out: &mut Vec<&'a Package>,
) {
    for dep in &package.dependencies {
        if seen.insert(dep.name()) {
            out.push(dep);
            collect_descendants(dep, seen, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_deserializes_kebab_case_keys() {
        let meta: PackageMeta = serde_json::from_str(
            r#"{
                "implicit-scripts": ["vendor/a.js"],
                "app-js": "_app_",
                "renamed-modules": { "old-name": "new-name" }
            }"#,
        )
        .unwrap();

        assert_eq!(meta.implied(ImpliedCategory::Scripts), ["vendor/a.js"]);
        assert!(meta.implied(ImpliedCategory::Styles).is_empty());
        assert_eq!(meta.app_js.as_deref(), Some("_app_"));
        assert_eq!(meta.renamed_modules["old-name"], "new-name");
    }

    #[test]
    fn descendants_are_deduplicated_depth_first() {
        let shared = Package::new("shared", "/deps/shared");
        let a = Package::new("a", "/deps/a").with_dependencies(vec![shared.clone()]);
        let b = Package::new("b", "/deps/b").with_dependencies(vec![shared]);
        let app = Package::new("app", "/app").with_dependencies(vec![a, b]);

        let names: Vec<_> = app.descendants().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "shared", "b"]);
    }

    #[test]
    fn app_js_dir_is_joined_to_root() {
        let pkg = Package::new("a", "/deps/a").with_meta(PackageMeta {
            app_js: Some("_app_".to_string()),
            ..Default::default()
        });
        assert_eq!(pkg.app_js_dir(), Some(PathBuf::from("/deps/a/_app_")));
    }
}
