//! Package discovery from a flat dependency directory
//!
//! Each dependency lives at `{deps_dir}/{name}/package.json`. Its
//! `dependencies` are followed recursively; names with no directory are
//! plain runtime packages and are skipped.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::entities::{Package, PackageMeta};
use crate::error::{RepackError, RepackResult};

#[derive(Debug, Deserialize)]
struct PackageJson {
    name: String,
    #[serde(default)]
    dependencies: Map<String, Value>,
    /// Must match `META_KEY`
    #[serde(default)]
    repack: Option<PackageMeta>,
}

/// Loads packages and their dependency trees
#[derive(Debug)]
pub struct PackageLoader {
    deps_dir: PathBuf,
    loaded: HashMap<String, Package>,
    /// Manifest names of packages that carry the metadata key
    with_meta: HashSet<String>,
}

impl PackageLoader {
    pub fn new(deps_dir: impl Into<PathBuf>) -> Self {
        Self {
            deps_dir: deps_dir.into(),
            loaded: HashMap::new(),
            with_meta: HashSet::new(),
        }
    }

    /// Load the named packages with their dependency trees
    pub fn load(&mut self, names: &[String]) -> RepackResult<Vec<Package>> {
        let mut in_progress = HashMap::new();
        let mut out = Vec::new();
        for name in names {
            if let Some(pkg) = self.load_one(name, &mut in_progress)? {
                out.push(pkg);
            }
        }
        Ok(out)
    }

    /// Every loaded package that declares build metadata, in discovery order
    ///
    /// Each top-level package is followed by its descendants. A name seen
    /// twice keeps its first position.
    pub fn active(&self, packages: &[Package]) -> Vec<Package> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for top in packages {
            for pkg in std::iter::once(top).chain(top.descendants()) {
                if seen.insert(pkg.name()) && self.with_meta.contains(pkg.name()) {
                    out.push(pkg.clone());
                }
            }
        }
        out
    }

    /// `in_progress` holds the packages on the current path, without their
    /// dependencies; a cycle closes on that shallow copy.
    fn load_one(
        &mut self,
        dir_name: &str,
        in_progress: &mut HashMap<String, Package>,
    ) -> RepackResult<Option<Package>> {
        if let Some(cached) = self.loaded.get(dir_name) {
            return Ok(Some(cached.clone()));
        }
        if let Some(shallow) = in_progress.get(dir_name) {
            return Ok(Some(shallow.clone()));
        }
        let root = self.deps_dir.join(dir_name);
        let manifest = root.join("package.json");
        if !manifest.is_file() {
            return Ok(None);
        }

        let parsed = read_package_json(&manifest)?;
        if parsed.repack.is_some() {
            self.with_meta.insert(parsed.name.clone());
        }
        let shallow =
            Package::new(parsed.name, root).with_meta(parsed.repack.unwrap_or_default());
        in_progress.insert(dir_name.to_string(), shallow.clone());

        let mut dependencies = Vec::new();
        for dep in parsed.dependencies.keys() {
            if let Some(pkg) = self.load_one(dep, in_progress)? {
                dependencies.push(pkg);
            }
        }
        in_progress.remove(dir_name);

        let package = shallow.with_dependencies(dependencies);
        tracing::debug!(package = package.name(), "loaded package");
        self.loaded.insert(dir_name.to_string(), package.clone());
        Ok(Some(package))
    }
}

/// Dependency names declared in a `package.json`, in file order
pub fn declared_dependencies(manifest: &Path) -> RepackResult<Vec<String>> {
    let parsed = read_package_json(manifest)?;
    Ok(parsed.dependencies.into_iter().map(|(name, _)| name).collect())
}

fn read_package_json(path: &Path) -> RepackResult<PackageJson> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| RepackError::InvalidPackageMeta {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
