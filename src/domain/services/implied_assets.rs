//! Implied asset aggregation
//!
//! Collects, per category, the ordered absolute paths of scripts and styles
//! that packages require to be present without importing them.

use std::path::{Path, PathBuf};

use crate::domain::entities::Package;
use crate::domain::value_objects::{path, ImpliedCategory, PackagePriorities};
use crate::error::{RepackError, RepackResult};

/// Output directory implied assets from dependencies are copied into
pub const IMPLIED_DIR: &str = "implied";

/// Aggregator over the active dependencies of one build
pub struct ImpliedAssets<'a> {
    packages: &'a [Package],
    priorities: &'a PackagePriorities,
    output_root: &'a Path,
    env_bootstrap: PathBuf,
}

impl<'a> ImpliedAssets<'a> {
    /// `env_bootstrap` is the absolute path of the runtime-environment file
    pub fn new(
        packages: &'a [Package],
        priorities: &'a PackagePriorities,
        output_root: &'a Path,
        env_bootstrap: PathBuf,
    ) -> Self {
        Self {
            packages,
            priorities,
            output_root,
            env_bootstrap,
        }
    }

    /// Packages in visit order: loader, framework runtime, then discovery order
    pub fn ordered_packages(&self) -> Vec<&'a Package> {
        let mut ordered: Vec<&Package> = self.packages.iter().collect();
        ordered.sort_by_key(|p| self.priorities.priority(p.name()));
        ordered
    }

    /// Ordered absolute paths for `category`
    ///
    /// `app_entries` are the app's own declarations, relative to the output
    /// root; they are appended after every dependency contribution.
    pub fn resolve(
        &self,
        category: ImpliedCategory,
        app_entries: &[String],
    ) -> RepackResult<Vec<PathBuf>> {
        let mut result = Vec::new();
        if category == ImpliedCategory::Scripts {
            result.push(self.env_bootstrap.clone());
        }

        for package in self.ordered_packages() {
            for entry in package.meta().implied(category) {
                let resolved = package.root().join(path::normalize(entry));
                if !resolved.is_file() {
                    return Err(RepackError::UnresolvedImpliedAsset {
                        package: package.name().to_string(),
                        specifier: entry.clone(),
                    });
                }
                result.push(resolved);
            }
        }

        for entry in app_entries {
            result.push(self.output_root.join(path::normalize(entry)));
        }
        Ok(result)
    }

    /// Output-relative path an aggregated file is served from
    ///
    /// Files already under the output root keep their place. Dependency files
    /// go under `implied/{package}/`.
    pub fn output_path(&self, resolved: &Path) -> Option<String> {
        if let Some(rel) = path::relative_to_root(self.output_root, resolved) {
            return Some(rel);
        }
        self.packages.iter().find_map(|package| {
            path::relative_to_root(package.root(), resolved)
                .map(|rel| format!("{IMPLIED_DIR}/{}/{rel}", package.name()))
        })
    }
}
