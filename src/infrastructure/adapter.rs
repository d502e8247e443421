//! Manifest adapter - a `LegacyAdapter` driven by `repack.toml`
//!
//! Everything the build asks of the legacy app comes straight from the
//! configuration, with dependencies discovered by `PackageLoader`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::{AssetConfig, Config};
use crate::domain::entities::{Asset, DocumentAsset, HtmlDocument, Package};
use crate::domain::ports::{LegacyAdapter, StageInputs};
use crate::domain::value_objects::{
    ImpliedCategory, PackagePriorities, RuntimeBridge, TemplateCompilerParams, TransformConfig,
};
use crate::error::RepackResult;
use crate::infrastructure::packages::{declared_dependencies, PackageLoader};

/// Stage input naming the app source directory
pub const APP_INPUT: &str = "app";

/// `LegacyAdapter` backed by a loaded configuration
#[derive(Debug, Clone)]
pub struct ManifestAdapter {
    config: Config,
    base: PathBuf,
    packages: Vec<Package>,
}

impl ManifestAdapter {
    /// Resolve dependencies and build the adapter
    ///
    /// `base` is the directory relative config paths are resolved against.
    pub fn from_config(config: Config, base: impl Into<PathBuf>) -> RepackResult<Self> {
        let base = base.into();
        let names = if config.dependencies.names.is_empty() {
            let manifest = base.join(&config.app.root).join("package.json");
            if manifest.is_file() {
                declared_dependencies(&manifest)?
            } else {
                Vec::new()
            }
        } else {
            config.dependencies.names.clone()
        };

        let mut loader = PackageLoader::new(base.join(&config.dependencies.dir));
        let top = loader.load(&names)?;
        let packages = loader.active(&top);
        tracing::debug!(active = packages.len(), "resolved dependencies");

        Ok(Self {
            config,
            base,
            packages,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute output directory
    pub fn output_root(&self) -> PathBuf {
        self.base.join(&self.config.output.dir)
    }

    /// Absolute app source directory from the configuration
    pub fn configured_app_source(&self) -> PathBuf {
        self.base.join(&self.config.app.source)
    }

    /// Directories whose changes should trigger a rebuild
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.configured_app_source()];
        roots.extend(self.packages.iter().filter_map(Package::app_js_dir));
        for doc in &self.config.documents {
            if let Some(parent) = self.resolve(&doc.source).parent() {
                roots.push(parent.to_path_buf());
            }
        }
        roots.sort();
        roots.dedup();
        roots
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base.join(path)
    }
}

impl LegacyAdapter for ManifestAdapter {
    fn package_name(&self) -> &str {
        &self.config.app.name
    }

    fn app_source_dir(&self, inputs: &StageInputs) -> PathBuf {
        inputs
            .get(APP_INPUT)
            .cloned()
            .unwrap_or_else(|| self.configured_app_source())
    }

    fn assets(&self, _inputs: &StageInputs) -> RepackResult<Vec<Asset>> {
        let mut assets = Vec::new();
        for doc in &self.config.documents {
            let (markers, unknown) = doc.anchor_markers();
            for name in unknown {
                tracing::warn!(document = %doc.path, anchor = %name, "unknown anchor name in markers");
            }
            let source = std::fs::read_to_string(self.resolve(&doc.source))?;
            let document = HtmlDocument::parse(&source, &markers);
            assets.push(Asset::Document(
                DocumentAsset::new(doc.path.clone(), document).with_tests(doc.tests),
            ));
        }

        for asset in &self.config.assets {
            assets.push(match asset {
                AssetConfig::File { path, source } => Asset::on_disk(path.clone(), self.resolve(source)),
                AssetConfig::Inline { path, content } => {
                    Asset::in_memory(path.clone(), content.as_bytes())
                }
            });
        }
        Ok(assets)
    }

    fn active_dependencies(&self) -> &[Package] {
        &self.packages
    }

    fn module_prefix(&self) -> &str {
        self.config.app.module_prefix()
    }

    fn auto_run(&self) -> bool {
        self.config.app.auto_run
    }

    fn main_module(&self) -> &str {
        &self.config.app.main_module
    }

    fn main_module_config(&self) -> &Value {
        &self.config.app.config
    }

    fn root_url(&self) -> &str {
        &self.config.app.root_url
    }

    fn app_styles(&self) -> String {
        self.config
            .app
            .styles
            .clone()
            .unwrap_or_else(|| format!("assets/{}.css", self.module_prefix()))
    }

    fn implied_assets(&self, category: ImpliedCategory) -> Vec<String> {
        self.config.implied.get(category).to_vec()
    }

    fn env_settings(&self) -> &Value {
        &self.config.env
    }

    fn transform_config(&self) -> TransformConfig {
        self.config.transform.clone()
    }

    fn template_compiler(&self) -> TemplateCompilerParams {
        self.config.template_compiler.clone()
    }

    fn externals(&self) -> BTreeSet<String> {
        self.config.externals.iter().cloned().collect()
    }

    fn module_base_dir(&self) -> String {
        self.config.app.base_dir.clone()
    }

    fn renamed_modules(&self) -> BTreeMap<String, String> {
        self.config.rename.clone()
    }

    fn runtime_bridge(&self) -> RuntimeBridge {
        self.config.runtime.clone()
    }

    fn package_priorities(&self) -> PackagePriorities {
        self.config.priority.clone()
    }
}
