//! Build orchestrator
//!
//! One `build` call is one full pass:
//!
//! 1. update the namespace
//! 2. fetch the declared assets
//! 3. drain the asset queue (documents enqueue the entrypoints they need),
//!    after which every implied file the app declares must be in the output
//! 4. entrypoints are generated once per pass and shared between documents
//! 5. write the auxiliary artifacts
//! 6. compute externals and stamp `package.json`
//!
//! Any error aborts the pass. `package.json` is written last, so a failed
//! pass never leaves new metadata behind.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::application::auxiliary::{
    self, GeneratedFile, RUNTIME_ENV_FILE, TEMPLATE_COMPILER_FILE, TRANSFORM_CONFIG_FILE,
};
use crate::application::namespace::NamespaceTracker;
use crate::domain::entities::{Asset, DocumentAsset, Namespace, META_KEY};
use crate::domain::ports::{FileSystem, LegacyAdapter, StageInputs, TreeDiffer};
use crate::domain::services::{
    app_entrypoint_path, combine_externals, implicit_module_records, insert_assets,
    namespace_records, render_app_entrypoint, render_test_entrypoint, AppEntrypoint,
    ImpliedAssets, InsertionPlan, ModuleTransform, RewriteOptions, SpecifierRewriter,
    IMPLIED_DIR, TEST_ENTRYPOINT,
};
use crate::domain::value_objects::{path, Anchor, Diagnostic, ImpliedCategory};
use crate::error::{RepackError, RepackResult};

/// Version of the `repack` metadata block written to `package.json`
pub const FORMAT_VERSION: u32 = 2;

/// Outcome of one successful build pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    pub output_root: PathBuf,
    /// Number of files in the app namespace
    pub namespace_size: usize,
    /// Every asset written this pass, in emission order
    pub assets: Vec<String>,
    pub externals: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Owns the namespace tracker and drives build passes
pub struct AppBuilder {
    adapter: Box<dyn LegacyAdapter + Send + Sync>,
    fs: Arc<dyn FileSystem + Send + Sync>,
    tracker: NamespaceTracker,
    output_root: PathBuf,
}

impl AppBuilder {
    pub fn new(
        adapter: Box<dyn LegacyAdapter + Send + Sync>,
        fs: Arc<dyn FileSystem + Send + Sync>,
        differ: Box<dyn TreeDiffer + Send>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        let output_root = output_root.into();
        let tracker = NamespaceTracker::new(differ, Arc::clone(&fs), output_root.clone());
        Self {
            adapter,
            fs,
            tracker,
            output_root,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn adapter(&self) -> &dyn LegacyAdapter {
        self.adapter.as_ref()
    }

    /// Run one full build pass
    pub fn build(&mut self, inputs: &StageInputs) -> RepackResult<BuildReport> {
        let rewriter = self.rewriter();

        let app_source = self.adapter.app_source_dir(inputs);
        let namespace = self.tracker.update(
            self.adapter.package_name(),
            &app_source,
            self.adapter.active_dependencies(),
            &rewriter,
        )?;

        let declared = self.adapter.assets(inputs)?;
        let mut pass = Pass::new(self, &namespace, &rewriter)?;
        pass.drain(declared)?;
        let emitted = pass.finish();
        self.check_app_implied_assets()?;

        for file in self.auxiliary_files()? {
            self.fs.write(
                &self.output_root.join(&file.relative_path),
                file.content.as_bytes(),
            )?;
        }

        let packages = self.adapter.active_dependencies();
        let (externals, diagnostics) = combine_externals(packages, &self.adapter.externals());
        self.stamp_package_json(&emitted, &externals)?;

        tracing::info!(
            assets = emitted.len(),
            namespace = namespace.len(),
            externals = externals.len(),
            "build complete"
        );
        Ok(BuildReport {
            output_root: self.output_root.clone(),
            namespace_size: namespace.len(),
            assets: emitted,
            externals,
            diagnostics,
        })
    }

    fn rewriter(&self) -> SpecifierRewriter {
        let bridge = self.adapter.runtime_bridge();
        let mut options = RewriteOptions::new(self.adapter.package_name())
            .with_base_dir(self.adapter.module_base_dir())
            .with_renamed(self.renamed_modules());
        let loader = self.adapter.package_priorities().loader;
        if self
            .adapter
            .active_dependencies()
            .iter()
            .any(|p| p.name() == loader)
        {
            options = options.with_bootstrap_package(loader);
        }
        SpecifierRewriter::new(options, bridge)
    }

    /// App renames layered over every dependency's renames; the app wins
    fn renamed_modules(&self) -> BTreeMap<String, String> {
        let mut renamed = BTreeMap::new();
        for package in self.adapter.active_dependencies() {
            for (from, to) in &package.meta().renamed_modules {
                renamed.entry(from.clone()).or_insert_with(|| to.clone());
            }
        }
        renamed.extend(self.adapter.renamed_modules());
        renamed
    }

    /// The app's own implied entries name output files; by now they must exist
    fn check_app_implied_assets(&self) -> RepackResult<()> {
        for category in ImpliedCategory::ALL {
            for entry in self.adapter.implied_assets(category) {
                let target = self.output_root.join(path::normalize(&entry));
                if !self.fs.exists(&target) {
                    return Err(RepackError::UnresolvedImpliedAsset {
                        package: self.adapter.package_name().to_string(),
                        specifier: entry,
                    });
                }
            }
        }
        Ok(())
    }

    fn auxiliary_files(&self) -> RepackResult<Vec<GeneratedFile>> {
        let mut files = vec![auxiliary::template_compiler_shim(
            &self.adapter.template_compiler(),
        )?];
        files.extend(auxiliary::transform_config_module(
            &self.adapter.transform_config(),
            &self.output_root,
        )?);
        files.push(auxiliary::runtime_env_module(
            &self.adapter.runtime_bridge(),
            self.adapter.env_settings(),
        )?);
        Ok(files)
    }

    fn stamp_package_json(&self, assets: &[String], externals: &[String]) -> RepackResult<()> {
        let path = self.output_root.join("package.json");
        let mut pkg: Map<String, Value> = if self.fs.exists(&path) {
            let existing: Value = serde_json::from_slice(&self.fs.read(&path)?)?;
            match existing {
                Value::Object(map) => map,
                _ => {
                    return Err(RepackError::InvalidPackageMeta {
                        path,
                        message: "expected a JSON object".to_string(),
                    })
                }
            }
        } else {
            Map::new()
        };

        pkg.entry("name")
            .or_insert_with(|| Value::String(self.adapter.package_name().to_string()));
        pkg.insert(
            META_KEY.to_string(),
            json!({
                "version": FORMAT_VERSION,
                "type": "app",
                "externals": externals,
                "assets": assets,
                "template-compiler": TEMPLATE_COMPILER_FILE,
                "transform-config": TRANSFORM_CONFIG_FILE,
                "root-url": self.adapter.root_url(),
            }),
        );

        let mut text = serde_json::to_string_pretty(&Value::Object(pkg))?;
        text.push('\n');
        self.fs.write(&path, text.as_bytes())?;
        Ok(())
    }
}

/// State that lives for one build pass only
struct Pass<'b> {
    builder: &'b AppBuilder,
    namespace: &'b Namespace,
    rewriter: &'b SpecifierRewriter,
    /// Output-relative paths of implied files, per category
    implied: BTreeMap<ImpliedCategory, Vec<String>>,
    /// Implied dependency files that must be copied into the output
    implied_copies: Vec<(String, PathBuf)>,
    /// Generated assets keyed by relative path
    generated: BTreeMap<String, Asset>,
    queue: VecDeque<Asset>,
    written: BTreeSet<String>,
    emitted: Vec<String>,
}

impl<'b> Pass<'b> {
    fn new(
        builder: &'b AppBuilder,
        namespace: &'b Namespace,
        rewriter: &'b SpecifierRewriter,
    ) -> RepackResult<Self> {
        let adapter = builder.adapter();
        let priorities = adapter.package_priorities();
        let aggregator = ImpliedAssets::new(
            adapter.active_dependencies(),
            &priorities,
            &builder.output_root,
            builder.output_root.join(RUNTIME_ENV_FILE),
        );

        let mut implied = BTreeMap::new();
        let mut implied_copies = Vec::new();
        for category in ImpliedCategory::ALL {
            let mut urls = Vec::new();
            for resolved in aggregator.resolve(category, &adapter.implied_assets(category))? {
                let Some(rel) = aggregator.output_path(&resolved) else {
                    tracing::warn!(path = %resolved.display(), "implied asset has no output location");
                    continue;
                };
                if rel.starts_with(IMPLIED_DIR) {
                    implied_copies.push((rel.clone(), resolved));
                }
                urls.push(rel);
            }
            implied.insert(category, urls);
        }

        Ok(Self {
            builder,
            namespace,
            rewriter,
            implied,
            implied_copies,
            generated: BTreeMap::new(),
            queue: VecDeque::new(),
            written: BTreeSet::new(),
            emitted: Vec::new(),
        })
    }

    fn drain(&mut self, declared: Vec<Asset>) -> RepackResult<()> {
        self.queue.extend(declared);
        while let Some(asset) = self.queue.pop_front() {
            self.emit(asset)?;
        }
        Ok(())
    }

    fn finish(self) -> Vec<String> {
        self.emitted
    }

    fn emit(&mut self, asset: Asset) -> RepackResult<()> {
        let rel = asset.relative_path().to_string();
        if !self.written.insert(rel.clone()) {
            return Err(RepackError::DuplicateAsset { path: rel });
        }
        self.write(asset)?;
        tracing::debug!(asset = %rel, "emitted");
        self.emitted.push(rel);
        Ok(())
    }

    fn write(&mut self, asset: Asset) -> RepackResult<()> {
        let builder = self.builder;
        let fs = &builder.fs;

        match asset {
            Asset::OnDisk {
                relative_path,
                source,
            } => fs.copy(&source, &builder.output_root.join(relative_path))?,
            Asset::InMemory {
                relative_path,
                content,
            } => {
                let target = builder.output_root.join(&relative_path);
                let owner = builder.adapter().package_name();
                match std::str::from_utf8(&content) {
                    Ok(text) if self.rewriter.applies_to(&relative_path) => {
                        let out = self.rewriter.transform(owner, &relative_path, text);
                        fs.write(&target, out.as_bytes())?;
                    }
                    _ => fs.write(&target, &content)?,
                }
            }
            Asset::Document(document) => {
                let plan = self.plan_for(&document)?;
                let rendered = insert_assets(document, &plan)?;
                self.write(rendered)?;
            }
        }
        Ok(())
    }

    /// Insertion plan for a document, enqueueing whatever it references
    fn plan_for(&mut self, document: &DocumentAsset) -> RepackResult<InsertionPlan> {
        let builder = self.builder;
        let adapter = builder.adapter();
        let root_url = adapter.root_url().to_string();

        let app_entry = app_entrypoint_path(adapter.module_prefix());
        self.require_generated(&app_entry)?;
        for (rel, source) in self.implied_copies.clone() {
            if !self.generated.contains_key(&rel) {
                let copy = Asset::on_disk(rel.clone(), source);
                self.generated.insert(rel, copy.clone());
                self.queue.push_back(copy);
            }
        }

        let urls = |paths: &[String]| -> Vec<String> {
            paths.iter().map(|p| url(&root_url, p)).collect()
        };
        let mut plan = InsertionPlan::new()
            .with(Anchor::AppScript, vec![url(&root_url, &app_entry)])
            .with(Anchor::AppStyles, vec![url(&root_url, &adapter.app_styles())])
            .with(Anchor::ImpliedScripts, urls(&self.implied[&ImpliedCategory::Scripts]))
            .with(Anchor::ImpliedStyles, urls(&self.implied[&ImpliedCategory::Styles]));

        if document.include_tests {
            self.require_generated(TEST_ENTRYPOINT)?;
            plan = plan
                .with(Anchor::TestScript, vec![url(&root_url, TEST_ENTRYPOINT)])
                .with(
                    Anchor::ImpliedTestScripts,
                    urls(&self.implied[&ImpliedCategory::TestScripts]),
                )
                .with(
                    Anchor::ImpliedTestStyles,
                    urls(&self.implied[&ImpliedCategory::TestStyles]),
                );
        }
        Ok(plan)
    }

    /// Generate an entrypoint on first request; later requests reuse it
    fn require_generated(&mut self, rel: &str) -> RepackResult<()> {
        if self.generated.contains_key(rel) {
            return Ok(());
        }
        let builder = self.builder;
        let adapter = builder.adapter();
        let bridge = adapter.runtime_bridge();
        let packages = adapter.active_dependencies();

        let content = if rel == TEST_ENTRYPOINT {
            let records = implicit_module_records(packages, true)?;
            render_test_entrypoint(self.namespace, &records, &bridge)
        } else {
            let mut records = namespace_records(self.namespace, adapter.module_prefix());
            records.extend(implicit_module_records(packages, false)?);
            let input = AppEntrypoint {
                module_prefix: adapter.module_prefix(),
                auto_run: adapter.auto_run(),
                main_module: adapter.main_module(),
                app_config: adapter.main_module_config(),
                bridge: &bridge,
            };
            render_app_entrypoint(&input, &records)
        };

        let asset = Asset::in_memory(rel, content);
        self.generated.insert(rel.to_string(), asset.clone());
        self.queue.push_back(asset);
        Ok(())
    }
}

fn url(root_url: &str, relative_path: &str) -> String {
    format!(
        "{}/{}",
        root_url.trim_end_matches('/'),
        path::normalize(relative_path)
    )
}
