//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::{
    Anchor, ImpliedCategory, PackagePriorities, RuntimeBridge, TemplateCompilerParams,
    TransformConfig,
};
use crate::error::RepackResult;

use super::loader::{self, ConfigWarning};

/// Top-level `repack.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    /// Runtime environment settings written to the env bootstrap
    #[serde(default = "empty_object")]
    pub env: Value,

    #[serde(default)]
    pub implied: ImpliedConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub runtime: RuntimeBridge,

    #[serde(default)]
    pub priority: PackagePriorities,

    /// App-level package renames (old name → new name)
    #[serde(default)]
    pub rename: BTreeMap<String, String>,

    #[serde(default)]
    pub externals: Vec<String>,

    #[serde(default)]
    pub dependencies: DependenciesConfig,

    #[serde(default)]
    pub template_compiler: TemplateCompilerParams,

    #[serde(default)]
    pub transform: TransformConfig,

    #[serde(default)]
    pub documents: Vec<DocumentConfig>,

    #[serde(default)]
    pub assets: Vec<AssetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            env: empty_object(),
            implied: ImpliedConfig::default(),
            output: OutputConfig::default(),
            runtime: RuntimeBridge::default(),
            priority: PackagePriorities::default(),
            rename: BTreeMap::new(),
            externals: Vec::new(),
            dependencies: DependenciesConfig::default(),
            template_compiler: TemplateCompilerParams::default(),
            transform: TransformConfig::default(),
            documents: Vec::new(),
            assets: Vec::new(),
        }
    }
}

/// `[app]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Runtime module prefix; defaults to the app name
    #[serde(default)]
    pub module_prefix: Option<String>,

    /// Directory holding the app's own modules
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Output-relative directory self-referencing specifiers resolve into
    #[serde(default)]
    pub base_dir: String,

    /// Directory holding the app's `package.json`
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_root_url")]
    pub root_url: String,

    #[serde(default = "default_true")]
    pub auto_run: bool,

    #[serde(default = "default_main_module")]
    pub main_module: String,

    /// Output-relative path of the app stylesheet
    #[serde(default)]
    pub styles: Option<String>,

    /// Runtime configuration handed to the main module
    #[serde(default = "empty_object")]
    pub config: Value,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            module_prefix: None,
            source: default_source(),
            base_dir: String::new(),
            root: default_root(),
            root_url: default_root_url(),
            auto_run: true,
            main_module: default_main_module(),
            styles: None,
            config: empty_object(),
        }
    }
}

impl AppConfig {
    pub fn module_prefix(&self) -> &str {
        self.module_prefix.as_deref().unwrap_or(&self.name)
    }
}

/// `[implied]` - the app's own implied assets, relative to the output root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpliedConfig {
    pub scripts: Vec<String>,
    pub styles: Vec<String>,
    pub test_scripts: Vec<String>,
    pub test_styles: Vec<String>,
}

impl ImpliedConfig {
    pub fn get(&self, category: ImpliedCategory) -> &[String] {
        match category {
            ImpliedCategory::Scripts => &self.scripts,
            ImpliedCategory::Styles => &self.styles,
            ImpliedCategory::TestScripts => &self.test_scripts,
            ImpliedCategory::TestStyles => &self.test_styles,
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// `[dependencies]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependenciesConfig {
    /// Flat directory holding one folder per package
    #[serde(default = "default_deps_dir")]
    pub dir: PathBuf,

    /// Packages to load; when empty, the app's `package.json` dependencies
    #[serde(default)]
    pub names: Vec<String>,
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            dir: default_deps_dir(),
            names: Vec::new(),
        }
    }
}

/// `[[documents]]` - an HTML page with anchor markers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Output-relative path
    pub path: String,
    /// Source file, relative to the config file
    pub source: PathBuf,
    /// Whether test assets are inserted
    #[serde(default)]
    pub tests: bool,
    /// Marker text overrides, keyed by anchor name (`app-script`)
    #[serde(default)]
    pub markers: BTreeMap<String, String>,
}

impl DocumentConfig {
    /// Marker text for every anchor, overrides applied
    ///
    /// Unknown anchor names are returned separately.
    pub fn anchor_markers(&self) -> (BTreeMap<Anchor, String>, Vec<String>) {
        let mut markers: BTreeMap<Anchor, String> = Anchor::ALL
            .into_iter()
            .map(|a| (a, a.default_marker()))
            .collect();
        let mut unknown = Vec::new();
        for (name, marker) in &self.markers {
            match Anchor::ALL.into_iter().find(|a| a.name() == name) {
                Some(anchor) => {
                    markers.insert(anchor, marker.clone());
                }
                None => unknown.push(name.clone()),
            }
        }
        (markers, unknown)
    }
}

/// `[[assets]]` - an extra file to emit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AssetConfig {
    /// Copy a file verbatim
    File { path: String, source: PathBuf },
    /// Write literal content
    Inline { path: String, content: String },
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn default_app_name() -> String {
    "app".to_string()
}

fn default_source() -> PathBuf {
    PathBuf::from("app")
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_root_url() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_main_module() -> String {
    "app".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_deps_dir() -> PathBuf {
    PathBuf::from("node_modules")
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> RepackResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys)
    pub fn load_with_warnings(path: &Path) -> RepackResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load configuration, then apply `REPACK_*` environment overrides
    pub fn load_with_env(path: &Path) -> RepackResult<(Self, Vec<ConfigWarning>)> {
        let (config, warnings) = loader::load_with_warnings(path)?;
        Ok((loader::with_env_overrides(config), warnings))
    }
}
