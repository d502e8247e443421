//! LegacyAdapter port - everything the build needs to know about the legacy app
//!
//! Locating the legacy application's trees and metadata is the adapter's job.
//! The build orchestrator only decides how to lay the result out.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde_json::Value;

use crate::domain::entities::{Asset, Package};
use crate::domain::value_objects::{
    ImpliedCategory, PackagePriorities, RuntimeBridge, TemplateCompilerParams, TransformConfig,
};
use crate::error::RepackResult;

/// Named input directories handed to a build by the previous pipeline stage
pub type StageInputs = BTreeMap<String, PathBuf>;

/// Capabilities the build orchestrator requires from its collaborator
pub trait LegacyAdapter {
    /// Name of the application package; used to detect self-references
    fn package_name(&self) -> &str;

    /// Directory holding the application's own namespace sources
    fn app_source_dir(&self, inputs: &StageInputs) -> PathBuf;

    /// Assets declared for this build, in emission order
    fn assets(&self, inputs: &StageInputs) -> RepackResult<Vec<Asset>>;

    /// Active dependency packages, in discovery order
    fn active_dependencies(&self) -> &[Package];

    /// Prefix of every runtime module name (`my-app`)
    fn module_prefix(&self) -> &str;

    /// Whether the app entrypoint boots the application
    fn auto_run(&self) -> bool;

    /// Main module, relative to the output root without extension (`app`)
    fn main_module(&self) -> &str;

    /// Runtime configuration passed to the main module's `create`
    fn main_module_config(&self) -> &Value;

    /// URL prefix for generated tags
    fn root_url(&self) -> &str {
        "/"
    }

    /// Output-relative path of the application stylesheet
    fn app_styles(&self) -> String {
        format!("assets/{}.css", self.module_prefix())
    }

    /// The app's own implied assets, relative to the output root
    fn implied_assets(&self, category: ImpliedCategory) -> Vec<String>;

    /// Runtime environment settings serialized into the env bootstrap
    fn env_settings(&self) -> &Value;

    fn transform_config(&self) -> TransformConfig;

    fn template_compiler(&self) -> TemplateCompilerParams;

    /// Specifiers known to be unresolvable inside the build
    fn externals(&self) -> BTreeSet<String>;

    /// Output-relative directory the package's own modules live under
    fn module_base_dir(&self) -> String {
        String::new()
    }

    /// App-level package renames (old name → new name)
    fn renamed_modules(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn runtime_bridge(&self) -> RuntimeBridge {
        RuntimeBridge::default()
    }

    fn package_priorities(&self) -> PackagePriorities {
        PackagePriorities::default()
    }
}
