//! Auxiliary build artifacts
//!
//! Small generated modules written next to the app: the template compiler
//! shim, the module transform configuration and the runtime environment
//! bootstrap.

use std::fmt::Write;
use std::path::Path;

use serde_json::Value;

use crate::domain::value_objects::{
    RuntimeBridge, TemplateCompilerParams, TransformConfig, TransformStep,
};
use crate::error::RepackResult;

pub const TEMPLATE_COMPILER_FILE: &str = "_template_compiler_.js";
pub const TRANSFORM_CONFIG_FILE: &str = "_transform_config_.js";
pub const RUNTIME_ENV_FILE: &str = "_runtime_env_.js";

/// Output-relative path of the n-th extracted transform step
pub fn transform_step_file(index: usize) -> String {
    format!("_transform_step_{index}_.js")
}

/// A generated file, relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub relative_path: String,
    pub content: String,
}

impl GeneratedFile {
    fn new(relative_path: impl Into<String>, content: String) -> Self {
        Self {
            relative_path: relative_path.into(),
            content,
        }
    }
}

/// `module.exports` shim that configures the template compiler
pub fn template_compiler_shim(params: &TemplateCompilerParams) -> RepackResult<GeneratedFile> {
    let content = format!(
        "module.exports = require({}).configure({});\n",
        serde_json::to_string(&params.compiler)?,
        serde_json::to_string(&params.options)?
    );
    Ok(GeneratedFile::new(TEMPLATE_COMPILER_FILE, content))
}

/// The transform configuration module plus one file per synthetic step
///
/// Serializable steps are inlined as JSON. Synthetic steps cannot be, so
/// their source is written to its own file and required by absolute path.
pub fn transform_config_module(
    config: &TransformConfig,
    output_root: &Path,
) -> RepackResult<Vec<GeneratedFile>> {
    let mut files = Vec::new();
    let mut steps = Vec::with_capacity(config.steps.len());

    for step in &config.steps {
        match step {
            TransformStep::Serializable(value) => steps.push(serde_json::to_string(value)?),
            TransformStep::Synthetic { name, source } => {
                let rel = transform_step_file(files.len());
                let absolute = output_root.join(&rel);
                steps.push(format!(
                    "require({}) /* {} */",
                    serde_json::to_string(&absolute.to_string_lossy())?,
                    name.replace("*/", "* /")
                ));
                files.push(GeneratedFile::new(rel, source.clone()));
            }
        }
    }

    let mut content = String::from("module.exports = {\n");
    let _ = writeln!(
        content,
        "  options: {},",
        serde_json::to_string(&config.options)?
    );
    content.push_str("  steps: [\n");
    for step in &steps {
        let _ = writeln!(content, "    {step},");
    }
    content.push_str("  ],\n};\n");

    files.insert(0, GeneratedFile::new(TRANSFORM_CONFIG_FILE, content));
    Ok(files)
}

/// Script that defines the runtime environment global
pub fn runtime_env_module(bridge: &RuntimeBridge, settings: &Value) -> RepackResult<GeneratedFile> {
    let content = format!(
        "{}.{} = {};\n",
        bridge.global,
        bridge.env_global,
        serde_json::to_string(settings)?
    );
    Ok(GeneratedFile::new(RUNTIME_ENV_FILE, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn template_compiler_shim_configures_compiler() {
        let params = TemplateCompilerParams {
            compiler: "ember-source/dist/ember-template-compiler".to_string(),
            options: json!({ "strict": true }),
        };
        let file = template_compiler_shim(&params).unwrap();
        assert_eq!(file.relative_path, "_template_compiler_.js");
        assert_eq!(
            file.content,
            "module.exports = require(\"ember-source/dist/ember-template-compiler\").configure({\"strict\":true});\n"
        );
    }

    #[test]
    fn synthetic_steps_are_extracted_and_required_by_absolute_path() {
        let config = TransformConfig {
            options: serde_json::Map::new(),
            steps: vec![
                TransformStep::Serializable(json!(["plugin-a", { "loose": true }])),
                TransformStep::Synthetic {
                    name: "inline-plugin".to_string(),
                    source: "module.exports = function () {};\n".to_string(),
                },
            ],
        };
        let files = transform_config_module(&config, Path::new("/out")).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].relative_path, "_transform_config_.js");
        assert_eq!(files[1].relative_path, "_transform_step_0_.js");
        assert_eq!(files[1].content, "module.exports = function () {};\n");
        insta::assert_snapshot!(files[0].content, @r#"
        module.exports = {
          options: {},
          steps: [
            ["plugin-a",{"loose":true}],
            require("/out/_transform_step_0_.js") /* inline-plugin */,
          ],
        };
        "#);
    }

    #[test]
    fn runtime_env_uses_bridge_names() {
        let file = runtime_env_module(&RuntimeBridge::default(), &json!({ "FEATURES": {} })).unwrap();
        assert_eq!(file.content, "window.EmberENV = {\"FEATURES\":{}};\n");
    }
}
