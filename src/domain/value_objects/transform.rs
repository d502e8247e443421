//! Module-transform and template-compiler configuration
//!
//! Both are written out as generated modules for the downstream bundler.
//! Transform steps that cannot be expressed as JSON carry their own module
//! source and are extracted into synthetic files at build time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One step of the module-transform pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformStep {
    /// A step that needs code; written to its own file
    Synthetic { name: String, source: String },
    /// A step that serializes as plain JSON
    Serializable(Value),
}

/// Transform configuration supplied by the legacy adapter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Top-level options, serialized verbatim
    pub options: Map<String, Value>,
    /// Ordered transform steps
    pub steps: Vec<TransformStep>,
}

/// Parameters for the template-compiler shim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateCompilerParams {
    /// Module specifier or absolute path of the compiler implementation
    pub compiler: String,
    /// Options passed to the compiler's `configure` export
    pub options: Value,
}

impl Default for TemplateCompilerParams {
    fn default() -> Self {
        Self {
            compiler: "ember-source/dist/ember-template-compiler".to_string(),
            options: Value::Object(Map::new()),
        }
    }
}
