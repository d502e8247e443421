//! Runtime bridge - names of the legacy module runtime's globals
//!
//! Generated entrypoints and the specifier rewriter are the only places that
//! reach for process-wide globals, and they take every global name from this
//! value instead of hard-coding them.

use serde::{Deserialize, Serialize};

/// Global names used by the legacy dynamic-lookup runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeBridge {
    /// The global object (`window`)
    pub global: String,
    /// Dynamic lookup function (`require`)
    pub require: String,
    /// Dynamic define function (`define`)
    pub define: String,
    /// Name of the lookup function installed by the app entrypoint
    pub lookup: String,
    /// Global holding the runtime environment settings
    pub env_global: String,
}

impl Default for RuntimeBridge {
    fn default() -> Self {
        Self {
            global: "window".to_string(),
            require: "require".to_string(),
            define: "define".to_string(),
            lookup: "_repackLookup".to_string(),
            env_global: "EmberENV".to_string(),
        }
    }
}

impl RuntimeBridge {
    /// `window.require`
    pub fn qualified_require(&self) -> String {
        format!("{}.{}", self.global, self.require)
    }
}
