//! Package priority - load order of implied assets
//!
//! Implied scripts concatenate in visit order, and a module loader must run
//! before anything it loads, so two well-known packages sort first.

use serde::{Deserialize, Serialize};

/// Names of the packages that sort ahead of all others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagePriorities {
    /// Module loader package, visited first
    pub loader: String,
    /// Framework runtime package, visited second
    pub framework: String,
}

impl Default for PackagePriorities {
    fn default() -> Self {
        Self {
            loader: "loader.js".to_string(),
            framework: "ember-source".to_string(),
        }
    }
}

impl PackagePriorities {
    /// Sort key for a package name; lower runs earlier
    pub fn priority(&self, package: &str) -> u8 {
        if package == self.loader {
            0
        } else if package == self.framework {
            1
        } else {
            2
        }
    }
}
