//! Non-fatal build diagnostics
//!
//! Topology problems do not abort a build. They are logged and returned to
//! the caller with the build report.

use serde::Serialize;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

/// A problem noticed during a build that did not stop it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Package the problem was found in
    pub package: String,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            package: package.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.package, self.message)
    }
}
