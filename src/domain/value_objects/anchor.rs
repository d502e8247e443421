//! Anchor value object - named insertion points in an HTML document
//!
//! The legacy adapter locates one placeholder per anchor in each document.
//! The four non-test anchors are mandatory; the test anchors are optional.

use serde::{Deserialize, Serialize};

/// A named insertion point for a group of generated tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// The application entrypoint script
    AppScript,
    /// The application stylesheet
    AppStyles,
    /// Implied scripts from dependencies and the app
    ImpliedScripts,
    /// Implied styles from dependencies and the app
    ImpliedStyles,
    /// The test entrypoint script
    TestScript,
    /// Implied test-support scripts
    ImpliedTestScripts,
    /// Implied test-support styles
    ImpliedTestStyles,
}

impl Anchor {
    /// Every anchor, in insertion order
    pub const ALL: [Anchor; 7] = [
        Anchor::AppScript,
        Anchor::AppStyles,
        Anchor::ImpliedScripts,
        Anchor::ImpliedStyles,
        Anchor::TestScript,
        Anchor::ImpliedTestScripts,
        Anchor::ImpliedTestStyles,
    ];

    /// Mandatory anchors must be present in every document
    pub fn is_mandatory(&self) -> bool {
        !self.is_test()
    }

    /// Test anchors are only filled when a document asks for tests
    pub fn is_test(&self) -> bool {
        matches!(
            self,
            Anchor::TestScript | Anchor::ImpliedTestScripts | Anchor::ImpliedTestStyles
        )
    }

    /// Whether the anchor expands into `<link>` tags rather than `<script>` tags
    pub fn is_style(&self) -> bool {
        matches!(
            self,
            Anchor::AppStyles | Anchor::ImpliedStyles | Anchor::ImpliedTestStyles
        )
    }

    /// Kebab-case name used in errors and in default markers
    pub fn name(&self) -> &'static str {
        match self {
            Anchor::AppScript => "app-script",
            Anchor::AppStyles => "app-styles",
            Anchor::ImpliedScripts => "implied-scripts",
            Anchor::ImpliedStyles => "implied-styles",
            Anchor::TestScript => "test-script",
            Anchor::ImpliedTestScripts => "implied-test-scripts",
            Anchor::ImpliedTestStyles => "implied-test-styles",
        }
    }

    /// Default placeholder text the manifest adapter looks for
    pub fn default_marker(&self) -> String {
        format!("<!-- repack:{} -->", self.name())
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
