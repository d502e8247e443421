//! Implied asset categories

use serde::{Deserialize, Serialize};

/// A category of implied (non-imported) assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImpliedCategory {
    Scripts,
    Styles,
    TestScripts,
    TestStyles,
}

impl ImpliedCategory {
    pub const ALL: [ImpliedCategory; 4] = [
        ImpliedCategory::Scripts,
        ImpliedCategory::Styles,
        ImpliedCategory::TestScripts,
        ImpliedCategory::TestStyles,
    ];

    /// Key under which dependencies declare this category
    pub fn meta_key(&self) -> &'static str {
        match self {
            ImpliedCategory::Scripts => "implicit-scripts",
            ImpliedCategory::Styles => "implicit-styles",
            ImpliedCategory::TestScripts => "implicit-test-scripts",
            ImpliedCategory::TestStyles => "implicit-test-styles",
        }
    }
}

impl std::fmt::Display for ImpliedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.meta_key())
    }
}
