//! Module record - a runtime name paired with the file that implements it

/// Maps a name the dynamic loader is asked for to a static import specifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModuleRecord {
    /// Dotted/slashed runtime name (`my-app/components/foo`)
    pub runtime: String,
    /// Import specifier of the implementing file (`../components/foo`)
    pub buildtime: String,
}

impl ModuleRecord {
    pub fn new(runtime: impl Into<String>, buildtime: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
            buildtime: buildtime.into(),
        }
    }
}
