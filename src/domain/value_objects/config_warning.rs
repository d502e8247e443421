//! Configuration warning value object.

use std::path::PathBuf;

/// Non-fatal problem found while loading `repack.toml`
///
/// Unknown keys are the common case: they are ignored by deserialization
/// and reported so typos do not go unnoticed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the offending key (`app.modul_prefix`)
    pub key: String,
    pub file: PathBuf,
    /// 1-indexed line, when the key can be found in the source text
    pub line: Option<usize>,
    /// Closest known key, if any
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        write!(f, ": unknown key '{}'", self.key)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{suggestion}'?)")?;
        }
        Ok(())
    }
}
