//! TreeDiffer port - the recursive file-tree diffing primitive
//!
//! Contract: the first call after construction (or after `reset`) reports
//! every file under the given roots as `Added`. Each later call reports only
//! what changed since the previous call. Reported paths are absolute and must
//! lie under one of the roots.

use std::path::PathBuf;

use crate::error::RepackResult;

/// What happened to a path between two calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// A single changed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl TreeChange {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Incremental differ over a set of directory roots
pub trait TreeDiffer {
    /// Changes under `roots` since the previous call
    fn changes(&mut self, roots: &[PathBuf]) -> RepackResult<Vec<TreeChange>>;

    /// Forget the previous snapshot; the next call reports everything as added
    fn reset(&mut self);
}
