//! Snapshot-based tree differ
//!
//! Walks every root, hashes file contents and compares against the previous
//! snapshot. Contents, not timestamps, decide whether a file changed.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ignore::WalkBuilder;

use crate::domain::ports::{ChangeKind, TreeChange, TreeDiffer};
use crate::domain::value_objects::ContentHash;
use crate::error::RepackResult;

/// `TreeDiffer` over content hashes of the files under each root
#[derive(Debug, Default)]
pub struct SnapshotDiffer {
    snapshot: BTreeMap<PathBuf, ContentHash>,
}

impl SnapshotDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files in the last snapshot
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    fn scan(roots: &[PathBuf]) -> RepackResult<BTreeMap<PathBuf, ContentHash>> {
        let mut files = BTreeMap::new();
        for root in roots.iter().filter(|r| r.is_dir()) {
            // Build inputs are not filtered by ignore files
            let walker = WalkBuilder::new(root).standard_filters(false).build();
            for entry in walker {
                let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                let content = std::fs::read(entry.path())?;
                files
                    .entry(entry.into_path())
                    .or_insert_with(|| ContentHash::from_bytes(&content));
            }
        }
        Ok(files)
    }
}

impl TreeDiffer for SnapshotDiffer {
    fn changes(&mut self, roots: &[PathBuf]) -> RepackResult<Vec<TreeChange>> {
        let current = Self::scan(roots)?;
        let mut changes = Vec::new();

        for (path, hash) in &current {
            match self.snapshot.get(path) {
                None => changes.push(TreeChange::new(path, ChangeKind::Added)),
                Some(previous) if previous != hash => {
                    changes.push(TreeChange::new(path, ChangeKind::Modified))
                }
                Some(_) => {}
            }
        }
        for path in self.snapshot.keys() {
            if !current.contains_key(path) {
                changes.push(TreeChange::new(path, ChangeKind::Removed));
            }
        }

        self.snapshot = current;
        Ok(changes)
    }

    fn reset(&mut self) {
        self.snapshot.clear();
    }
}
