//! Incremental namespace tracking
//!
//! The app namespace is the app's own source directory merged with the
//! `app-js` directories of its active dependencies. On a path collision the
//! app wins, then the first dependency in discovery order.
//!
//! The tracker lives as long as the pipeline stage that owns it. The first
//! update copies everything into the output root; later updates only touch
//! the paths the differ reports as changed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::{Namespace, Package};
use crate::domain::ports::{FileSystem, TreeDiffer};
use crate::domain::services::ModuleTransform;
use crate::domain::value_objects::path;
use crate::error::{RepackError, RepackResult};

/// One directory that contributes to the namespace
#[derive(Debug, Clone, PartialEq, Eq)]
struct Root {
    dir: PathBuf,
    owner: String,
}

/// Long-lived namespace state for one pipeline stage
pub struct NamespaceTracker {
    differ: Box<dyn TreeDiffer + Send>,
    fs: Arc<dyn FileSystem + Send + Sync>,
    output_root: PathBuf,
    roots: Vec<Root>,
    /// Relative path → index into `roots` of the contributing directory
    owners: BTreeMap<String, usize>,
    namespace: Namespace,
}

impl NamespaceTracker {
    pub fn new(
        differ: Box<dyn TreeDiffer + Send>,
        fs: Arc<dyn FileSystem + Send + Sync>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            differ,
            fs,
            output_root: output_root.into(),
            roots: Vec::new(),
            owners: BTreeMap::new(),
            namespace: Namespace::new(),
        }
    }

    /// Owner (app or dependency name) of a namespace path
    #[cfg(test)]
    fn owner_of(&self, relative_path: &str) -> Option<&str> {
        self.owners
            .get(relative_path)
            .map(|i| self.roots[*i].owner.as_str())
    }

    /// Bring the namespace and its output copy up to date
    ///
    /// `app_name` owns `app_source`; every package with an `app-js`
    /// directory contributes it after the app, in the order given.
    pub fn update(
        &mut self,
        app_name: &str,
        app_source: &Path,
        packages: &[Package],
        transform: &dyn ModuleTransform,
    ) -> RepackResult<Namespace> {
        let roots = collect_roots(app_name, app_source, packages);
        if roots != self.roots {
            if !self.roots.is_empty() {
                tracing::info!(source = %app_source.display(), "namespace roots changed, rescanning");
            }
            self.reset()?;
            self.roots = roots;
        }

        let changed = match self.sync(transform) {
            Ok(changed) => changed,
            Err(e) => {
                // The differ has already moved past these changes; forget
                // the roots so the next update starts over from a full scan.
                tracing::warn!(error = %e, "namespace update failed, next update rescans");
                self.roots.clear();
                self.differ.reset();
                return Err(e);
            }
        };

        tracing::debug!(
            changed,
            total = self.namespace.len(),
            "namespace updated"
        );
        Ok(self.namespace.clone())
    }

    /// Apply whatever the differ reports since the last call
    fn sync(&mut self, transform: &dyn ModuleTransform) -> RepackResult<usize> {
        let dirs: Vec<PathBuf> = self.roots.iter().map(|r| r.dir.clone()).collect();
        let changes = self.differ.changes(&dirs)?;

        let mut affected = BTreeSet::new();
        for change in &changes {
            let rel = self
                .roots
                .iter()
                .find_map(|r| path::relative_to_root(&r.dir, &change.path))
                .ok_or_else(|| RepackError::ChangeOutsideRoots {
                    path: change.path.clone(),
                })?;
            affected.insert(rel);
        }

        for rel in &affected {
            self.resolve(rel, transform)?;
        }
        Ok(affected.len())
    }

    /// Re-decide ownership of one relative path and sync its output copy
    fn resolve(&mut self, rel: &str, transform: &dyn ModuleTransform) -> RepackResult<()> {
        let target = self.output_root.join(rel);
        let winner = self
            .roots
            .iter()
            .position(|r| self.fs.exists(&r.dir.join(rel)));

        let Some(index) = winner else {
            self.fs.remove(&target)?;
            self.owners.remove(rel);
            self.namespace.remove(rel);
            return Ok(());
        };

        let root = &self.roots[index];
        let source = root.dir.join(rel);
        if transform.applies_to(rel) {
            let bytes = self.fs.read(&source)?;
            match String::from_utf8(bytes) {
                Ok(text) => {
                    let out = transform.transform(&root.owner, rel, &text);
                    self.fs.write(&target, out.as_bytes())?;
                }
                Err(raw) => self.fs.write(&target, raw.as_bytes())?,
            }
        } else {
            self.fs.copy(&source, &target)?;
        }

        self.owners.insert(rel.to_string(), index);
        self.namespace.insert(rel);
        Ok(())
    }

    /// Forget all state and delete the previous output copy
    fn reset(&mut self) -> RepackResult<()> {
        for rel in self.namespace.iter() {
            self.fs.remove(&self.output_root.join(rel))?;
        }
        self.namespace.clear();
        self.owners.clear();
        self.roots.clear();
        self.differ.reset();
        Ok(())
    }
}

fn collect_roots(app_name: &str, app_source: &Path, packages: &[Package]) -> Vec<Root> {
    let mut roots = vec![Root {
        dir: app_source.to_path_buf(),
        owner: app_name.to_string(),
    }];
    roots.extend(packages.iter().filter_map(|p| {
        p.app_js_dir().map(|dir| Root {
            dir,
            owner: p.name().to_string(),
        })
    }));
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PackageMeta;
    use crate::domain::ports::{ChangeKind, TreeChange};
    use crate::domain::services::IdentityTransform;
    use crate::infrastructure::{LocalFs, SnapshotDiffer};
    use std::fs;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::tempdir;

    struct Fixture {
        _dir: tempfile::TempDir,
        app: PathBuf,
        out: PathBuf,
        addon: Package,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let app = dir.path().join("app");
        let addon_root = dir.path().join("addon");
        let out = dir.path().join("out");
        fs::create_dir_all(app.join("components")).unwrap();
        fs::create_dir_all(addon_root.join("_app_/components")).unwrap();
        fs::write(app.join("components/foo.js"), "app foo").unwrap();
        fs::write(addon_root.join("_app_/components/foo.js"), "addon foo").unwrap();
        fs::write(addon_root.join("_app_/components/bar.js"), "addon bar").unwrap();

        let addon = Package::new("addon", &addon_root).with_meta(PackageMeta {
            app_js: Some("_app_".to_string()),
            ..Default::default()
        });
        Fixture {
            _dir: dir,
            app,
            out,
            addon,
        }
    }

    fn tracker(out: &Path) -> NamespaceTracker {
        NamespaceTracker::new(
            Box::new(SnapshotDiffer::new()),
            Arc::new(LocalFs::new()),
            out,
        )
    }

    #[test]
    fn first_update_merges_with_app_winning() {
        let f = fixture();
        let mut t = tracker(&f.out);

        let ns = t
            .update("my-app", &f.app, std::slice::from_ref(&f.addon), &IdentityTransform)
            .unwrap();

        let files: Vec<_> = ns.iter().collect();
        assert_eq!(files, vec!["components/bar.js", "components/foo.js"]);
        assert_eq!(fs::read_to_string(f.out.join("components/foo.js")).unwrap(), "app foo");
        assert_eq!(t.owner_of("components/bar.js"), Some("addon"));
        assert_eq!(t.owner_of("components/foo.js"), Some("my-app"));
    }

    #[test]
    fn removing_app_file_exposes_dependency_copy() {
        let f = fixture();
        let mut t = tracker(&f.out);
        let packages = std::slice::from_ref(&f.addon);
        t.update("my-app", &f.app, packages, &IdentityTransform).unwrap();

        fs::remove_file(f.app.join("components/foo.js")).unwrap();
        let ns = t.update("my-app", &f.app, packages, &IdentityTransform).unwrap();

        assert!(ns.contains("components/foo.js"));
        assert_eq!(
            fs::read_to_string(f.out.join("components/foo.js")).unwrap(),
            "addon foo"
        );
    }

    #[test]
    fn removed_everywhere_leaves_namespace_and_output() {
        let f = fixture();
        let mut t = tracker(&f.out);
        let packages = std::slice::from_ref(&f.addon);
        t.update("my-app", &f.app, packages, &IdentityTransform).unwrap();

        fs::remove_file(f.addon.root().join("_app_/components/bar.js")).unwrap();
        let ns = t.update("my-app", &f.app, packages, &IdentityTransform).unwrap();

        assert!(!ns.contains("components/bar.js"));
        assert!(!f.out.join("components/bar.js").exists());
    }

    #[test]
    fn changed_app_source_triggers_full_rescan() {
        let f = fixture();
        let mut t = tracker(&f.out);
        t.update("my-app", &f.app, &[], &IdentityTransform).unwrap();

        let other = f.app.parent().unwrap().join("other-app");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("router.js"), "router").unwrap();
        let ns = t.update("my-app", &other, &[], &IdentityTransform).unwrap();

        assert_eq!(ns.iter().collect::<Vec<_>>(), vec!["router.js"]);
        assert!(!f.out.join("components/foo.js").exists());
    }

    struct StrayDiffer;

    impl TreeDiffer for StrayDiffer {
        fn changes(&mut self, _roots: &[PathBuf]) -> RepackResult<Vec<TreeChange>> {
            Ok(vec![TreeChange::new("/somewhere/else.js", ChangeKind::Added)])
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn change_outside_roots_aborts() {
        let f = fixture();
        let mut t = NamespaceTracker::new(Box::new(StrayDiffer), Arc::new(LocalFs::new()), &f.out);

        let err = t.update("my-app", &f.app, &[], &IdentityTransform).unwrap_err();
        assert!(matches!(err, RepackError::ChangeOutsideRoots { .. }));
        assert!(t.roots.is_empty(), "next update must start from a full scan");
    }

    /// Local file system whose first write fails
    struct FlakyFs {
        inner: LocalFs,
        fail_next_write: AtomicBool,
    }

    impl FileSystem for FlakyFs {
        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.inner.read(path)
        }

        fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
            if self.fail_next_write.swap(false, Ordering::SeqCst) {
                return Err(io::Error::other("disk hiccup"));
            }
            self.inner.write(path, content)
        }

        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }

        fn remove(&self, path: &Path) -> io::Result<()> {
            self.inner.remove(path)
        }
    }

    #[test]
    fn failed_update_is_recovered_by_the_next_one() {
        let f = fixture();
        let fs_port = Arc::new(FlakyFs {
            inner: LocalFs::new(),
            fail_next_write: AtomicBool::new(true),
        });
        let mut t = NamespaceTracker::new(Box::new(SnapshotDiffer::new()), fs_port, &f.out);
        let packages = std::slice::from_ref(&f.addon);

        let err = t
            .update("my-app", &f.app, packages, &IdentityTransform)
            .unwrap_err();
        assert!(matches!(err, RepackError::Io(_)));

        let ns = t.update("my-app", &f.app, packages, &IdentityTransform).unwrap();
        assert_eq!(
            ns.iter().collect::<Vec<_>>(),
            vec!["components/bar.js", "components/foo.js"]
        );
        assert_eq!(fs::read_to_string(f.out.join("components/foo.js")).unwrap(), "app foo");
        assert_eq!(fs::read_to_string(f.out.join("components/bar.js")).unwrap(), "addon bar");
    }
}
