use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::runtime::Runtime;

use repack::application::StagedBuild;
use repack::infrastructure::APP_INPUT;

use super::{load_adapter, local_builder, print_error, print_report};

/// Quiet period before a batch of changes triggers a rebuild
const DEBOUNCE_MS: u64 = 100;

/// Changed paths collected since the last rebuild
#[derive(Debug, Default)]
struct PendingChanges {
    paths: BTreeSet<PathBuf>,
    last_change: Option<Instant>,
}

impl PendingChanges {
    fn add(&mut self, path: PathBuf) {
        self.paths.insert(path);
        self.last_change = Some(Instant::now());
    }

    fn is_settled(&self) -> bool {
        match self.last_change {
            Some(last) => {
                !self.paths.is_empty() && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
            }
            None => false,
        }
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_change = None;
        std::mem::take(&mut self.paths).into_iter().collect()
    }
}

pub fn cmd_watch(config_path: &Path, out: Option<PathBuf>, json: bool) -> Result<()> {
    let adapter = load_adapter(config_path, out, json)?;
    let roots = adapter.watch_roots();
    let app_source = adapter.configured_app_source();
    let stage = StagedBuild::new(local_builder(adapter), [APP_INPUT]);
    let output_root = stage.output_root().to_path_buf();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start runtime")?;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        notify::Config::default(),
    )?;
    for root in roots.iter().filter(|r| r.is_dir()) {
        watcher.watch(root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "watching");
    }

    if !json {
        println!("👀 Watching {} directories (Ctrl+C to stop)", roots.len());
    }
    run_tick(&runtime, &stage, &app_source, json);

    let mut pending = PendingChanges::default();
    while running.load(Ordering::SeqCst) {
        if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
            if !path.starts_with(&output_root) {
                pending.add(path);
            }
        }

        if pending.is_settled() {
            let changed = pending.take();
            tracing::info!(count = changed.len(), "changes detected");
            runtime.block_on(stage.advance());
            run_tick(&runtime, &stage, &app_source, json);
        }
    }

    if !json {
        println!("Stopped.");
    }
    Ok(())
}

/// Provide this tick's inputs and wait for its build
///
/// A failed build is reported and the watch loop keeps going.
fn run_tick(runtime: &Runtime, stage: &StagedBuild, app_source: &Path, json: bool) {
    let result = runtime.block_on(async {
        stage.provide(APP_INPUT, app_source).await?;
        stage.ready().await
    });

    match result {
        Ok(report) => {
            if let Err(e) = print_report(&report, json) {
                tracing::error!(error = %e, "failed to print report");
            }
        }
        Err(e) => print_error(&e.to_string(), json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_changes_start_unsettled() {
        let pending = PendingChanges::default();
        assert!(!pending.is_settled());
    }

    #[test]
    fn pending_changes_settle_after_quiet_period() {
        let mut pending = PendingChanges::default();
        pending.add(PathBuf::from("app/a.js"));
        assert!(!pending.is_settled());

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS + 10));
        assert!(pending.is_settled());
    }

    #[test]
    fn take_deduplicates_and_resets() {
        let mut pending = PendingChanges::default();
        pending.add(PathBuf::from("app/a.js"));
        pending.add(PathBuf::from("app/a.js"));
        pending.add(PathBuf::from("app/b.js"));

        assert_eq!(pending.take().len(), 2);
        assert!(!pending.is_settled());
        assert!(pending.take().is_empty());
    }
}
