//! Command handlers
//!
//! Shared setup lives here: loading `repack.toml`, surfacing its warnings,
//! and wiring the manifest adapter into a builder.

pub mod build;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use repack::application::{AppBuilder, BuildReport};
use repack::config::Config;
use repack::infrastructure::{LocalFs, ManifestAdapter, SnapshotDiffer};

/// Load the configuration and resolve dependencies
///
/// `out` wins over `REPACK_OUTPUT_DIR`, which wins over the file.
pub fn load_adapter(config_path: &Path, out: Option<PathBuf>, json: bool) -> Result<ManifestAdapter> {
    let (mut config, warnings) = Config::load_with_env(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    if !json {
        for warning in &warnings {
            eprintln!("⚠ {warning}");
        }
    }
    for warning in &warnings {
        tracing::warn!(key = %warning.key, "unknown configuration key");
    }

    if let Some(out) = out {
        config.output.dir = out;
    }

    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let adapter = ManifestAdapter::from_config(config, base)?;
    Ok(adapter)
}

/// Builder over the local disk for an adapter
pub fn local_builder(adapter: ManifestAdapter) -> AppBuilder {
    let output_root = adapter.output_root();
    AppBuilder::new(
        Box::new(adapter),
        Arc::new(LocalFs::new()),
        Box::new(SnapshotDiffer::new()),
        output_root,
    )
}

pub fn print_report(report: &BuildReport, json: bool) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "event": "build",
            "status": "success",
            "report": report,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!(
        "✓ Built {} modules and {} assets into {}",
        report.namespace_size,
        report.assets.len(),
        report.output_root.display()
    );
    if !report.externals.is_empty() {
        println!("  externals: {}", report.externals.join(", "));
    }
    for diagnostic in &report.diagnostics {
        eprintln!("  ⚠ {diagnostic}");
    }
    Ok(())
}

pub fn print_error(message: &str, json: bool) {
    if json {
        let output = serde_json::json!({
            "event": "build",
            "status": "error",
            "message": message,
        });
        println!("{output}");
    } else {
        eprintln!("✗ {message}");
    }
}
