use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use repack::application::StagedBuild;
use repack::infrastructure::APP_INPUT;

use super::{load_adapter, local_builder, print_report};

/// One build, run as a single tick of the stage
///
/// `app` stands in for the directory a previous pipeline stage would hand
/// over; without it the configured app source is used.
pub fn cmd_build(
    config_path: &Path,
    out: Option<PathBuf>,
    app: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let adapter = load_adapter(config_path, out, json)?;
    let app_source = app.unwrap_or_else(|| adapter.configured_app_source());
    let stage = StagedBuild::new(local_builder(adapter), [APP_INPUT]);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start runtime")?;
    let report = runtime
        .block_on(async {
            stage.provide(APP_INPUT, app_source).await?;
            stage.ready().await
        })
        .context("build failed")?;

    print_report(&report, json)
}
