//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RepackError, RepackResult};

use super::types::Config;

pub use crate::domain::value_objects::ConfigWarning;

/// Output directory override
pub const ENV_OUTPUT_DIR: &str = "REPACK_OUTPUT_DIR";
/// Root URL override
pub const ENV_ROOT_URL: &str = "REPACK_ROOT_URL";
/// Auto-run override (`false`/`0` disable it)
pub const ENV_AUTO_RUN: &str = "REPACK_AUTO_RUN";

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> RepackResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| RepackError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                line: find_line_number(&content, &leaf),
                suggestion: suggest_key(&leaf),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Apply environment variable overrides (REPACK_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides(config, |name| std::env::var(name).ok())
}

/// Apply overrides from any variable source
pub(crate) fn with_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(dir) = var(ENV_OUTPUT_DIR).filter(|d| !d.is_empty()) {
        config.output.dir = PathBuf::from(dir);
    }

    if let Some(url) = var(ENV_ROOT_URL).filter(|u| !u.is_empty()) {
        config.app.root_url = url;
    }

    if let Some(val) = var(ENV_AUTO_RUN) {
        config.app.auto_run = val.to_lowercase() != "false" && val != "0";
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "app",
        "name",
        "module_prefix",
        "source",
        "base_dir",
        "root",
        "root_url",
        "auto_run",
        "main_module",
        "styles",
        "config",
        "env",
        "implied",
        "scripts",
        "test_scripts",
        "test_styles",
        "output",
        "dir",
        "runtime",
        "global",
        "require",
        "define",
        "lookup",
        "env_global",
        "priority",
        "loader",
        "framework",
        "rename",
        "externals",
        "dependencies",
        "names",
        "template_compiler",
        "compiler",
        "options",
        "transform",
        "steps",
        "documents",
        "path",
        "tests",
        "markers",
        "assets",
        "kind",
        "content",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 && dist > 0 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
