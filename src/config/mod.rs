//! Configuration module for Repack
//!
//! Configuration precedence:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (REPACK_*)
//! 3. `repack.toml`
//! 4. Built-in defaults (lowest priority)
//!
//! Relative paths in `repack.toml` are resolved against the directory that
//! holds the file.

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{with_env_overrides, ENV_AUTO_RUN, ENV_OUTPUT_DIR, ENV_ROOT_URL};
pub use types::{
    AppConfig, AssetConfig, Config, DependenciesConfig, DocumentConfig, ImpliedConfig,
    OutputConfig,
};
