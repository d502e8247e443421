//! Repack - bridges a legacy app build into a standards-shaped package
//!
//! Repack takes the legacy application's module namespace, its dependency
//! packages and its HTML documents, and lays them out as a package that a
//! standard bundler can consume: rewritten module specifiers, generated
//! entrypoints, implied assets, and package metadata.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{AppBuilder, BuildReport, StagedBuild, FORMAT_VERSION};
pub use config::Config;
pub use error::{RepackError, RepackResult};
pub use infrastructure::{LocalFs, ManifestAdapter, SnapshotDiffer};
