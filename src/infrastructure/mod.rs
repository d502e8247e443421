//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - `FileSystem` over the local disk
//! - `differ` - snapshot-based `TreeDiffer`
//! - `packages` - dependency discovery from `package.json`
//! - `adapter` - `LegacyAdapter` driven by `repack.toml`

pub mod adapter;
pub mod differ;
pub mod fs;
pub mod packages;

// Re-export for convenience
pub use adapter::{ManifestAdapter, APP_INPUT};
pub use differ::SnapshotDiffer;
pub use fs::LocalFs;
pub use packages::PackageLoader;
