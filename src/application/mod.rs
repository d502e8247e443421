//! Application Layer
//!
//! Use cases that drive the domain services against real trees.
//!
//! - `NamespaceTracker` - incremental app namespace, owned across builds
//! - `AppBuilder` - one full build pass
//! - `StagedBuild` - one-shot build gate per pipeline tick
//! - `auxiliary` - generated helper modules written next to the app

pub mod auxiliary;
pub mod builder;
pub mod namespace;
pub mod stage;

pub use builder::{AppBuilder, BuildReport, FORMAT_VERSION};
pub use namespace::NamespaceTracker;
pub use stage::StagedBuild;
