//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod file_system;
pub mod legacy_adapter;
pub mod tree_differ;

pub use file_system::FileSystem;
pub use legacy_adapter::{LegacyAdapter, StageInputs};
pub use tree_differ::{ChangeKind, TreeChange, TreeDiffer};
