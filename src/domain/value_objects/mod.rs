//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod anchor;
mod category;
mod config_warning;
mod diagnostic;
mod hash;
pub mod path;
mod priority;
mod runtime_bridge;
mod transform;

pub use anchor::Anchor;
pub use category::ImpliedCategory;
pub use config_warning::ConfigWarning;
pub use diagnostic::{Diagnostic, Severity};
pub use hash::ContentHash;
pub use priority::PackagePriorities;
pub use runtime_bridge::RuntimeBridge;
pub use transform::{TemplateCompilerParams, TransformConfig, TransformStep};
