//! Domain Entities
//!
//! - `Package` - a dependency package and its build metadata
//! - `Asset` - a unit of build output (on-disk, in-memory, document)
//! - `HtmlDocument` - a document with anchor placeholders
//! - `ModuleRecord` - runtime name → build-time path
//! - `Namespace` - the app's own module files

mod asset;
mod document;
mod module_record;
mod namespace;
mod package;

pub use asset::{Asset, AssetKind, DocumentAsset};
pub use document::{HtmlDocument, Node};
pub use module_record::ModuleRecord;
pub use namespace::Namespace;
pub use package::{Package, PackageMeta, META_KEY};
