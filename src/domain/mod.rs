//! Domain Layer
//!
//! The build engine's core types and rules.
//!
//! ## Structure
//!
//! - `entities/` - Package, Asset, HtmlDocument, ModuleRecord, Namespace
//! - `value_objects/` - Anchor, ImpliedCategory, RuntimeBridge, path helpers
//! - `services/` - Specifier rewriting, implied assets, entrypoints, HTML insertion
//! - `ports/` - FileSystem, TreeDiffer, LegacyAdapter
//!
//! ## Design Principles
//!
//! 1. **No output I/O** - Writes go through the `FileSystem` port
//! 2. **Deterministic** - Same inputs, same bytes
//! 3. **Ports & Adapters** - Collaborators are trait objects

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
