//! Asset entity - a unit of build output
//!
//! Assets are a closed set of kinds. Every place that handles an asset
//! matches exhaustively, so a new kind is a compile error wherever it must
//! be handled.

use std::path::PathBuf;

use crate::domain::entities::HtmlDocument;

/// Kind tag of an asset, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    OnDisk,
    InMemory,
    Document,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::OnDisk => write!(f, "on-disk"),
            AssetKind::InMemory => write!(f, "in-memory"),
            AssetKind::Document => write!(f, "document"),
        }
    }
}

/// An HTML document awaiting asset insertion
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAsset {
    /// Output path relative to the output root
    pub relative_path: String,
    /// The parsed document, placeholders already located
    pub document: HtmlDocument,
    /// Whether test entrypoints and test-support assets are inserted
    pub include_tests: bool,
}

impl DocumentAsset {
    pub fn new(relative_path: impl Into<String>, document: HtmlDocument) -> Self {
        Self {
            relative_path: relative_path.into(),
            document,
            include_tests: false,
        }
    }

    /// Builder: request test insertions
    pub fn with_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }
}

/// A unit of output
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    /// Verbatim copy of a file on disk
    OnDisk {
        relative_path: String,
        source: PathBuf,
    },
    /// Generated content
    InMemory {
        relative_path: String,
        content: Vec<u8>,
    },
    /// HTML document with anchors to fill
    Document(DocumentAsset),
}

impl Asset {
    pub fn on_disk(relative_path: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Asset::OnDisk {
            relative_path: relative_path.into(),
            source: source.into(),
        }
    }

    pub fn in_memory(relative_path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Asset::InMemory {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Output path relative to the output root
    pub fn relative_path(&self) -> &str {
        match self {
            Asset::OnDisk { relative_path, .. } | Asset::InMemory { relative_path, .. } => {
                relative_path
            }
            Asset::Document(doc) => &doc.relative_path,
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::OnDisk { .. } => AssetKind::OnDisk,
            Asset::InMemory { .. } => AssetKind::InMemory,
            Asset::Document(_) => AssetKind::Document,
        }
    }
}
