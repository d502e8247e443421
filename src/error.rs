//! Error types for Repack
//!
//! Uses `thiserror` for library errors. The CLI wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::Anchor;

/// Result type alias for Repack operations
pub type RepackResult<T> = Result<T, RepackError>;

/// Main error type for Repack operations
#[derive(Error, Debug)]
pub enum RepackError {
    /// An implied script/style entry points at a file that does not exist
    #[error("package '{package}' declares implied asset '{specifier}' which does not exist")]
    UnresolvedImpliedAsset { package: String, specifier: String },

    /// An implicit module entry points at a file that does not exist
    #[error("package '{package}' declares implicit module '{specifier}' which does not exist")]
    UnresolvedImplicitModule { package: String, specifier: String },

    /// A mandatory HTML anchor is absent from a document
    #[error("document '{document}' is missing the mandatory '{anchor}' anchor")]
    MissingAnchor { anchor: Anchor, document: String },

    /// The tree differ reported a change outside every declared root
    #[error("tree differ reported '{path}' which is outside every namespace root")]
    ChangeOutsideRoots { path: PathBuf },

    /// Two assets claimed the same output path in one build
    #[error("asset '{path}' was emitted twice in one build")]
    DuplicateAsset { path: String },

    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// A package.json could not be read as package metadata
    #[error("invalid package metadata in {path}: {message}")]
    InvalidPackageMeta { path: PathBuf, message: String },

    /// A pipeline stage was asked to build before an input was named
    #[error("stage input '{name}' is not declared by this stage")]
    UnknownStageInput { name: String },

    /// The build for the current pipeline tick failed
    #[error("build failed: {message}")]
    StageFailed { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
