//! Domain Services
//!
//! Build logic that operates on domain entities. Services only read the
//! package trees they are handed; every write goes through a port.

pub mod entrypoint;
mod externals;
mod html_inserter;
mod implied_assets;
pub mod specifier_rewriter;

pub use entrypoint::{
    app_entrypoint_path, implicit_module_records, namespace_records, render_app_entrypoint,
    render_test_entrypoint, AppEntrypoint, TEST_ENTRYPOINT,
};
pub use externals::combine_externals;
pub use html_inserter::{insert_assets, InsertionPlan};
pub use implied_assets::{ImpliedAssets, IMPLIED_DIR};
pub use specifier_rewriter::{IdentityTransform, ModuleTransform, RewriteOptions, SpecifierRewriter};
