//! External reference collection
//!
//! Externals are specifiers the build cannot resolve inside itself. They
//! come from the adapter and from each active dependency's metadata.

use std::collections::{BTreeSet, HashSet};

use crate::domain::entities::Package;
use crate::domain::services::specifier_rewriter::split_package_name;
use crate::domain::value_objects::Diagnostic;

/// Sorted, deduplicated externals plus any topology diagnostics
///
/// A dependency listing another active dependency's name as external,
/// without depending on it, is flagged but still recorded.
pub fn combine_externals(
    packages: &[Package],
    adapter_externals: &BTreeSet<String>,
) -> (Vec<String>, Vec<Diagnostic>) {
    let active: HashSet<&str> = packages.iter().map(Package::name).collect();
    let mut externals: BTreeSet<String> = adapter_externals.clone();
    let mut diagnostics = Vec::new();

    for package in packages {
        let declared: HashSet<&str> = package.dependencies().iter().map(Package::name).collect();
        for specifier in &package.meta().externals {
            if let Some((name, _)) = split_package_name(specifier) {
                if name != package.name() && active.contains(name) && !declared.contains(name) {
                    tracing::warn!(
                        package = package.name(),
                        dependency = name,
                        "unsupported usage: imports an active dependency it does not declare"
                    );
                    diagnostics.push(Diagnostic::warning(
                        package.name(),
                        format!(
                            "imports '{name}', an active dependency it does not declare; treating it as external"
                        ),
                    ));
                }
            }
            externals.insert(specifier.clone());
        }
    }

    (externals.into_iter().collect(), diagnostics)
}
