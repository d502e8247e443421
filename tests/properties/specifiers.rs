//! Property tests for specifier rewriting.

use proptest::prelude::*;

use repack::domain::services::{RewriteOptions, SpecifierRewriter};
use repack::domain::value_objects::RuntimeBridge;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,8}")
        .unwrap()
        .prop_filter("not the template directory", |s| s != "templates")
}

fn module_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..=4).prop_map(|parts| format!("{}.js", parts.join("/")))
}

fn rewriter() -> SpecifierRewriter {
    SpecifierRewriter::new(RewriteOptions::new("my-app"), RuntimeBridge::default())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a self-reference always becomes an explicit relative path.
    #[test]
    fn property_self_reference_is_explicitly_relative(
        from in module_path(),
        target in proptest::collection::vec(segment(), 1..=4),
    ) {
        let specifier = format!("my-app/{}", target.join("/"));
        let rewritten = rewriter().rewrite_specifier(&from, &specifier);
        prop_assert!(rewritten.starts_with('.'), "{} -> {}", specifier, rewritten);
        prop_assert!(!rewritten.contains("my-app"));
    }

    /// PROPERTY: specifiers of unrelated, unrenamed packages pass through untouched.
    #[test]
    fn property_unrelated_packages_untouched(
        from in module_path(),
        name in segment().prop_filter("not the app", |n| n != "my-app"),
        rest in proptest::collection::vec(segment(), 0..=3),
    ) {
        let specifier = if rest.is_empty() {
            name
        } else {
            format!("{}/{}", name, rest.join("/"))
        };
        prop_assert_eq!(rewriter().rewrite_specifier(&from, &specifier), specifier);
    }

    /// PROPERTY: sources without declarations are returned unchanged.
    #[test]
    fn property_source_without_declarations_is_unchanged(
        source in "[a-z0-9 =;(){}\\n]{0,120}"
    ) {
        let out = rewriter().rewrite_source("components/foo.js", &source);
        prop_assert_eq!(out.as_ref(), source.as_str());
    }
}
