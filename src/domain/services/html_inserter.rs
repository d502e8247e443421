//! HTML asset insertion
//!
//! Replaces anchor placeholders with `<script>`/`<link>` tags. Insertion
//! consumes the placeholder, so a document goes through it exactly once;
//! `insert_assets` takes the document by value to make that a type-level fact.

use std::collections::BTreeMap;

use crate::domain::entities::{Asset, DocumentAsset, Node};
use crate::domain::value_objects::Anchor;
use crate::error::{RepackError, RepackResult};

/// URLs to insert, per anchor, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertionPlan {
    urls: BTreeMap<Anchor, Vec<String>>,
}

impl InsertionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the URLs for one anchor
    pub fn with(mut self, anchor: Anchor, urls: Vec<String>) -> Self {
        self.urls.insert(anchor, urls);
        self
    }

    pub fn urls(&self, anchor: Anchor) -> &[String] {
        self.urls.get(&anchor).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Fill every anchor of `document` and return the rendered asset
///
/// All mandatory anchors are checked before anything is inserted.
pub fn insert_assets(document: DocumentAsset, plan: &InsertionPlan) -> RepackResult<Asset> {
    let DocumentAsset {
        relative_path,
        document: mut doc,
        include_tests,
    } = document;

    if let Some(anchor) = Anchor::ALL
        .into_iter()
        .filter(Anchor::is_mandatory)
        .find(|a| doc.position(*a).is_none())
    {
        return Err(RepackError::MissingAnchor {
            anchor,
            document: relative_path,
        });
    }

    for anchor in Anchor::ALL {
        if anchor.is_test() && !include_tests {
            continue;
        }
        let Some(mut index) = doc.position(anchor) else {
            continue;
        };
        for url in plan.urls(anchor) {
            let tag = if anchor.is_style() {
                Node::stylesheet(url)
            } else {
                Node::script(url)
            };
            doc.insert(index, Node::Text("\n".to_string()));
            doc.insert(index + 1, tag);
            index += 2;
        }
        doc.remove(index);
    }

    tracing::debug!(document = %relative_path, "inserted assets");
    Ok(Asset::in_memory(relative_path, doc.to_html()))
}
