//! HTML document entity
//!
//! Documents are kept as a flat list of nodes. Everything the build does not
//! touch stays as opaque markup; anchor placeholders located by the legacy
//! adapter are separate nodes so tags can be inserted next to them.

use std::collections::BTreeMap;

use crate::domain::value_objects::Anchor;

/// One node of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Raw markup, written back verbatim
    Markup(String),
    /// Text content (used for readability newlines)
    Text(String),
    /// An anchor placeholder and the source text it replaced
    Placeholder { anchor: Anchor, source: String },
}

impl Node {
    /// `<script src="...">` tag
    pub fn script(url: &str) -> Self {
        Node::Markup(format!("<script src=\"{}\"></script>", escape_attr(url)))
    }

    /// `<link rel="stylesheet" href="...">` tag
    pub fn stylesheet(url: &str) -> Self {
        Node::Markup(format!(
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape_attr(url)
        ))
    }
}

/// A parsed HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlDocument {
    nodes: Vec<Node>,
}

impl HtmlDocument {
    /// Split `source` at the first occurrence of each anchor's marker text
    ///
    /// Markers that do not occur leave their anchor absent. A marker that
    /// occurs more than once only anchors its first occurrence.
    pub fn parse(source: &str, markers: &BTreeMap<Anchor, String>) -> Self {
        let mut nodes = Vec::new();
        let mut pending: Vec<(Anchor, &str)> = markers
            .iter()
            .filter(|(_, marker)| !marker.is_empty())
            .map(|(anchor, marker)| (*anchor, marker.as_str()))
            .collect();
        let mut rest = source;

        loop {
            let next = pending
                .iter()
                .enumerate()
                .filter_map(|(i, (anchor, marker))| {
                    rest.find(marker).map(|pos| (pos, i, *anchor, *marker))
                })
                .min_by_key(|(pos, i, _, _)| (*pos, *i));

            let Some((pos, index, anchor, marker)) = next else {
                break;
            };

            if pos > 0 {
                nodes.push(Node::Markup(rest[..pos].to_string()));
            }
            nodes.push(Node::Placeholder {
                anchor,
                source: marker.to_string(),
            });
            rest = &rest[pos + marker.len()..];
            pending.remove(index);
        }

        if !rest.is_empty() {
            nodes.push(Node::Markup(rest.to_string()));
        }
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Index of the placeholder for `anchor`, if present
    pub fn position(&self, anchor: Anchor) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| matches!(n, Node::Placeholder { anchor: a, .. } if *a == anchor))
    }

    /// Anchors whose placeholders are still present
    pub fn anchors(&self) -> Vec<Anchor> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                Node::Placeholder { anchor, .. } => Some(*anchor),
                _ => None,
            })
            .collect()
    }

    pub fn insert(&mut self, index: usize, node: Node) {
        self.nodes.insert(index, node);
    }

    pub fn remove(&mut self, index: usize) -> Node {
        self.nodes.remove(index)
    }

    /// Serialize back to HTML; untouched placeholders keep their source text
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Markup(s) | Node::Text(s) => out.push_str(s),
                Node::Placeholder { source, .. } => out.push_str(source),
            }
        }
        out
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
