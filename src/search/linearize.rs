//! Text linearization.
//!
//! Flattens a DOM subtree's text nodes into one logical string, keeping
//! the mapping from logical offsets back to source nodes. The index is
//! rebuilt before every search: a previous rewrite replaces nodes, so
//! node ids recorded here are only valid until the next DOM mutation.

use crate::dom::{DomNode, NodeId, NodeType};

/// Subtrees whose text never participates in search.
const EXCLUDED_TAGS: &[&str] = &["script", "noscript"];

/// The linearized text of a subtree plus the offset table mapping it
/// back to the contributing text nodes.
#[derive(Debug, Default)]
pub struct LinearText {
    pub text: String,
    pub node_ids: Vec<NodeId>,
    pub node_starts: Vec<usize>,
}

impl LinearText {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Logical byte range occupied by the i-th contributing node.
    pub fn node_range(&self, i: usize) -> (usize, usize) {
        let start = self.node_starts[i];
        let end = self
            .node_starts
            .get(i + 1)
            .copied()
            .unwrap_or_else(|| self.text.len());
        (start, end)
    }
}

/// Walk `root` depth-first in document order and collect every
/// non-empty text node outside script/noscript subtrees.
pub fn linearize(root: &DomNode) -> LinearText {
    let mut out = LinearText::default();
    collect(root, &mut out);
    out
}

fn collect(node: &DomNode, out: &mut LinearText) {
    match node.node_type {
        NodeType::Element => {
            if EXCLUDED_TAGS.contains(&node.tag.as_str()) {
                return;
            }
        }
        NodeType::Text => {
            if !node.text.is_empty() {
                out.node_ids.push(node.id);
                out.node_starts.push(out.text.len());
                out.text.push_str(&node.text);
            }
        }
    }
    for child in &node.children {
        collect(child, out);
    }
}
