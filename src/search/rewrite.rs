//! DOM rewriting.
//!
//! Splits every text node overlapped by a match into a wrapper element
//! holding alternating plain and highlighted segments, replacing the
//! node in place. Nodes without overlap are never touched, so a search
//! with few matches disturbs almost none of the tree.

use std::collections::HashMap;

use crate::dom::{DomNode, DomTree, NodeId};

use super::highlight::{Highlight, HighlightGroup};
use super::linearize::LinearText;
use super::MatchSpan;

/// Attribute carried by a wrapper element that replaced one text node.
pub const GROUP_ATTRIBUTE: &str = "data-highlight-group";
/// Attribute carried by each highlighted slice of a match.
pub const MARK_ATTRIBUTE: &str = "data-highlight";
/// Background applied to every highlighted slice.
pub const HIGHLIGHT_COLOR: &str = "#ffff00";

/// Result of one rewrite pass.
pub struct RewriteOutcome {
    /// One group per split text node, in document order.
    pub groups: Vec<HighlightGroup>,
    /// Mark element ids per originating span index. A span that
    /// crossed node boundaries contributes marks from several nodes.
    pub marks_by_span: Vec<Vec<NodeId>>,
}

impl RewriteOutcome {
    /// Aggregate the recorded marks into one [`Highlight`] per span,
    /// dropping spans that produced no marks.
    pub fn into_parts(self) -> (Vec<HighlightGroup>, Vec<Highlight>) {
        let highlights = self
            .marks_by_span
            .into_iter()
            .filter(|ids| !ids.is_empty())
            .map(Highlight::new)
            .collect();
        (self.groups, highlights)
    }
}

/// Split and wrap every text node overlapped by at least one span.
///
/// `index` must have been built from `tree` with no mutation in
/// between; spans are clipped to each node's logical range.
pub fn rewrite(tree: &mut DomTree, index: &LinearText, spans: &[MatchSpan]) -> RewriteOutcome {
    let mut groups = Vec::new();
    let mut marks_by_span: Vec<Vec<NodeId>> = vec![Vec::new(); spans.len()];

    for i in 0..index.node_ids.len() {
        let (node_start, node_end) = index.node_range(i);
        let overlapping: Vec<(usize, MatchSpan)> = spans
            .iter()
            .enumerate()
            .filter(|(_, s)| s.end > node_start && s.start < node_end)
            .map(|(idx, s)| (idx, *s))
            .collect();
        if overlapping.is_empty() {
            continue;
        }

        let node_id = index.node_ids[i];
        let Some(text) = tree.find(node_id).map(|n| n.text.clone()) else {
            continue;
        };

        // Build the wrapper's children: plain text between matches,
        // a mark element for each clipped span.
        let mut children = Vec::new();
        let mut cursor = node_start;
        for (span_idx, span) in overlapping {
            let clip_start = span.start.max(node_start);
            let clip_end = span.end.min(node_end);
            if clip_start > cursor {
                let id = tree.alloc_id();
                children.push(DomNode::text(
                    id,
                    &text[cursor - node_start..clip_start - node_start],
                ));
            }
            let slice = &text[clip_start - node_start..clip_end - node_start];
            let text_id = tree.alloc_id();
            let mark_id = tree.alloc_id();
            let mut mark = DomNode::element(
                mark_id,
                "span",
                HashMap::new(),
                vec![DomNode::text(text_id, slice)],
            );
            mark.set_attr(MARK_ATTRIBUTE, MARK_ATTRIBUTE);
            mark.set_attr(
                "style",
                format!("background-color: {};", HIGHLIGHT_COLOR),
            );
            marks_by_span[span_idx].push(mark_id);
            children.push(mark);
            cursor = clip_end;
        }
        if cursor < node_end {
            let id = tree.alloc_id();
            children.push(DomNode::text(id, &text[cursor - node_start..]));
        }

        let wrapper_id = tree.alloc_id();
        let mut wrapper = DomNode::element(wrapper_id, "span", HashMap::new(), children);
        wrapper.set_attr(GROUP_ATTRIBUTE, GROUP_ATTRIBUTE);
        tree.replace(node_id, wrapper);
        groups.push(HighlightGroup::new(wrapper_id));
    }

    RewriteOutcome {
        groups,
        marks_by_span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;
    use crate::search::linearize::linearize;
    use crate::search::matcher::{compile, find_spans};

    fn run(html: &str, pattern: &str) -> (DomTree, RewriteOutcome) {
        let mut tree = parse_html(html, "https://example.com");
        let index = linearize(&tree.root);
        let re = compile(pattern, "gi").unwrap();
        let spans = find_spans(&re, &index.text);
        let outcome = rewrite(&mut tree, &index, &spans);
        (tree, outcome)
    }

    fn marks(node: &DomNode, out: &mut Vec<String>) {
        if node.attr(MARK_ATTRIBUTE).is_some() {
            out.push(node.text_content());
        }
        for child in &node.children {
            marks(child, out);
        }
    }

    #[test]
    fn splits_single_node() {
        let html = "<html><body><p>say hello to the world</p></body></html>";
        let (tree, outcome) = run(html, "hello");

        assert_eq!(outcome.groups.len(), 1);
        assert_eq!(outcome.marks_by_span.len(), 1);
        assert_eq!(tree.text_content(), "say hello to the world");

        let mut found = Vec::new();
        marks(&tree.root, &mut found);
        assert_eq!(found, vec!["hello"]);
    }

    #[test]
    fn multiple_matches_in_one_node() {
        let html = "<html><body><p>abc abc abc</p></body></html>";
        let (tree, outcome) = run(html, "abc");

        // One wrapper, three marks, all for distinct spans
        assert_eq!(outcome.groups.len(), 1);
        assert_eq!(outcome.marks_by_span.len(), 3);
        for ids in &outcome.marks_by_span {
            assert_eq!(ids.len(), 1);
        }
        assert_eq!(tree.text_content(), "abc abc abc");
    }

    #[test]
    fn match_spanning_nodes_records_one_span_many_marks() {
        let html = "<html><body><p>lorem <em>ipsum</em> dolor</p></body></html>";
        let (tree, outcome) = run(html, r"lorem\sipsum\sdolor");

        assert_eq!(outcome.marks_by_span.len(), 1);
        assert_eq!(outcome.marks_by_span[0].len(), 3);
        assert_eq!(outcome.groups.len(), 3);
        assert_eq!(tree.text_content(), "lorem ipsum dolor");
    }

    #[test]
    fn untouched_nodes_keep_identity() {
        let html = "<html><body><p>match here</p><p>nothing</p></body></html>";
        let mut tree = parse_html(html, "https://example.com");
        let body_idx = tree
            .root
            .children
            .iter()
            .position(|c| c.tag == "body")
            .unwrap();
        let before = tree.root.children[body_idx].children[1].clone();

        let index = linearize(&tree.root);
        let re = compile("match", "gi").unwrap();
        let spans = find_spans(&re, &index.text);
        rewrite(&mut tree, &index, &spans);

        assert_eq!(tree.root.children[body_idx].children[1], before);
    }

    #[test]
    fn no_spans_is_a_noop() {
        let html = "<html><body><p>quiet</p></body></html>";
        let mut tree = parse_html(html, "https://example.com");
        let before = tree.clone();
        let index = linearize(&tree.root);
        let outcome = rewrite(&mut tree, &index, &[]);

        assert!(outcome.groups.is_empty());
        assert_eq!(tree, before);
    }
}
