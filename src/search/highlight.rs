//! Highlight units: wrapper restoration and selection painting.

use crate::dom::{style, DomNode, DomTree, NodeId};
use crate::render::layout::LayoutMap;
use crate::render::Viewport;

use super::rewrite::{GROUP_ATTRIBUTE, HIGHLIGHT_COLOR};

/// Background applied to the currently selected match.
pub const SELECTED_COLOR: &str = "#ff8000";
/// Gap kept between the viewport top and a selected match on scroll.
const SCROLL_MARGIN: f32 = 150.0;

/// Wrapper element that replaced one matched text node.
///
/// Clearing merges the wrapper's text back into a single text node at
/// the same position, exactly reversing the split.
#[derive(Debug)]
pub struct HighlightGroup {
    wrapper_id: NodeId,
}

impl HighlightGroup {
    pub(crate) fn new(wrapper_id: NodeId) -> Self {
        Self { wrapper_id }
    }

    /// Restore the original text node. Idempotent: a wrapper that is
    /// already gone is left alone.
    pub fn clear(&self, tree: &mut DomTree) {
        let Some(text) = tree.find(self.wrapper_id).map(DomNode::text_content) else {
            return;
        };
        let id = tree.alloc_id();
        tree.replace(self.wrapper_id, DomNode::text(id, text));
    }
}

/// Merge every wrapper still in the tree back into a plain text node,
/// whether or not the store is tracking it. Catches wrappers left over
/// from an earlier searcher over the same tree.
pub fn clear_all_groups(tree: &mut DomTree) {
    let mut wrapper_ids = Vec::new();
    collect_wrappers(&tree.root, &mut wrapper_ids);
    for id in wrapper_ids {
        HighlightGroup::new(id).clear(tree);
    }
}

fn collect_wrappers(node: &DomNode, out: &mut Vec<NodeId>) {
    if node.attr(GROUP_ATTRIBUTE).is_some() {
        out.push(node.id);
        // A wrapper never nests another wrapper
        return;
    }
    for child in &node.children {
        collect_wrappers(child, out);
    }
}

/// One navigable match: the highlighted slices of a single span, in
/// document order.
#[derive(Debug)]
pub struct Highlight {
    mark_ids: Vec<NodeId>,
}

impl Highlight {
    pub(crate) fn new(mark_ids: Vec<NodeId>) -> Self {
        Self { mark_ids }
    }

    /// Paint all slices with the selected background and scroll the
    /// first one into view, offset from the viewport edge.
    pub fn select(&self, tree: &mut DomTree, layout: &LayoutMap, viewport: &mut Viewport) {
        self.paint(tree, SELECTED_COLOR);
        if let Some(bounds) = self.mark_ids.first().and_then(|id| layout.get(*id)) {
            viewport.scroll_to(0.0, bounds.y - SCROLL_MARGIN);
        }
    }

    /// Drop back to the default highlight background.
    pub fn unselect(&self, tree: &mut DomTree) {
        self.paint(tree, HIGHLIGHT_COLOR);
    }

    fn paint(&self, tree: &mut DomTree, color: &str) {
        for id in &self.mark_ids {
            if let Some(node) = tree.find_mut(*id) {
                let patched =
                    style::with_background_color(node.attr("style").unwrap_or(""), color);
                node.set_attr("style", patched);
            }
        }
    }

    /// Whether this match is navigable: every slice was laid out (no
    /// hidden ancestor) and its box intersects the scrollable bounds.
    pub fn is_visible(&self, layout: &LayoutMap) -> bool {
        !self.mark_ids.is_empty()
            && self.mark_ids.iter().all(|id| {
                layout.get(*id).is_some_and(|b| {
                    b.x + b.width > 0.0
                        && b.x < layout.scroll_width
                        && b.y + b.height > 0.0
                        && b.y < layout.scroll_height
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;
    use crate::render::layout::compute_layout;
    use crate::search::linearize::linearize;
    use crate::search::matcher::{compile, find_spans};
    use crate::search::rewrite::{rewrite, MARK_ATTRIBUTE};

    fn searched(html: &str, pattern: &str) -> (DomTree, Vec<HighlightGroup>, Vec<Highlight>) {
        let mut tree = parse_html(html, "https://example.com");
        let index = linearize(&tree.root);
        let re = compile(pattern, "gi").unwrap();
        let spans = find_spans(&re, &index.text);
        let outcome = rewrite(&mut tree, &index, &spans);
        let (groups, highlights) = outcome.into_parts();
        (tree, groups, highlights)
    }

    fn mark_styles(node: &DomNode, out: &mut Vec<String>) {
        if node.attr(MARK_ATTRIBUTE).is_some() {
            out.push(node.attr("style").unwrap_or("").to_string());
        }
        for child in &node.children {
            mark_styles(child, out);
        }
    }

    #[test]
    fn clear_restores_original_text() {
        let html = "<html><body><p>say hello twice: hello</p></body></html>";
        let (mut tree, groups, _) = searched(html, "hello");
        assert_eq!(groups.len(), 1);

        groups[0].clear(&mut tree);
        assert_eq!(tree.text_content(), "say hello twice: hello");

        let mut styles = Vec::new();
        mark_styles(&tree.root, &mut styles);
        assert!(styles.is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let html = "<html><body><p>hello</p></body></html>";
        let (mut tree, groups, _) = searched(html, "hello");

        groups[0].clear(&mut tree);
        let after_first = tree.clone();
        groups[0].clear(&mut tree);
        assert_eq!(tree, after_first);
    }

    #[test]
    fn clear_all_sweeps_every_wrapper() {
        let html = "<html><body><p>hello</p><p>hello again</p></body></html>";
        let (mut tree, groups, _) = searched(html, "hello");
        assert_eq!(groups.len(), 2);

        clear_all_groups(&mut tree);
        assert_eq!(tree.text_content(), "hellohello again");

        let mut styles = Vec::new();
        mark_styles(&tree.root, &mut styles);
        assert!(styles.is_empty());
    }

    #[test]
    fn select_paints_and_scrolls() {
        let html = "<html><body><p>padding text</p><p>hello</p></body></html>";
        let (mut tree, _, highlights) = searched(html, "hello");
        assert_eq!(highlights.len(), 1);

        let layout = compute_layout(&tree.root, 1280.0);
        let mut viewport = Viewport::new(1280.0, 800.0);
        highlights[0].select(&mut tree, &layout, &mut viewport);

        let mut styles = Vec::new();
        mark_styles(&tree.root, &mut styles);
        assert_eq!(styles, vec![format!("background-color: {};", SELECTED_COLOR)]);

        highlights[0].unselect(&mut tree);
        styles.clear();
        mark_styles(&tree.root, &mut styles);
        assert_eq!(styles, vec![format!("background-color: {};", HIGHLIGHT_COLOR)]);
    }

    #[test]
    fn hidden_match_is_not_visible() {
        let html = "<html><body><p hidden>hello</p><p>hello</p></body></html>";
        let (tree, _, highlights) = searched(html, "hello");
        assert_eq!(highlights.len(), 2);

        let layout = compute_layout(&tree.root, 1280.0);
        assert!(!highlights[0].is_visible(&layout));
        assert!(highlights[1].is_visible(&layout));
    }
}
