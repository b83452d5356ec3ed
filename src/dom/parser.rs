use crate::dom::{DomNode, DomTree, NodeId};
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;

/// Parse raw HTML into a [`DomTree`].
///
/// Every non-empty text node is kept verbatim, whitespace-only nodes
/// included, and `script`/`noscript` content stays in the tree: the
/// searcher needs the exact source text to restore after highlighting,
/// and decides itself which subtrees to exclude from matching.
pub fn parse_html(html: &str, url: &str) -> DomTree {
    let document = Html::parse_document(html);

    // Extract <title>
    let title = scraper::Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let mut next_id: NodeId = 0;
    let root = convert_element(document.root_element(), &mut next_id);

    DomTree::new(root, url.to_string(), title.trim().to_string(), next_id)
}

fn convert_element(el: ElementRef<'_>, next_id: &mut NodeId) -> DomNode {
    let id = alloc(next_id);
    let tag = el.value().name.local.as_ref().to_string();
    let attributes: HashMap<String, String> = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut children = Vec::new();

    for child_ref in el.children() {
        match child_ref.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child_ref) {
                    children.push(convert_element(child_el, next_id));
                }
            }
            Node::Text(t) => {
                let s = t.text.to_string();
                if !s.is_empty() {
                    children.push(DomNode::text(alloc(next_id), s));
                }
            }
            _ => {}
        }
    }

    DomNode::element(id, tag, attributes, children)
}

fn alloc(next_id: &mut NodeId) -> NodeId {
    let id = *next_id;
    *next_id += 1;
    id
}
