//! Simple top-to-bottom block layout.
//!
//! Assigns a bounding box to every rendered node, keyed by node id.
//! The highlight visibility filter and scroll-into-view only need
//! rough vertical positions, so text height is estimated from line
//! wrapping rather than shaped glyphs.

use crate::dom::{style, DomNode, NodeId, NodeType};
use std::collections::HashMap;

/// Bounding box for a laid-out DOM node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Per-node boxes plus the document's scrollable bounds.
#[derive(Debug, Clone, Default)]
pub struct LayoutMap {
    boxes: HashMap<NodeId, LayoutBox>,
    pub scroll_width: f32,
    pub scroll_height: f32,
}

impl LayoutMap {
    pub fn get(&self, id: NodeId) -> Option<&LayoutBox> {
        self.boxes.get(&id)
    }

    /// Whether the node was rendered at all. Nodes inside hidden or
    /// non-visual subtrees have no box, the analog of a null offset
    /// parent.
    pub fn is_laid_out(&self, id: NodeId) -> bool {
        self.boxes.contains_key(&id)
    }
}

const BLOCK_TAGS: &[&str] = &[
    "html",
    "body",
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "table",
    "tr",
    "td",
    "th",
    "form",
    "section",
    "article",
    "aside",
    "main",
    "header",
    "footer",
    "nav",
    "blockquote",
    "pre",
];

/// Tags never rendered (UA default `display: none`).
const UNRENDERED_TAGS: &[&str] = &["script", "noscript", "style", "head", "template"];

/// Per-tag vertical margins (top, bottom) in pixels.
fn tag_margins(tag: &str) -> (f32, f32) {
    match tag {
        "h1" => (24.0, 16.0),
        "h2" => (20.0, 12.0),
        "h3" | "h4" => (16.0, 10.0),
        "h5" | "h6" => (12.0, 8.0),
        "p" => (4.0, 10.0),
        "ul" | "ol" => (8.0, 8.0),
        "li" => (2.0, 2.0),
        "section" | "article" | "main" => (16.0, 16.0),
        "nav" | "header" | "footer" => (12.0, 12.0),
        "blockquote" => (12.0, 12.0),
        "pre" => (8.0, 8.0),
        _ => (0.0, 0.0),
    }
}

fn tag_font_size(tag: &str, parent: f32) -> f32 {
    match tag {
        "h1" => 32.0,
        "h2" => 24.0,
        "h3" => 20.0,
        "h4" => 18.0,
        "h5" | "h6" => 16.0,
        "small" => 12.0,
        _ => parent,
    }
}

fn is_rendered(node: &DomNode) -> bool {
    if node.node_type == NodeType::Text {
        return true;
    }
    if UNRENDERED_TAGS.contains(&node.tag.as_str()) {
        return false;
    }
    if node.attr("hidden").is_some() {
        return false;
    }
    if let Some(inline) = node.attr("style") {
        if style::parse_inline_style(inline).display_none() {
            return false;
        }
    }
    true
}

/// Compute layout for a DOM tree (simple top-to-bottom block model).
pub fn compute_layout(root: &DomNode, viewport_width: f32) -> LayoutMap {
    let mut map = LayoutMap {
        boxes: HashMap::new(),
        scroll_width: viewport_width,
        scroll_height: 0.0,
    };
    let mut cursor_y = 0.0;
    layout_node(root, 0.0, &mut cursor_y, viewport_width, 16.0, &mut map);
    map.scroll_height = cursor_y.max(1.0);
    map
}

fn layout_node(
    node: &DomNode,
    x: f32,
    cursor_y: &mut f32,
    available_width: f32,
    parent_font_size: f32,
    map: &mut LayoutMap,
) {
    // Hidden subtrees get no boxes at all
    if !is_rendered(node) {
        return;
    }

    if node.node_type == NodeType::Text {
        let line_height = parent_font_size * 1.4;
        let chars_per_line = (available_width / (parent_font_size * 0.6)).max(1.0) as usize;
        let lines = (node.text.len() as f32 / chars_per_line as f32).ceil().max(1.0);
        let height = lines * line_height;
        map.boxes.insert(
            node.id,
            LayoutBox {
                x,
                y: *cursor_y,
                width: available_width,
                height,
            },
        );
        *cursor_y += height;
        return;
    }

    let is_block = BLOCK_TAGS.contains(&node.tag.as_str());
    let font_size = tag_font_size(&node.tag, parent_font_size);
    let (margin_top, margin_bottom) = tag_margins(&node.tag);

    if is_block {
        *cursor_y += margin_top;
    }
    let start_y = *cursor_y;

    for child in &node.children {
        layout_node(child, x, cursor_y, available_width, font_size, map);
    }

    map.boxes.insert(
        node.id,
        LayoutBox {
            x,
            y: start_y,
            width: available_width,
            height: *cursor_y - start_y,
        },
    );

    if is_block {
        *cursor_y += margin_bottom;
    }
}
