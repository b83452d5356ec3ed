pub mod parser;
pub mod style;

use std::collections::HashMap;

/// Stable identity of a node within one [`DomTree`].
///
/// Search bookkeeping is addressed by id rather than by reference, so
/// results stay meaningful while the tree is being rewritten.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
}

/// Internal DOM node representation.
#[derive(Debug, Clone, PartialEq)]
pub struct DomNode {
    pub id: NodeId,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
}

impl DomNode {
    pub fn element(
        id: NodeId,
        tag: impl Into<String>,
        attrs: HashMap<String, String>,
        children: Vec<DomNode>,
    ) -> Self {
        Self {
            id,
            tag: tag.into(),
            attributes: attrs,
            text: String::new(),
            children,
            node_type: NodeType::Element,
        }
    }

    pub fn text(id: NodeId, content: impl Into<String>) -> Self {
        Self {
            id,
            tag: String::new(),
            attributes: HashMap::new(),
            text: content.into(),
            children: Vec::new(),
            node_type: NodeType::Text,
        }
    }

    /// Recursively count all nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Exact concatenation of all text in this subtree, in document
    /// order. Unlike a renderer's text extraction, nothing is trimmed:
    /// the result must match the source byte for byte.
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.text_content_inner(&mut buf);
        buf
    }

    fn text_content_inner(&self, buf: &mut String) {
        if self.node_type == NodeType::Text {
            buf.push_str(&self.text);
        }
        for child in &self.children {
            child.text_content_inner(buf);
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Find a node by id anywhere in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&DomNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Replace the node with the given id by `replacement`, keeping its
    /// position among its siblings. Returns false if the id is not in
    /// this subtree.
    pub fn replace(&mut self, id: NodeId, replacement: DomNode) -> bool {
        let mut replacement = Some(replacement);
        self.replace_inner(id, &mut replacement)
    }

    fn replace_inner(&mut self, id: NodeId, replacement: &mut Option<DomNode>) -> bool {
        for child in &mut self.children {
            if child.id == id {
                if let Some(node) = replacement.take() {
                    *child = node;
                }
                return true;
            }
            if child.replace_inner(id, replacement) {
                return true;
            }
        }
        false
    }
}

/// Parsed DOM tree with metadata and the id allocator for nodes
/// created after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct DomTree {
    pub root: DomNode,
    pub url: String,
    pub title: String,
    next_id: NodeId,
}

impl DomTree {
    pub fn new(root: DomNode, url: String, title: String, next_id: NodeId) -> Self {
        Self {
            root,
            url,
            title,
            next_id,
        }
    }

    /// Allocate an id for a node about to be inserted into this tree.
    pub fn alloc_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn find(&self, id: NodeId) -> Option<&DomNode> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        self.root.find_mut(id)
    }

    pub fn replace(&mut self, id: NodeId, replacement: DomNode) -> bool {
        if self.root.id == id {
            self.root = replacement;
            return true;
        }
        self.root.replace(id, replacement)
    }

    pub fn text_content(&self) -> String {
        self.root.text_content()
    }
}
