//! Owned element tree consumed by the converter.
//!
//! The tree is produced once by a parser (see [`crate::html`]) or built by hand
//! in tests, and is only ever read during conversion.

use indexmap::IndexMap;

/// Kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,

    /// Lowercase tag name for elements, `#text` for text nodes
    pub name: String,

    /// Raw text for text nodes
    pub value: Option<String>,

    /// Attributes in source order
    pub attributes: IndexMap<String, String>,

    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            kind: NodeKind::Element,
            name: tag_name.to_lowercase(),
            value: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            kind: NodeKind::Text,
            name: "#text".to_string(),
            value: Some(content.to_string()),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style child append, handy for assembling trees in tests
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Builder-style text child append
    pub fn with_text(self, content: &str) -> Self {
        self.with_child(Node::text(content))
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn tag_name(&self) -> &str {
        &self.name
    }

    /// Get an attribute value by (case-insensitive) name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Read a `data-*` attribute, e.g. `data("testid")` for `data-testid`
    pub fn data(&self, key: &str) -> Option<&str> {
        self.attr(&format!("data-{key}"))
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Set an attribute, replacing any existing value with the same name
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let key = name.to_lowercase();
        self.attributes.insert(key, value.to_string());
    }

    /// First descendant element (depth-first, document order) with the given tag
    pub fn find_descendant(&self, tag: &str) -> Option<&Node> {
        for child in self.element_children() {
            if child.name == tag {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out, false);
        out
    }

    /// Text content with `<br>` elements rendered as newlines, as needed for
    /// preformatted blocks that use line breaks instead of literal newlines.
    pub fn code_text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out, true);
        out
    }

    fn push_text(&self, out: &mut String, breaks: bool) {
        match self.kind {
            NodeKind::Text => out.push_str(self.value.as_deref().unwrap_or_default()),
            NodeKind::Element if breaks && self.name == "br" => out.push('\n'),
            NodeKind::Element => {
                for child in &self.children {
                    child.push_text(out, breaks);
                }
            }
        }
    }
}

/// A node seen during traversal, with the context a filter may need about
/// where it sits in the tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub node: &'a Node,
    parent_tag: Option<&'a str>,
    index: usize,
}

impl<'a> NodeRef<'a> {
    /// Create a new NodeRef without parent context
    pub fn new(node: &'a Node) -> Self {
        Self {
            node,
            parent_tag: None,
            index: 0,
        }
    }

    /// Create a NodeRef for the `index`-th element child of a `parent_tag` element
    pub fn with_parent(node: &'a Node, parent_tag: &'a str, index: usize) -> Self {
        Self {
            node,
            parent_tag: Some(parent_tag),
            index,
        }
    }

    pub fn parent_tag(&self) -> Option<&'a str> {
        self.parent_tag
    }

    /// Position among the parent's element children, zero based
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tag_name(&self) -> &'a str {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.has_attr(name)
    }

    pub fn data(&self, key: &str) -> Option<&'a str> {
        self.node.data(key)
    }

    pub fn element_children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.element_children()
    }

    pub fn find_descendant(&self, tag: &str) -> Option<&'a Node> {
        self.node.find_descendant(tag)
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }

    pub fn code_text(&self) -> String {
        self.node.code_text()
    }
}
