//! Generic parsed node tree
//!
//! This is the hand-off format between a markup parser and the
//! [`Builder`](crate::builder::Builder): element names, attributes,
//! children and text, with no semantics attached.

/// A node in the parsed markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with a name, attributes and children
    Element(Element),
    /// A run of character data
    Text(String),
}

/// A markup element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name as written in the source
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in source order
    pub children: Vec<Node>,
}

impl Node {
    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Borrow the element, if this is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Concatenated text of this node and all its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        append_text(self, &mut out);
        out
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an attribute (builder style)
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Add a child node (builder style)
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Add a text child (builder style)
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Look up an attribute value, ignoring ASCII case in the key
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Lower-cased tag name
    pub fn tag(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Child elements, skipping text nodes
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Text held directly by this element (not by descendants)
    pub fn direct_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            append_text(child, &mut out);
        }
        out
    }
}

fn append_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(el) => {
            for child in &el.children {
                append_text(child, out);
            }
        }
    }
}

/// Collapse whitespace runs into single spaces and trim both ends
///
/// No-break spaces are content and survive.
pub fn normalize_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() && c != '\u{a0}')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
