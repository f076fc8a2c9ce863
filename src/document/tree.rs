//! Minimal node tree standing in for a rendered document
//!
//! Highlights mutate the tree (wrapping text in marker elements) but never the
//! text content, so the flattened [`TextIndex`] stays valid for the lifetime of
//! a [`DocumentRoot`].

use std::fmt::Write;

use super::text::{AnchorRoot, TextIndex};

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child; empty text is skipped
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// All descendant elements (depth first) whose attribute `name` equals `value`
    pub fn find_all(&self, name: &str, value: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.find_all_into(name, value, &mut found);
        found
    }

    fn find_all_into<'a>(&'a self, name: &str, value: &str, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if let Node::Element(el) = child {
                if el.attribute(name) == Some(value) {
                    found.push(el);
                }
                el.find_all_into(name, value, found);
            }
        }
    }
}

/// Location of a non-empty text node within the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNodeSpan {
    /// Child indices from the root element down to the text node
    pub path: Vec<usize>,
    /// Char offset of the node's first character in the flattened text
    pub start: usize,
    /// Length of the node in chars
    pub len: usize,
}

impl TextNodeSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Path of the parent element and the node's index within it
    pub fn parent(&self) -> (&[usize], usize) {
        let (parent, last) = self.path.split_at(self.path.len() - 1);
        (parent, last[0])
    }
}

/// A root container the anchoring engine searches and highlights within
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    root: Element,
    index: TextIndex,
    next_highlight: u64,
}

impl DocumentRoot {
    pub fn new(root: Element) -> Self {
        let index = TextIndex::new(root.text_content());
        Self {
            root,
            index,
            next_highlight: 0,
        }
    }

    /// A root holding a single text node
    pub fn from_text(text: &str) -> Self {
        Self::new(Element::new("div").with_text(text))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub(crate) fn next_highlight_key(&mut self) -> String {
        self.next_highlight += 1;
        format!("hl-{}", self.next_highlight)
    }

    /// All non-empty text nodes in document order
    pub fn text_nodes(&self) -> Vec<TextNodeSpan> {
        let mut spans = Vec::new();
        let mut path = Vec::new();
        let mut offset = 0;
        collect_text_nodes(&self.root, &mut path, &mut offset, &mut spans);
        spans
    }

    /// Serialize the tree as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(&self.root, &mut out);
        out
    }
}

impl AnchorRoot for DocumentRoot {
    fn text_index(&self) -> &TextIndex {
        &self.index
    }
}

/// Walk down `path` through element children
pub(crate) fn element_at_mut<'a>(root: &'a mut Element, path: &[usize]) -> Option<&'a mut Element> {
    let mut current = root;
    for &idx in path {
        current = match current.children.get_mut(idx)? {
            Node::Element(el) => el,
            Node::Text(_) => return None,
        };
    }
    Some(current)
}

fn collect_text_nodes(
    el: &Element,
    path: &mut Vec<usize>,
    offset: &mut usize,
    spans: &mut Vec<TextNodeSpan>,
) {
    for (idx, child) in el.children.iter().enumerate() {
        path.push(idx);
        match child {
            Node::Text(text) => {
                let len = text.chars().count();
                if len > 0 {
                    spans.push(TextNodeSpan {
                        path: path.clone(),
                        start: *offset,
                        len,
                    });
                    *offset += len;
                }
            }
            Node::Element(child_el) => collect_text_nodes(child_el, path, offset, spans),
        }
        path.pop();
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attributes {
        let _ = write!(
            out,
            " {}=\"{}\"",
            name,
            html_escape::encode_double_quoted_attribute(value)
        );
    }
    out.push('>');
    for child in &el.children {
        match child {
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Element(child_el) => write_element(child_el, out),
        }
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentRoot {
        DocumentRoot::new(
            Element::new("div")
                .with_child(Element::new("p").with_text("Hello "))
                .with_child(Element::new("p").with_child(Element::new("em").with_text("brave")))
                .with_text(" world"),
        )
    }

    #[test]
    fn test_flattened_text() {
        let doc = sample();
        assert_eq!(doc.text_index().as_str(), "Hello brave world");
    }

    #[test]
    fn test_text_node_paths() {
        let spans = sample().text_nodes();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].path, vec![0, 0]);
        assert_eq!(spans[1].path, vec![1, 0, 0]);
        assert_eq!(spans[1].start, 6);
        assert_eq!(spans[2].path, vec![2]);
        assert_eq!(spans[2].end(), 17);
    }

    #[test]
    fn test_to_html_escapes() {
        let doc = DocumentRoot::new(
            Element::new("div")
                .with_attribute("title", "a \"quote\"")
                .with_text("1 < 2 & 3"),
        );
        assert_eq!(
            doc.to_html(),
            "<div title=\"a &quot;quote&quot;\">1 &lt; 2 &amp; 3</div>"
        );
    }

    #[test]
    fn test_set_attribute_replaces() {
        let el = Element::new("mark")
            .with_attribute("class", "a")
            .with_attribute("class", "b");
        assert_eq!(el.attributes.len(), 1);
        assert_eq!(el.attribute("class"), Some("b"));
    }
}
