//! XML document model

use indexmap::IndexMap;

/// A parsed XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// An XML element with its attributes and content in document order
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

impl Element {
    /// True when the element has no content at all (self-closing or
    /// an empty tag pair). Whitespace-only text counts as content,
    /// matching DOM child-node semantics.
    pub fn is_childless(&self) -> bool {
        self.children.is_empty()
    }

    /// Namespace prefix of the element name, if any (`ns:tag` -> `ns`)
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }
}

/// Content node inside an element
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}
