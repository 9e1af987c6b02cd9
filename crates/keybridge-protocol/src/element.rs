use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute carrying an element's XML namespace.
pub const ATTR_XMLNS: &str = "xmlns";

/// A minimal XML element tree.
///
/// Elements are plain values: modifying a clone never affects the element it
/// was cloned from, which is what lets the interceptor build a replacement
/// stanza without touching the one still owned by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    name: String,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
    #[serde(default)]
    children: Vec<Element>,
    #[serde(default)]
    text: Option<String>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create an element carrying an `xmlns` attribute.
    pub fn with_xmlns(name: &str, xmlns: &str) -> Self {
        Self::new(name).attr(ATTR_XMLNS, xmlns)
    }

    /// Create a leaf element holding character data, e.g. `<print>ABCD</print>`.
    pub fn text_node(name: &str, text: &str) -> Self {
        let mut element = Self::new(name);
        element.text = Some(text.to_string());
        element
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn xmlns(&self) -> Option<&str> {
        self.get_attr(ATTR_XMLNS)
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn set_attr(&mut self, key: &str, value: &str) {
        self.attrs.insert(key.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        self.attrs.remove(key)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Clone this element and append `child` to the copy.
    #[must_use]
    pub fn with_child(&self, child: Element) -> Self {
        let mut copy = self.clone();
        copy.add_child(child);
        copy
    }

    /// First direct child with the given name and namespace.
    pub fn get_child(&self, name: &str, xmlns: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.name == name && c.xmlns() == Some(xmlns))
    }

    /// First direct child with the given name, whatever its namespace.
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Number of direct children with the given name and namespace.
    pub fn count_children(&self, name: &str, xmlns: &str) -> usize {
        self.children
            .iter()
            .filter(|c| c.name == name && c.xmlns() == Some(xmlns))
            .count()
    }

    /// Serialize to an XML string.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }

        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_xml(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

/// Escape XML special characters in attribute values and character data.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
