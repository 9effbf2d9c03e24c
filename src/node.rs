//! Defines [`RenderNode`], the in-memory element the highlighter builds for a
//! code block before it is serialized into the output document.

use crate::escape::EscapeHtml;
use std::collections::BTreeMap;
use std::fmt;

/// An HTML element produced while rendering a code block. Nodes are created
/// by [`crate::highlight::Highlighter`], handed to the transformer hooks, and
/// then serialized with [`fmt::Display`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderNode {
    /// The element name, e.g. `pre`.
    pub tag_name: String,

    /// The element's attributes. Values are escaped on output; keys are
    /// written as-is and in sorted order.
    pub properties: BTreeMap<String, String>,

    /// The element's content.
    pub children: Vec<Child>,
}

/// A single piece of a [`RenderNode`]'s content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Child {
    Element(RenderNode),

    /// Raw text. Escaped on output.
    Text(String),
}

impl RenderNode {
    /// Creates an element with no properties or children.
    pub fn new(tag_name: &str) -> RenderNode {
        RenderNode {
            tag_name: tag_name.to_owned(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets a property and returns the node, for building nodes inline.
    pub fn with_property(mut self, key: &str, value: &str) -> RenderNode {
        self.set_property(key, value);
        self
    }

    /// Sets (or overwrites) a property.
    pub fn set_property(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_owned(), value.to_owned());
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn push_element(&mut self, element: RenderNode) {
        self.children.push(Child::Element(element));
    }

    pub fn push_text(&mut self, text: &str) {
        self.children.push(Child::Text(text.to_owned()));
    }

    /// Returns the concatenated text of every descendant.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Child::Element(element) => element.collect_text(out),
                Child::Text(text) => out.push_str(text),
            }
        }
    }
}

impl fmt::Display for RenderNode {
    /// Serializes the node and its descendants as HTML.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}", self.tag_name)?;
        for (key, value) in &self.properties {
            write!(f, r#" {}="{}""#, key, EscapeHtml(value))?;
        }
        f.write_str(">")?;
        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.tag_name)
    }
}

impl fmt::Display for Child {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Child::Element(element) => fmt::Display::fmt(element, f),
            Child::Text(text) => fmt::Display::fmt(&EscapeHtml(text), f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_escapes_values_and_text() {
        let mut node = RenderNode::new("pre").with_property("title", r#"a "b""#);
        let mut code = RenderNode::new("code");
        code.push_text("x < y && y > z");
        node.push_element(code);

        assert_eq!(
            r#"<pre title="a &quot;b&quot;"><code>x &lt; y &amp;&amp; y &gt; z</code></pre>"#,
            node.to_string(),
        );
    }

    #[test]
    fn test_display_orders_properties() {
        let node = RenderNode::new("pre")
            .with_property("tabindex", "0")
            .with_property("class", "shiki")
            .with_property("data-language", "");
        assert_eq!(
            r#"<pre class="shiki" data-language="" tabindex="0"></pre>"#,
            node.to_string(),
        );
    }

    #[test]
    fn test_text_content() {
        let mut node = RenderNode::new("code");
        let mut line = RenderNode::new("span");
        line.push_text("fn main() {}");
        node.push_element(line);
        node.push_text("\n");
        assert_eq!("fn main() {}\n", node.text_content());
    }
}
