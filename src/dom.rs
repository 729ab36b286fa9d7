//! Host document capability consumed by the scanner.
//!
//! The scanner never owns the page. Everything it knows about the document
//! comes through [`Document`], which is implemented over a live Chrome tab
//! ([`crate::Page`]) and over parsed HTML ([`crate::HtmlSnapshot`]).

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque, non-owning handle to an element in a [`Document`].
///
/// Handles are only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag name and attributes of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeInfo {
    /// Lowercase tag name.
    pub tag: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl NodeInfo {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value, treating a whitespace-only value as absent.
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// `type` attribute of an input, lowercased. Missing means `""`.
    pub fn input_type(&self) -> String {
        self.attr("type").unwrap_or_default().trim().to_ascii_lowercase()
    }

    pub fn is_input_of_type(&self, ty: &str) -> bool {
        self.tag == "input" && self.input_type() == ty
    }
}

/// Synthetic interaction dispatched on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    MouseDown,
    MouseUp,
    Click,
    Focus,
    Blur,
    /// Escape keydown/keyup pair.
    Escape,
}

/// Abstract view of the page the scanner works against.
///
/// All queries return elements in document order.
#[async_trait(?Send)]
pub trait Document {
    /// All elements in the document matching `selector`.
    async fn query_all(&self, selector: &str) -> Result<Vec<NodeId>>;

    /// Descendants of `scope` matching `selector`.
    async fn query_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>>;

    /// `node` itself or its nearest ancestor matching `selector`.
    async fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>>;

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>>;

    async fn describe(&self, node: NodeId) -> Result<NodeInfo>;

    /// Text content of the element and its descendants.
    async fn text(&self, node: NodeId) -> Result<String>;

    /// Text of the first non-blank sibling that follows `node`, whether it
    /// is a bare text node or an element.
    async fn following_text(&self, node: NodeId) -> Result<Option<String>>;

    async fn is_visible(&self, node: NodeId) -> Result<bool>;

    async fn dispatch(&self, node: NodeId, event: DomEvent) -> Result<()>;

    async fn query_first(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_first_within(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_within(scope, selector).await?.into_iter().next())
    }
}

/// Quote a value for use inside a double-quoted CSS attribute selector.
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_string_escapes_quotes_and_backslashes() {
        assert_eq!(css_string("question_1[]"), r#""question_1[]""#);
        assert_eq!(css_string(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn input_type_defaults_to_empty() {
        let info = NodeInfo {
            tag: "input".into(),
            attributes: HashMap::new(),
        };
        assert_eq!(info.input_type(), "");
        assert!(!info.is_input_of_type("checkbox"));
    }
}
