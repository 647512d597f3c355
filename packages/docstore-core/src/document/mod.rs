//! Ordered document tree and its file persistence.
//!
//! A [`Node`] has a name, string-valued attributes, a text body and an
//! ordered list of children. The whole store is one tree rooted at
//! [`crate::vocabulary::ROOT_NODE`].

pub mod io_utils;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use io_utils::{load_document, save_document};

/// A single node of the document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    /// Creates an empty node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates a leaf node holding `text`.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text body of this node only (children are not included).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Concatenated text of this node and all of its descendants, in document order.
    pub fn inner_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.inner_text());
        }
        out
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.children.iter_mut()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    /// First child with the given name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// Appends a child after the existing ones.
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Removes every child matching `predicate`, keeping the order of the rest.
    ///
    /// Returns the number of removed children.
    pub fn remove_children_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Node) -> bool,
    {
        let before = self.children.len();
        self.children.retain(|child| !predicate(child));
        before - self.children.len()
    }

    /// Removes all children and returns how many there were.
    pub fn clear_children(&mut self) -> usize {
        let count = self.children.len();
        self.children.clear();
        count
    }
}

/// Checks that `name` can be used as a node name.
///
/// Names start with an ASCII letter or `_` and continue with ASCII
/// alphanumerics, `_`, `-` or `.`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
