//! Rebuildable structure trees
//!
//! A structure is a labeled tree of named fields, rebuilt wholesale each
//! time the instrumented code publishes it; there is no incremental
//! patching. Producers describe the tree through a write-only
//! [`StructureBuilder`] passed to their callback; the consumer thread runs
//! the callback and swaps the finished child list into the entry.
//!
//! A node with a value and no children renders as a leaf row; a node with
//! children and no value renders as a collapsible group.

use crate::types::ScalarValue;
use serde::{Deserialize, Serialize};

/// One node of a structure tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureNode {
    /// Display label
    pub label: String,
    /// Scalar payload, absent for pure group nodes
    pub value: Option<ScalarValue>,
    /// Ordered children, unbounded depth
    pub children: Vec<StructureNode>,
}

impl StructureNode {
    /// Create a leaf node carrying a value
    pub fn leaf(label: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self {
            label: label.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Create a valueless group node
    pub fn group(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// True when this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True when this node has children
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A structure slot inside a tab
///
/// `has_content` is true only if the most recent rebuild produced at least
/// one child; entries without content stay allocated but are invisible to
/// readers and to the renderer.
#[derive(Debug, Clone)]
pub struct StructureEntry {
    /// Root node; its label is the entry's key
    pub root: StructureNode,
    /// Whether the last rebuild produced any children
    pub has_content: bool,
}

impl StructureEntry {
    /// Create an empty entry for the given key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            root: StructureNode::group(key),
            has_content: false,
        }
    }

    /// Rebuild the entry's content from scratch
    ///
    /// Prior children are discarded before the builder runs; nothing is
    /// merged. An empty builder leaves the entry without content.
    pub fn rebuild(&mut self, build: impl FnOnce(&mut StructureBuilder<'_>)) {
        self.root.value = None;
        self.root.children.clear();

        let mut builder = StructureBuilder {
            nodes: &mut self.root.children,
        };
        build(&mut builder);

        self.has_content = !self.root.children.is_empty();
    }
}

/// Write-only builder bound to one node's child list
///
/// Obtained inside the callback passed to
/// [`Tab::update_structure`](crate::model::Tab::update_structure).
/// [`nested`](Self::nested) returns a builder scoped to the new group's
/// children, so arbitrarily deep trees are written with plain nesting:
///
/// ```
/// # use televis_rs::model::StructureEntry;
/// let mut entry = StructureEntry::new("player");
/// entry.rebuild(|b| {
///     b.field("health", 97);
///     let mut position = b.nested("position");
///     position.field("x", 1.0f32);
///     position.field("y", 2.0f32);
/// });
/// assert!(entry.has_content);
/// ```
pub struct StructureBuilder<'a> {
    nodes: &'a mut Vec<StructureNode>,
}

impl StructureBuilder<'_> {
    /// Append a leaf field
    pub fn field(&mut self, label: impl Into<String>, value: impl Into<ScalarValue>) -> &mut Self {
        self.nodes.push(StructureNode::leaf(label, value));
        self
    }

    /// Append a valueless group and return a builder scoped to its children
    pub fn nested(&mut self, label: impl Into<String>) -> StructureBuilder<'_> {
        self.nodes.push(StructureNode::group(label));
        let group = self.nodes.last_mut().unwrap();
        StructureBuilder {
            nodes: &mut group.children,
        }
    }
}
