//! Hierarchy nodes.

use confcmp_types::{Properties, NAME_SEPARATOR};
use serde::{Deserialize, Serialize};

/// Whether a node is a leaf component or a grouping node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Leaf,
    Group,
}

/// A node of the hierarchy rebuilt from dotted component names.
///
/// A `Leaf` wraps exactly one component. A `Group` owns ordered children
/// and, when its full name is itself a component, that component's
/// properties. After construction only [`HierarchyNode::marked`] changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Display name: the last segment of the full component name.
    pub name: String,
    /// Ordering key: the nesting depth unless set explicitly.
    pub x_pos: u32,
    pub kind: NodeKind,
    /// Properties of the component this node stands for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
    /// Set when the node has no counterpart in the other hierarchy.
    #[serde(default)]
    pub marked: bool,
}

impl HierarchyNode {
    /// A leaf wrapping one component.
    pub fn leaf(name: impl Into<String>, x_pos: u32, properties: Properties) -> Self {
        Self {
            name: name.into(),
            x_pos,
            kind: NodeKind::Leaf,
            properties: Some(properties),
            children: Vec::new(),
            marked: false,
        }
    }

    /// An empty grouping node.
    pub fn group(name: impl Into<String>, x_pos: u32) -> Self {
        Self {
            name: name.into(),
            x_pos,
            kind: NodeKind::Group,
            properties: None,
            children: Vec::new(),
            marked: false,
        }
    }

    /// Builder-style child insertion, mostly for tests and fixtures.
    pub fn with_child(mut self, child: HierarchyNode) -> Self {
        self.kind = NodeKind::Group;
        self.children.push(child);
        self
    }

    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    /// Returns `true` if `other` stands for the same element: same name,
    /// same ordering key and same kind. Contents are not compared.
    pub fn corresponds_to(&self, other: &HierarchyNode) -> bool {
        self.name == other.name && self.x_pos == other.x_pos && self.kind == other.kind
    }

    /// Direct child by display name.
    pub fn child(&self, name: &str) -> Option<&HierarchyNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(HierarchyNode::node_count).sum::<usize>()
    }

    /// Reset the `marked` flag in this subtree.
    pub fn clear_marks(&mut self) {
        self.marked = false;
        self.children.iter_mut().for_each(HierarchyNode::clear_marks);
    }
}

/// Find a node by its full dotted path.
pub fn find_node<'a>(nodes: &'a [HierarchyNode], path: &str) -> Option<&'a HierarchyNode> {
    let mut segments = path.split(NAME_SEPARATOR);
    let first = segments.next()?;
    let mut node = nodes.iter().find(|n| n.name == first)?;
    for segment in segments {
        node = node.child(segment)?;
    }
    Some(node)
}

/// Full dotted paths of every marked node, in depth-first order.
///
/// Descendants of a marked node are not listed separately.
pub fn marked_paths(nodes: &[HierarchyNode]) -> Vec<String> {
    let mut out = Vec::new();
    collect_marked(nodes, "", &mut out);
    out
}

fn collect_marked(nodes: &[HierarchyNode], prefix: &str, out: &mut Vec<String>) {
    for node in nodes {
        let path = if prefix.is_empty() {
            node.name.clone()
        } else {
            format!("{prefix}{NAME_SEPARATOR}{}", node.name)
        };
        if node.marked {
            out.push(path);
        } else {
            collect_marked(&node.children, &path, out);
        }
    }
}

/// Reset every mark in a sibling sequence.
pub fn clear_marks(nodes: &mut [HierarchyNode]) {
    nodes.iter_mut().for_each(HierarchyNode::clear_marks);
}
