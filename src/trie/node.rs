//! Trie node and edge types

use super::NodeId;
use crate::model::Label;

/// A labeled link from a node to the child it owns
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub(crate) label: Label,
    pub(crate) target: NodeId,
}

impl Edge {
    pub fn new(label: Label, target: NodeId) -> Self {
        Edge { label, target }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn target(&self) -> NodeId {
        self.target
    }
}

/// A vertex in the radix tree
///
/// Only leaves carry values (the root may be a valueless leaf when the tree
/// is empty). `ext` is whatever extra state the tree's node factory attaches.
#[derive(Clone, Debug)]
pub struct Node<V, X = ()> {
    pub(crate) value: Option<V>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) ext: X,
}

impl<V, X> Node<V, X> {
    pub fn new(parent: Option<NodeId>, edges: Vec<Edge>, value: Option<V>, ext: X) -> Self {
        Node {
            value,
            edges,
            parent,
            ext,
        }
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Non-owning handle to the node that owns this one
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn ext(&self) -> &X {
        &self.ext
    }

    pub fn ext_mut(&mut self) -> &mut X {
        &mut self.ext
    }

    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }

    /// A valueless leaf, pending removal during compaction
    pub fn is_dead(&self) -> bool {
        self.edges.is_empty() && self.value.is_none()
    }

    pub(crate) fn edge_to(&self, target: NodeId) -> Option<usize> {
        self.edges.iter().position(|e| e.target == target)
    }
}
