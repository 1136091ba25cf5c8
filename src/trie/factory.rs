//! Node and edge construction strategy
//!
//! The tree never builds nodes or edges directly. It asks its factory, so a
//! specialised tree can attach extra per-node state (`Ext`) or per-insert
//! arguments (`Param`) without touching the traversal and mutation code.

use super::{Edge, Node, NodeId};
use crate::model::Label;

/// Creates the nodes and edges of a [`RadixTree`](super::RadixTree)
pub trait NodeFactory<V> {
    /// Extra state stored on every node
    type Ext;

    /// Extra argument accepted by `add_with_param` and handed to new leaves
    type Param;

    /// Build a node. `param` is `Some` only for the leaf that receives a
    /// newly inserted value.
    fn create_node(
        &self,
        parent: Option<NodeId>,
        edges: Vec<Edge>,
        value: Option<V>,
        param: Option<Self::Param>,
    ) -> Node<V, Self::Ext>;

    /// Build an edge
    fn create_edge(&self, label: Label, target: NodeId) -> Edge {
        Edge::new(label, target)
    }
}

/// Factory for plain nodes with no extra state
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainFactory;

impl<V> NodeFactory<V> for PlainFactory {
    type Ext = ();
    type Param = ();

    fn create_node(
        &self,
        parent: Option<NodeId>,
        edges: Vec<Edge>,
        value: Option<V>,
        _param: Option<()>,
    ) -> Node<V> {
        Node::new(parent, edges, value, ())
    }
}
