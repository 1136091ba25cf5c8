//! Radix tree: insertion, lookup and deletion with compaction

use super::arena::NodeArena;
use super::{Edge, Node, NodeFactory, NodeId, PlainFactory};
use crate::config::TreeConfig;
use crate::model::Label;
use crate::{Error, Result};
use tracing::{debug, trace};

/// Outcome of [`RadixTree::search`]
#[derive(Debug)]
pub struct Lookup<'a, V> {
    /// Whether the key is present with a value
    pub found: bool,
    /// The node the key resolved to, if the traversal consumed the whole key
    pub node: Option<NodeId>,
    pub value: Option<&'a V>,
}

impl<'a, V> Lookup<'a, V> {
    fn missing() -> Self {
        Lookup {
            found: false,
            node: None,
            value: None,
        }
    }
}

/// A PATRICIA trie over byte-sequence keys
///
/// Nodes live in an arena and are addressed by [`NodeId`]. Sibling edge
/// labels never share a prefix, only leaves hold values, and every internal
/// node below the root has at least two children.
pub struct RadixTree<V, F: NodeFactory<V> = PlainFactory> {
    pub(crate) nodes: NodeArena<Node<V, F::Ext>>,
    pub(crate) root: NodeId,
    pub(crate) factory: F,
    pub(crate) config: TreeConfig,
    len: usize,
}

impl<V> RadixTree<V> {
    /// Create a new empty tree with plain nodes
    pub fn new() -> Self {
        Self::with_factory(PlainFactory)
    }

    /// Create a new empty tree with plain nodes and the given config
    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_factory_and_config(PlainFactory, config)
    }
}

impl<V> Default for RadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, F: NodeFactory<V>> RadixTree<V, F> {
    /// Create a new empty tree whose nodes are built by `factory`
    pub fn with_factory(factory: F) -> Self {
        Self::with_factory_and_config(factory, TreeConfig::default())
    }

    pub fn with_factory_and_config(factory: F, config: TreeConfig) -> Self {
        let root = factory.create_node(None, Vec::new(), None, None);
        let (nodes, root) = NodeArena::with_root(config.initial_capacity, root);
        RadixTree {
            nodes,
            root,
            factory,
            config,
            len: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by handle; `None` once the node has been removed
    pub fn node(&self, id: NodeId) -> Option<&Node<V, F::Ext>> {
        self.nodes.get(id)
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of keys stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert `key` with `value`, returning the leaf that holds it
    ///
    /// Re-inserting an existing key replaces its value in place and returns
    /// the same leaf.
    pub fn add(&mut self, key: impl AsRef<[u8]>, value: V) -> Result<NodeId> {
        self.insert_inner(key.as_ref(), value, None)
    }

    /// Like [`add`](Self::add), handing `param` to the factory when the new
    /// leaf is created. Ignored when the key already exists.
    pub fn add_with_param(
        &mut self,
        key: impl AsRef<[u8]>,
        value: V,
        param: F::Param,
    ) -> Result<NodeId> {
        self.insert_inner(key.as_ref(), value, Some(param))
    }

    fn insert_inner(&mut self, key: &[u8], value: V, param: Option<F::Param>) -> Result<NodeId> {
        let mut current = self.root;
        // Offset in symbols; `key.len()` is the end-of-key marker itself.
        let mut offset = 0;

        loop {
            if offset > key.len() {
                return self.overwrite(current, value);
            }

            let step = self
                .resolve(current)?
                .edges
                .iter()
                .enumerate()
                .find_map(|(j, edge)| {
                    let matched = edge.label.match_key(key, offset);
                    (matched > 0).then(|| (j, matched, edge.label.len(), edge.target))
                });

            match step {
                None => return self.attach_leaf(current, key, offset, value, param),
                Some((_, matched, label_len, target)) if matched == label_len => {
                    trace!(node = %current, child = %target, matched, "following edge");
                    offset += matched;
                    current = target;
                }
                Some((j, matched, _, _)) => {
                    return self.split_edge(current, j, matched, key, offset, value, param)
                }
            }
        }
    }

    fn overwrite(&mut self, leaf: NodeId, value: V) -> Result<NodeId> {
        let node = self.resolve_mut(leaf)?;
        if !node.is_leaf() {
            return Err(self.corruption(leaf, "key terminates on an internal node"));
        }
        node.value = Some(value);
        debug!(node = %leaf, "overwrote existing value");
        self.changed_node(leaf)?;
        Ok(leaf)
    }

    fn attach_leaf(
        &mut self,
        parent: NodeId,
        key: &[u8],
        offset: usize,
        value: V,
        param: Option<F::Param>,
    ) -> Result<NodeId> {
        self.nodes.ensure_room(1)?;
        let leaf = self
            .nodes
            .insert(self.factory.create_node(Some(parent), Vec::new(), Some(value), param))?;
        let edge = self.factory.create_edge(Label::key_remainder(key, offset), leaf);
        self.resolve_mut(parent)?.edges.push(edge);
        self.len += 1;

        self.changed_node(parent)?;
        self.changed_node(leaf)?;
        Ok(leaf)
    }

    /// Split edge `j` of `current` after `matched` symbols and hang a new
    /// leaf for the rest of `key` off the split point
    #[allow(clippy::too_many_arguments)]
    fn split_edge(
        &mut self,
        current: NodeId,
        j: usize,
        matched: usize,
        key: &[u8],
        offset: usize,
        value: V,
        param: Option<F::Param>,
    ) -> Result<NodeId> {
        self.nodes.ensure_room(2)?;
        let old = self.resolve_mut(current)?.edges.remove(j);
        let (head, tail) = old.label.split_at(matched);

        let middle = self
            .nodes
            .insert(self.factory.create_node(Some(current), Vec::new(), None, None))?;
        let edge = self.factory.create_edge(head, middle);
        self.resolve_mut(current)?.edges.push(edge);

        let edge = self.factory.create_edge(tail, old.target);
        self.resolve_mut(middle)?.edges.push(edge);
        self.resolve_mut(old.target)?.parent = Some(middle);

        let leaf = self
            .nodes
            .insert(self.factory.create_node(Some(middle), Vec::new(), Some(value), param))?;
        let edge = self
            .factory
            .create_edge(Label::key_remainder(key, offset + matched), leaf);
        self.resolve_mut(middle)?.edges.push(edge);
        self.len += 1;

        debug!(parent = %current, middle = %middle, leaf = %leaf, matched, "split edge");
        self.changed_node(middle)?;
        self.changed_node(leaf)?;
        Ok(leaf)
    }

    /// Find `key`, advancing only over edges that match it exactly
    pub fn search(&self, key: impl AsRef<[u8]>) -> Lookup<'_, V> {
        let key = key.as_ref();
        let mut current = self.root;
        let mut offset = 0;

        while offset <= key.len() {
            let Some(node) = self.nodes.get(current) else {
                return Lookup::missing();
            };
            let next = node.edges.iter().find(|edge| {
                let len = edge.label.len();
                edge.label.match_key(key, offset) == len
            });
            match next {
                Some(edge) => {
                    offset += edge.label.len();
                    current = edge.target;
                }
                None => return Lookup::missing(),
            }
        }

        match self.nodes.get(current) {
            Some(node) => Lookup {
                found: node.value.is_some(),
                node: Some(current),
                value: node.value.as_ref(),
            },
            None => Lookup::missing(),
        }
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        self.search(key).value
    }

    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut V> {
        let id = self.search(key).node?;
        self.nodes.get_mut(id)?.value.as_mut()
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.search(key).found
    }

    /// Remove `key`, compacting the path it leaves behind
    ///
    /// Returns `Ok(false)` without touching the tree when the key is absent.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> Result<bool> {
        let key = key.as_ref();
        let target = match self.search(key) {
            Lookup {
                found: true,
                node: Some(id),
                ..
            } => id,
            _ => return Ok(false),
        };

        let node = self.resolve_mut(target)?;
        if !node.is_leaf() {
            return Err(Error::NotLeaf {
                key: hex::encode(key),
                node: target,
            });
        }
        node.value = None;
        self.len -= 1;

        self.compact(target)?;
        Ok(true)
    }

    /// Walk up from a freshly emptied node until a full pass changes nothing
    fn compact(&mut self, start: NodeId) -> Result<()> {
        let mut node = start;
        let mut finished = false;

        while !finished {
            finished = true;
            let parent = self.resolve(node)?.parent;

            // dead node under a parent that would be left with one child
            if let Some(parent) = parent {
                let collapsible = parent != self.root && self.resolve(node)?.is_dead() && {
                    let p = self.resolve(parent)?;
                    !p.is_leaf() && p.edges.len() == 2
                };
                if collapsible {
                    self.detach(parent, node)?;
                    node = self.collapse(parent)?;
                    finished = false;
                    self.changed_node(node)?;
                }
            }

            if self.prune_dead_children(node)? {
                finished = false;
                let n = self.resolve(node)?;
                if node != self.root && n.edges.len() == 1 {
                    node = self.collapse(node)?;
                    self.changed_node(node)?;
                }
            }

            let n = self.resolve(node)?;
            if node != self.root && n.is_dead() {
                if let Some(parent) = n.parent {
                    self.detach(parent, node)?;
                    node = parent;
                    finished = false;
                    self.changed_node(node)?;
                }
            }
        }

        Ok(())
    }

    /// Drop every child of `id` that is a valueless leaf
    fn prune_dead_children(&mut self, id: NodeId) -> Result<bool> {
        let dead: Vec<NodeId> = self
            .resolve(id)?
            .edges
            .iter()
            .map(|edge| edge.target)
            .filter(|target| self.nodes.get(*target).is_some_and(|n| n.is_dead()))
            .collect();
        if dead.is_empty() {
            return Ok(false);
        }

        self.resolve_mut(id)?.edges.retain(|edge| !dead.contains(&edge.target));
        for target in dead {
            self.nodes.remove(target);
        }
        Ok(true)
    }

    /// Remove the edge from `parent` to `child` and free `child`
    fn detach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let p = self.resolve_mut(parent)?;
        match p.edge_to(child) {
            Some(j) => {
                p.edges.remove(j);
            }
            None => return Err(self.corruption(parent, format!("no edge to child {}", child))),
        }
        self.nodes.remove(child);
        trace!(parent = %parent, child = %child, "detached node");
        Ok(())
    }

    /// Merge single-child `id` into its child, returning the child
    fn collapse(&mut self, id: NodeId) -> Result<NodeId> {
        let node = self.resolve(id)?;
        let grandparent = match node.parent {
            Some(gp) => gp,
            None => return Err(self.corruption(id, "cannot collapse the root")),
        };
        if node.edges.len() != 1 {
            return Err(self.corruption(id, "collapse requires exactly one child"));
        }
        let child_edge = node.edges[0].clone();

        let gp = self.resolve(grandparent)?;
        let j = match gp.edge_to(id) {
            Some(j) => j,
            None => return Err(self.corruption(grandparent, format!("no edge to child {}", id))),
        };
        let merged = match gp.edges[j].label.concat(&child_edge.label) {
            Some(label) => label,
            None => return Err(self.corruption(grandparent, "terminal label leads to internal node")),
        };

        let edge = self.factory.create_edge(merged, child_edge.target);
        self.resolve_mut(grandparent)?.edges[j] = edge;
        self.resolve_mut(child_edge.target)?.parent = Some(grandparent);
        self.nodes.remove(id);

        debug!(removed = %id, grandparent = %grandparent, child = %child_edge.target, "collapsed single-child node");
        Ok(child_edge.target)
    }

    pub(crate) fn resolve(&self, id: NodeId) -> Result<&Node<V, F::Ext>> {
        self.nodes.get(id).ok_or(Error::DanglingNode(id))
    }

    fn resolve_mut(&mut self, id: NodeId) -> Result<&mut Node<V, F::Ext>> {
        self.nodes.get_mut(id).ok_or(Error::DanglingNode(id))
    }

    /// Edges leaving `id`, empty if the handle is stale
    pub(crate) fn edges_of(&self, id: NodeId) -> &[Edge] {
        self.nodes.get(id).map(|n| n.edges()).unwrap_or_default()
    }
}
