//! Structural integrity checks

use super::{NodeFactory, NodeId, RadixTree};
use crate::{Error, Result};
use tracing::error;

/// Whether post-mutation assertions are compiled in
pub const INTEGRITY_CHECKS: bool = cfg!(any(debug_assertions, feature = "integrity-checks"));

impl<V, F: NodeFactory<V>> RadixTree<V, F> {
    /// Leaf/value coupling for a single node
    ///
    /// Internal nodes must be valueless and non-root leaves must hold a
    /// value. The root is valid as a leaf either way.
    pub fn validate_node(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if !node.is_leaf() {
            node.value.is_none()
        } else {
            id == self.root || node.value.is_some()
        }
    }

    /// Depth-first [`validate_node`](Self::validate_node) over the whole
    /// tree, stopping at the first invalid node
    pub fn validate_tree(&self) -> bool {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !self.validate_node(id) {
                return false;
            }
            // reversed so children pop in edge order
            stack.extend(self.edges_of(id).iter().rev().map(|edge| edge.target));
        }
        true
    }

    /// Assert a node touched by a mutation is still valid
    ///
    /// A failure logs the node and a level-order dump of the tree and is
    /// returned as [`Error::Corruption`]. Compiled to a no-op unless debug
    /// assertions or the `integrity-checks` feature are on.
    pub(crate) fn changed_node(&self, id: NodeId) -> Result<()> {
        if !INTEGRITY_CHECKS || !self.config.verify_mutations {
            return Ok(());
        }
        if self.validate_node(id) {
            return Ok(());
        }
        Err(self.corruption(id, "leaf/value coupling violated after mutation"))
    }

    /// Build (and log) a corruption error for `id`
    pub(crate) fn corruption(&self, id: NodeId, reason: impl Into<String>) -> Error {
        let reason = reason.into();
        let snapshot = self
            .snapshot(id)
            .and_then(|s| serde_json::to_string(&s).ok())
            .unwrap_or_else(|| "null".to_string());

        error!(node = %id, %reason, %snapshot, "radix tree is no longer valid");
        for (depth, level) in self.level_order().iter().enumerate() {
            let line = serde_json::to_string(level).unwrap_or_default();
            error!(depth, nodes = %line, "level dump");
        }

        Error::Corruption {
            node: id,
            reason,
            snapshot,
        }
    }

    /// Full structural audit
    ///
    /// Checks leaf/value coupling, prefix-disjoint siblings, that no
    /// non-root node has a single child, that labels are non-empty, that
    /// parent handles match the owning edges and that the key count agrees
    /// with the valued leaves.
    pub fn verify(&self) -> Result<()> {
        let root = self.resolve(self.root)?;
        if root.parent.is_some() {
            return Err(self.corruption(self.root, "root has a parent"));
        }

        let mut stack = vec![self.root];
        let mut valued = 0usize;

        while let Some(id) = stack.pop() {
            let node = self.resolve(id)?;
            if !self.validate_node(id) {
                return Err(self.corruption(id, "leaf/value coupling violated"));
            }
            if node.value.is_some() {
                valued += 1;
            }
            if id != self.root && node.edges.len() == 1 {
                return Err(self.corruption(id, "internal node with a single child"));
            }

            for (i, edge) in node.edges.iter().enumerate() {
                if edge.label.is_empty() {
                    return Err(self.corruption(id, format!("empty label on edge {}", i)));
                }
                for other in &node.edges[i + 1..] {
                    if edge.label.common_prefix_len(&other.label) > 0 {
                        return Err(self.corruption(
                            id,
                            format!("sibling labels {} and {} share a prefix", edge.label, other.label),
                        ));
                    }
                }

                let child = self.resolve(edge.target)?;
                if child.parent != Some(id) {
                    return Err(self.corruption(edge.target, format!("parent handle does not point at {}", id)));
                }
                if edge.label.is_terminal() && !child.is_leaf() {
                    return Err(self.corruption(edge.target, "terminal label leads to internal node"));
                }
                stack.push(edge.target);
            }
        }

        if valued != self.len() {
            return Err(self.corruption(
                self.root,
                format!("{} valued leaves but {} keys counted", valued, self.len()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::model::{ByteSequence, Label};
    use crate::trie::Edge;

    #[test]
    fn test_valid_tree() {
        let mut tree = RadixTree::new();
        for (i, key) in ["romane", "romanus", "romulus", "rubens", "ruber", "rubicon"]
            .iter()
            .enumerate()
        {
            tree.add(key, i).unwrap();
            assert!(tree.validate_tree());
            tree.verify().unwrap();
        }
    }

    #[test]
    fn test_empty_root_is_valid() {
        let tree: RadixTree<u8> = RadixTree::new();
        assert!(tree.validate_node(tree.root()));
        assert!(tree.validate_tree());
        tree.verify().unwrap();
    }

    #[test]
    fn test_value_on_internal_node_detected() {
        let mut tree = RadixTree::new();
        tree.add("ab", 1).unwrap();
        tree.add("ac", 2).unwrap();

        let middle = tree.node(tree.root()).unwrap().edges()[0].target();
        tree.nodes.get_mut(middle).unwrap().value = Some(9);

        assert!(!tree.validate_node(middle));
        assert!(!tree.validate_tree());
        let err = tree.verify().unwrap_err();
        assert!(err.is_corruption());
        assert!(tree.changed_node(middle).is_err() || !INTEGRITY_CHECKS);
    }

    #[test]
    fn test_delete_on_internal_node_is_not_leaf() {
        let mut tree = RadixTree::new();
        tree.add("ab", 1).unwrap();
        tree.add("ac", 2).unwrap();

        // make "a" resolve to the split point: terminal edge plus a value
        let root = tree.root();
        let middle = tree.node(root).unwrap().edges()[0].target();
        tree.nodes.get_mut(root).unwrap().edges[0] =
            Edge::new(Label::new(ByteSequence::from("a"), true), middle);
        tree.nodes.get_mut(middle).unwrap().value = Some(9);
        assert!(tree.search("a").found);

        match tree.delete("a") {
            Err(Error::NotLeaf { key, node }) => {
                assert_eq!(key, "61");
                assert_eq!(node, middle);
            }
            other => panic!("expected NotLeaf, got {:?}", other),
        }
        // nothing was cleared
        assert_eq!(tree.get("a"), Some(&9));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_valueless_leaf_detected() {
        let mut tree = RadixTree::new();
        let leaf = tree.add("ab", 1).unwrap();
        tree.nodes.get_mut(leaf).unwrap().value = None;

        assert!(!tree.validate_node(leaf));
        match tree.verify() {
            Err(Error::Corruption { node, .. }) => assert_eq!(node, leaf),
            other => panic!("expected corruption, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_prefix_detected() {
        let mut tree = RadixTree::new();
        tree.add("ab", 1).unwrap();
        let extra = tree.add("zz", 2).unwrap();

        // relabel the second edge so both siblings start with 'a'
        let root = tree.root();
        tree.nodes.get_mut(root).unwrap().edges[1] =
            Edge::new(Label::new(ByteSequence::from("ax"), true), extra);

        let err = tree.verify().unwrap_err();
        assert!(err.to_string().contains("share a prefix"));
        // leaf/value coupling alone does not see it
        assert!(tree.validate_tree());
    }

    #[test]
    fn test_checks_disabled_by_config() {
        let config = TreeConfig {
            verify_mutations: false,
            ..TreeConfig::default()
        };
        let mut tree = RadixTree::with_config(config);
        let leaf = tree.add("ab", 1).unwrap();
        tree.nodes.get_mut(leaf).unwrap().value = None;
        assert!(tree.changed_node(leaf).is_ok());
    }

    #[test]
    fn test_unknown_node_invalid() {
        let mut tree = RadixTree::new();
        tree.add("a", 1).unwrap();
        tree.add("b", 2).unwrap();
        let gone = tree.search("a").node.unwrap();
        tree.delete("a").unwrap();
        assert!(!tree.validate_node(gone));
    }

    #[test]
    fn test_deep_prefix_chain() {
        let mut tree = RadixTree::new();
        let mut key = Vec::new();
        for i in 0..20_000u32 {
            key.push(b'a');
            tree.add(&key, i).unwrap();
        }
        assert_eq!(tree.stats().depth, 20_000);

        assert!(tree.validate_tree());
        tree.verify().unwrap();

        // a violation at the bottom of the chain is still found
        let deepest = tree.search(&key).node.unwrap();
        tree.nodes.get_mut(deepest).unwrap().value = None;
        assert!(!tree.validate_tree());
    }
}
