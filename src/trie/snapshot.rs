//! Serializable views of the tree for diagnostics

use super::{NodeFactory, NodeId, RadixTree};
use serde::Serialize;
use std::collections::VecDeque;

/// Point-in-time view of one node
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub parent: Option<String>,
    pub is_root: bool,
    pub has_value: bool,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeSnapshot {
    /// Hex label, `$` marking the end of a key
    pub label: String,
    pub target: String,
}

/// Shape summary of a tree
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub keys: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub internal: usize,
    /// Longest root-to-leaf path, in edges
    pub depth: usize,
    pub max_fan_out: usize,
    /// Total label length over all edges, in symbols
    pub label_symbols: usize,
}

impl<V, F: NodeFactory<V>> RadixTree<V, F> {
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.nodes.get(id)?;
        Some(NodeSnapshot {
            id: id.to_string(),
            parent: node.parent.map(|p| p.to_string()),
            is_root: id == self.root,
            has_value: node.value.is_some(),
            edges: node
                .edges
                .iter()
                .map(|edge| EdgeSnapshot {
                    label: edge.label.to_string(),
                    target: edge.target.to_string(),
                })
                .collect(),
        })
    }

    /// Breadth-first dump, one entry per depth
    pub fn level_order(&self) -> Vec<Vec<NodeSnapshot>> {
        let mut levels: Vec<Vec<NodeSnapshot>> = Vec::new();
        let mut queue = VecDeque::from([(self.root, 0usize)]);

        while let Some((id, depth)) = queue.pop_front() {
            let Some(snapshot) = self.snapshot(id) else {
                continue;
            };
            if levels.len() <= depth {
                levels.push(Vec::new());
            }
            levels[depth].push(snapshot);
            for edge in self.edges_of(id) {
                queue.push_back((edge.target, depth + 1));
            }
        }
        levels
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            keys: self.len(),
            nodes: self.node_count(),
            ..TreeStats::default()
        };

        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let edges = self.edges_of(id);
            if edges.is_empty() {
                stats.leaves += 1;
            } else {
                stats.internal += 1;
            }
            stats.depth = stats.depth.max(depth);
            stats.max_fan_out = stats.max_fan_out.max(edges.len());
            for edge in edges {
                stats.label_symbols += edge.label.len();
                stack.push((edge.target, depth + 1));
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use crate::RadixTree;

    #[test]
    fn test_level_order() {
        let mut tree = RadixTree::new();
        tree.add("apple", 1).unwrap();
        tree.add("appetite", 2).unwrap();

        let levels = tree.level_order();
        assert_eq!(levels.len(), 3);
        assert!(levels[0][0].is_root);
        assert_eq!(levels[0][0].edges[0].label, "617070");
        assert_eq!(levels[1].len(), 1);
        assert!(!levels[1][0].has_value);
        assert_eq!(levels[2].len(), 2);
        assert!(levels[2].iter().all(|n| n.has_value && n.edges.is_empty()));
    }

    #[test]
    fn test_snapshot_json() {
        let mut tree = RadixTree::new();
        let leaf = tree.add("a", 1).unwrap();
        let snapshot = tree.snapshot(leaf).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["has_value"], true);
        assert_eq!(json["parent"], tree.root().to_string());
    }

    #[test]
    fn test_stats() {
        let mut tree = RadixTree::new();
        for key in ["ab", "abc", "abd"] {
            tree.add(key, ()).unwrap();
        }
        let stats = tree.stats();
        assert_eq!(stats.keys, 3);
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.leaves, 3);
        assert_eq!(stats.internal, 2);
        assert_eq!(stats.depth, 2);
        assert_eq!(stats.max_fan_out, 3);
    }
}
