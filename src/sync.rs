//! Lock-guarded tree handle for sharing across threads
//!
//! The tree itself does no locking and its mutations pass through
//! intermediate states that break its invariants. This wrapper holds one
//! `RwLock` over the whole tree: mutations take it exclusively for the full
//! call, lookups share it.

use crate::trie::{NodeFactory, NodeId, PlainFactory, RadixTree};
use crate::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// A cloneable, thread-safe handle to one radix tree
pub struct SharedRadixTree<V, F: NodeFactory<V> = PlainFactory> {
    inner: Arc<RwLock<RadixTree<V, F>>>,
}

impl<V, F: NodeFactory<V>> Clone for SharedRadixTree<V, F> {
    fn clone(&self) -> Self {
        SharedRadixTree {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> SharedRadixTree<V> {
    pub fn new() -> Self {
        Self::from_tree(RadixTree::new())
    }
}

impl<V> Default for SharedRadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, F: NodeFactory<V>> SharedRadixTree<V, F> {
    pub fn from_tree(tree: RadixTree<V, F>) -> Self {
        SharedRadixTree {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn add(&self, key: impl AsRef<[u8]>, value: V) -> Result<NodeId> {
        self.inner.write().add(key, value)
    }

    pub fn delete(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.inner.write().delete(key)
    }

    pub fn get_cloned(&self, key: impl AsRef<[u8]>) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` with shared access to the tree
    pub fn read<R>(&self, f: impl FnOnce(&RadixTree<V, F>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the tree
    pub fn write<R>(&self, f: impl FnOnce(&mut RadixTree<V, F>) -> R) -> R {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_writers() {
        let shared: SharedRadixTree<usize> = SharedRadixTree::new();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let tree = shared.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        tree.add(format!("t{}-key{}", t, i), t * 100 + i).unwrap();
                    }
                    for i in (0..50).step_by(2) {
                        assert!(tree.delete(format!("t{}-key{}", t, i)).unwrap());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len(), 4 * 25);
        assert_eq!(shared.get_cloned("t3-key7"), Some(307));
        assert!(!shared.contains_key("t3-key8"));
        shared.read(|tree| tree.verify()).unwrap();
    }

    #[test]
    fn test_write_closure() {
        let shared: SharedRadixTree<u32> = SharedRadixTree::new();
        shared.add("a", 1).unwrap();
        shared.write(|tree| {
            if let Some(v) = tree.get_mut("a") {
                *v = 2;
            }
        });
        assert_eq!(shared.get_cloned("a"), Some(2));
        assert!(!shared.is_empty());
    }
}
