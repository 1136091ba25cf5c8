//! # radix_index
//!
//! A PATRICIA radix tree indexing byte-sequence keys.
//!
//! Edges carry compressed, prefix-shared labels. Insertion splits edges in
//! place, and deletion prunes dead leaves and merges single-child nodes back
//! into their parent edge, so the tree stays minimal after every operation.
//!
//! ## Core Concepts
//!
//! - **ByteSequence**: immutable byte ranges used for keys and labels
//! - **Nodes**: arena-allocated vertices addressed by [`NodeId`]; only leaves
//!   hold values
//! - **Edges**: labeled links owning their child; siblings never share a
//!   label prefix
//! - **NodeFactory**: injected strategy that builds nodes and edges, so
//!   specialised trees can attach their own per-node state
//!
//! ## Example
//!
//! ```
//! use radix_index::RadixTree;
//!
//! let mut tree = RadixTree::new();
//! tree.add("apple", 1)?;
//! tree.add("appetite", 2)?;
//!
//! assert_eq!(tree.search("appetite").value, Some(&2));
//! assert!(!tree.search("app").found);
//!
//! assert!(tree.delete("appetite")?);
//! assert_eq!(tree.get("apple"), Some(&1));
//! # Ok::<(), radix_index::Error>(())
//! ```

pub mod config;
pub mod model;
pub mod sync;
pub mod trie;

mod error;

pub use config::TreeConfig;
pub use error::{Error, Result};
pub use model::{ByteSequence, Label};
pub use sync::SharedRadixTree;
pub use trie::{
    Edge, Lookup, Node, NodeFactory, NodeId, NodeSnapshot, PlainFactory, RadixTree, TreeStats,
};
