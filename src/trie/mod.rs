//! PATRICIA radix tree over byte-sequence keys
//!
//! This implements a compressed prefix tree where:
//! - Edges carry multi-byte labels and sibling labels never share a prefix
//! - Values live only on leaves; keys that prefix other keys end in their
//!   own end-of-key edge
//! - Deleting a key prunes dead leaves and merges single-child nodes back
//!   into their parent edge

mod arena;
mod factory;
mod node;
mod snapshot;
mod tree;
mod validate;

pub use arena::NodeId;
pub use factory::{NodeFactory, PlainFactory};
pub use node::{Edge, Node};
pub use snapshot::{EdgeSnapshot, NodeSnapshot, TreeStats};
pub use tree::{Lookup, RadixTree};
pub use validate::INTEGRITY_CHECKS;
