//! Error types for radix_index

use crate::trie::NodeId;
use thiserror::Error;

/// Result type alias for radix_index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in radix_index operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key encoding: {0}")]
    InvalidKey(#[from] hex::FromHexError),

    /// A structural invariant no longer holds. Always an algorithm defect,
    /// never a caller error.
    #[error("Corruption detected at node {node}: {reason} (snapshot: {snapshot})")]
    Corruption {
        node: NodeId,
        reason: String,
        snapshot: String,
    },

    #[error("Cannot delete key {key}: node {node} is not a leaf")]
    NotLeaf { key: String, node: NodeId },

    #[error("Dangling node reference: {0}")]
    DanglingNode(NodeId),

    #[error("Node arena is full ({0} slots)")]
    ArenaFull(u32),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error means the tree structure itself is broken
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::Corruption { .. } | Error::NotLeaf { .. } | Error::DanglingNode(_)
        )
    }
}
