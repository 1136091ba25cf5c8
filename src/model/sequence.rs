//! Immutable byte sequences used for keys and edge labels

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// An immutable, cheaply clonable byte range
///
/// Slicing shares the underlying buffer, so edge labels cut out of a key
/// during splits do not copy.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteSequence(Bytes);

impl ByteSequence {
    /// An empty sequence
    pub fn new() -> Self {
        ByteSequence(Bytes::new())
    }

    /// Copy raw bytes into a new sequence
    pub fn copy_from_slice(data: &[u8]) -> Self {
        ByteSequence(Bytes::copy_from_slice(data))
    }

    /// Parse from a hex string
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        Ok(ByteSequence(Bytes::from(hex::decode(s)?)))
    }

    /// Convert to a lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Longest common prefix of `self[offset..]` and `other`
    ///
    /// Returns `None` when nothing matches, including when `offset` is past
    /// the end of `self`.
    pub fn longest_match(&self, other: &ByteSequence, offset: usize) -> Option<ByteSequence> {
        let rest = self.0.get(offset..)?;
        let len = common_prefix_len(rest, &other.0);
        if len == 0 {
            return None;
        }
        Some(self.slice(offset, Some(len)))
    }

    /// Number of leading bytes `self` shares with `other`
    pub fn common_prefix_len(&self, other: &[u8]) -> usize {
        common_prefix_len(&self.0, other)
    }

    /// Subsequence starting at `offset`, `length` bytes long (or to the end)
    ///
    /// Bounds are clamped to the sequence.
    pub fn slice(&self, offset: usize, length: Option<usize>) -> ByteSequence {
        let start = offset.min(self.0.len());
        let end = match length {
            Some(length) => start.saturating_add(length).min(self.0.len()),
            None => self.0.len(),
        };
        ByteSequence(self.0.slice(start..end))
    }

    /// Contiguous concatenation of two sequences
    pub fn concat(a: &ByteSequence, b: &ByteSequence) -> ByteSequence {
        if a.is_empty() {
            return b.clone();
        }
        if b.is_empty() {
            return a.clone();
        }
        let mut buf = BytesMut::with_capacity(a.len() + b.len());
        buf.put_slice(&a.0);
        buf.put_slice(&b.0);
        ByteSequence(buf.freeze())
    }
}

/// Find the length of the common prefix between two byte slices
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

impl fmt::Display for ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteSequence({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl AsRef<[u8]> for ByteSequence {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for ByteSequence {
    fn from(bytes: Bytes) -> Self {
        ByteSequence(bytes)
    }
}

impl From<Vec<u8>> for ByteSequence {
    fn from(bytes: Vec<u8>) -> Self {
        ByteSequence(Bytes::from(bytes))
    }
}

impl From<&[u8]> for ByteSequence {
    fn from(bytes: &[u8]) -> Self {
        ByteSequence::copy_from_slice(bytes)
    }
}

impl From<&str> for ByteSequence {
    fn from(s: &str) -> Self {
        ByteSequence::copy_from_slice(s.as_bytes())
    }
}

impl From<String> for ByteSequence {
    fn from(s: String) -> Self {
        ByteSequence(Bytes::from(s.into_bytes()))
    }
}
