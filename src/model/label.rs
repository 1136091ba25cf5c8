//! Edge labels: byte runs with an optional end-of-key marker

use super::ByteSequence;
use std::fmt;

/// The label carried by a trie edge
///
/// Every key is matched as its bytes followed by an implicit end-of-key
/// symbol. A terminal label ends with that symbol, so it can only be
/// consumed by a key that stops exactly there. This lets a key that is a
/// prefix of another key live on its own leaf instead of on an internal
/// node.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Label {
    bytes: ByteSequence,
    terminal: bool,
}

impl Label {
    pub fn new(bytes: ByteSequence, terminal: bool) -> Self {
        Label { bytes, terminal }
    }

    /// Everything left of `key` from `offset`, end-of-key marker included
    pub(crate) fn key_remainder(key: &[u8], offset: usize) -> Self {
        let rest = key.get(offset..).unwrap_or_default();
        Label::new(ByteSequence::copy_from_slice(rest), true)
    }

    pub fn bytes(&self) -> &ByteSequence {
        &self.bytes
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Length in symbols; the end-of-key marker counts as one
    pub fn len(&self) -> usize {
        self.bytes.len() + usize::from(self.terminal)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of symbols of `key[offset..]` (plus its end-of-key marker)
    /// that this label matches from its start
    pub(crate) fn match_key(&self, key: &[u8], offset: usize) -> usize {
        let rest = key.get(offset..).unwrap_or_default();
        let common = self.bytes.common_prefix_len(rest);
        if self.terminal && common == self.bytes.len() && common == rest.len() {
            common + 1
        } else {
            common
        }
    }

    /// Common prefix length, in symbols, between two labels
    pub fn common_prefix_len(&self, other: &Label) -> usize {
        let common = self.bytes.common_prefix_len(other.bytes.as_slice());
        let both_end = common == self.bytes.len() && common == other.bytes.len();
        if both_end && self.terminal && other.terminal {
            common + 1
        } else {
            common
        }
    }

    /// Split into `(head, tail)` with `head.len() == at`
    ///
    /// Callers only split strictly inside the label, so both halves are
    /// non-empty. The marker, if any, stays on the tail.
    pub(crate) fn split_at(&self, at: usize) -> (Label, Label) {
        debug_assert!(at > 0 && at < self.len());
        let head = Label::new(self.bytes.slice(0, Some(at)), false);
        let tail = Label::new(self.bytes.slice(at, None), self.terminal);
        (head, tail)
    }

    /// Append `tail` to this label; `None` if this label is already terminal
    pub(crate) fn concat(&self, tail: &Label) -> Option<Label> {
        if self.terminal {
            return None;
        }
        Some(Label::new(
            ByteSequence::concat(&self.bytes, &tail.bytes),
            tail.terminal,
        ))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes)?;
        if self.terminal {
            f.write_str("$")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Label({:?}{})",
            String::from_utf8_lossy(self.bytes.as_slice()),
            if self.terminal { "$" } else { "" }
        )
    }
}
