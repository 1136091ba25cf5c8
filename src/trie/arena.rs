//! Slot arena holding trie nodes
//!
//! Nodes refer to each other through [`NodeId`] handles instead of
//! pointers, so the parent back-reference never owns anything. Each slot
//! carries a generation that is bumped when the slot is freed, which turns
//! handles to removed nodes into misses rather than aliases.

use crate::{Error, Result};
use std::fmt;
use tracing::warn;

/// Stable handle to a node in a tree
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self)
    }
}

struct Slot<T> {
    generation: u32,
    item: Option<T>,
}

pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
    // highest slot count; `u32::MAX` itself is never a valid index
    limit: u32,
}

impl<T> NodeArena<T> {
    /// Empty arena with room reserved for `capacity` slots
    ///
    /// The reservation is a hint. If the allocator refuses it the arena
    /// starts empty and grows on demand.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::new();
        if let Err(e) = slots.try_reserve(capacity) {
            warn!(capacity, error = %e, "could not reserve node slots, growing on demand");
        }
        NodeArena {
            slots,
            free: Vec::new(),
            live: 0,
            limit: u32::MAX,
        }
    }

    /// Arena holding `root` in its first slot
    pub(crate) fn with_root(capacity: usize, root: T) -> (Self, NodeId) {
        let mut arena = Self::with_capacity(capacity);
        arena.slots.push(Slot {
            generation: 0,
            item: Some(root),
        });
        arena.live = 1;
        (
            arena,
            NodeId {
                index: 0,
                generation: 0,
            },
        )
    }

    #[cfg(test)]
    pub(crate) fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
    }

    /// Fail unless `count` more nodes can be inserted
    pub(crate) fn ensure_room(&self, count: usize) -> Result<()> {
        let unused = (self.limit as usize).saturating_sub(self.slots.len());
        if self.free.len() + unused < count {
            return Err(Error::ArenaFull(self.limit));
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, item: T) -> Result<NodeId> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.item = Some(item);
            self.live += 1;
            return Ok(NodeId {
                index,
                generation: slot.generation,
            });
        }

        let index = match u32::try_from(self.slots.len()) {
            Ok(index) if index < self.limit => index,
            _ => return Err(Error::ArenaFull(self.limit)),
        };
        self.slots.push(Slot {
            generation: 0,
            item: Some(item),
        });
        self.live += 1;
        Ok(NodeId {
            index,
            generation: 0,
        })
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.item.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.item.as_mut())
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let item = slot.item.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(item)
    }

    /// Number of live nodes
    pub(crate) fn len(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut arena = NodeArena::with_capacity(4);
        let a = arena.insert("a").unwrap();
        let b = arena.insert("b").unwrap();

        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut arena = NodeArena::with_capacity(0);
        let a = arena.insert(1).unwrap();
        arena.remove(a);

        let c = arena.insert(3).unwrap();
        assert_eq!(c.index(), a.index());
        assert_ne!(c.generation(), a.generation());
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(c), Some(&3));
    }

    #[test]
    fn test_full_arena_is_an_error() {
        let (mut arena, root) = NodeArena::with_root(0, 0);
        arena.set_limit(2);

        assert!(arena.ensure_room(1).is_ok());
        assert!(matches!(arena.ensure_room(2), Err(Error::ArenaFull(2))));

        let a = arena.insert(1).unwrap();
        assert!(matches!(arena.insert(2), Err(Error::ArenaFull(2))));
        assert_eq!(arena.len(), 2);

        // freed slots count as room again
        arena.remove(a);
        assert!(arena.ensure_room(1).is_ok());
        assert!(arena.insert(3).is_ok());
        assert_eq!(arena.get(root), Some(&0));
    }

    #[test]
    fn test_oversized_reservation_does_not_abort() {
        let (arena, root) = NodeArena::with_root(usize::MAX, [0u64; 8]);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(root).is_some());
    }
}
