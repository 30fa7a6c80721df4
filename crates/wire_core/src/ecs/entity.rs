//! # Entity Management
//!
//! Entities are plain non-zero integers. Zero is reserved as the null id.
//!
//! Ids come from a monotonic high-water mark, with a free list of ids
//! returned by removed entities. The most recently freed id is handed out
//! first.

use std::collections::HashSet;
use std::fmt;

use crate::error::{EcsError, EcsResult};

/// Unique identifier for an entity.
///
/// Encoded on the wire as 4 little-endian bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Null/invalid entity ID.
    pub const NULL: Self = Self(0);

    /// Width of an id in the binary entity format.
    pub const ENCODED_LEN: usize = std::mem::size_of::<u32>();

    /// Wraps a raw id. Zero yields [`EntityId::NULL`].
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out entity ids and tracks which are alive.
///
/// Guarantees that no two live entities share an id. Reuse order of freed
/// ids is not chronological.
#[derive(Clone, Debug)]
pub struct EntityAllocator {
    /// Next never-used id. Wider than an id so `u32::MAX` can be admitted.
    next: u64,
    /// Freed ids, reused last-in first-out.
    free: Vec<EntityId>,
    /// Live ids in creation order.
    live: Vec<EntityId>,
    /// Membership index over `live`.
    live_set: HashSet<EntityId>,
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityAllocator {
    /// Creates an allocator with no live entities.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: 1,
            free: Vec::new(),
            live: Vec::new(),
            live_set: HashSet::new(),
        }
    }

    /// Allocates a fresh id.
    ///
    /// # Panics
    ///
    /// Panics if all 2^32 - 1 ids are live at once.
    pub fn allocate(&mut self) -> EntityId {
        let id = if let Some(id) = self.free.pop() {
            id
        } else {
            let raw = u32::try_from(self.next).expect("entity id space exhausted");
            self.next += 1;
            EntityId(raw)
        };

        self.live.push(id);
        self.live_set.insert(id);
        id
    }

    /// Admits an externally chosen id, e.g. one restored from disk.
    ///
    /// Later [`allocate`](Self::allocate) calls never collide with it.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NullEntity`] for zero and
    /// [`EcsError::EntityAlreadyAlive`] if the id is in use.
    pub fn admit(&mut self, id: EntityId) -> EcsResult<()> {
        if id.is_null() {
            return Err(EcsError::NullEntity);
        }
        if self.live_set.contains(&id) {
            return Err(EcsError::EntityAlreadyAlive(id));
        }

        if let Some(pos) = self.free.iter().position(|&free| free == id) {
            self.free.swap_remove(pos);
        }
        if self.next <= u64::from(id.0) {
            self.next = u64::from(id.0) + 1;
        }

        self.live.push(id);
        self.live_set.insert(id);
        Ok(())
    }

    /// Marks a live id as free for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NullEntity`] for zero and
    /// [`EcsError::EntityNotAlive`] if the id is not live.
    pub fn release(&mut self, id: EntityId) -> EcsResult<()> {
        if id.is_null() {
            return Err(EcsError::NullEntity);
        }
        if !self.live_set.remove(&id) {
            return Err(EcsError::EntityNotAlive(id));
        }

        if let Some(pos) = self.live.iter().position(|&live| live == id) {
            self.live.remove(pos);
        }
        self.free.push(id);
        Ok(())
    }

    /// Checks if an id is currently live.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.live_set.contains(&id)
    }

    /// Live ids in creation order.
    #[inline]
    #[must_use]
    pub fn live(&self) -> &[EntityId] {
        &self.live
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Checks if no entity is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Returns the allocator to its initial state.
    pub fn reset(&mut self) {
        self.next = 1;
        self.free.clear();
        self.live.clear();
        self.live_set.clear();
    }
}
