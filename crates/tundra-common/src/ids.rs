//! ID types for spawned entities.

use serde::{Deserialize, Serialize};

/// Handle to an entity instantiated by the placement sink.
///
/// Chunks hold these so that unloading a chunk can free exactly the
/// entities it spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Null/invalid entity ID.
    pub const NULL: Self = Self(0);

    /// Creates an entity ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Checks if this is a valid (non-null) entity ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Monotonic allocator for [`EntityId`]s, starting after [`EntityId::NULL`].
#[derive(Debug)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    /// Creates an allocator whose first ID is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Hands out the next unused ID.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

impl Default for EntityIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
