//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u32` identifier with no inherent data.
//! Its "existence" is defined entirely by the component slots and relation
//! edges that reference it.

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// Entities are pure identifiers — they carry no data of their own.
/// Components are attached to entities to give them meaning.
///
/// Ids are allocated by a monotonic counter and are never reused within a
/// process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u32);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u32` identifier.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` identifier.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity ids.
///
/// Ids start at 1 (0 is reserved for [`Entity::INVALID`]) and are never
/// recycled: a destroyed entity's id stays retired for the rest of the
/// process run.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u32,
}

impl EntityAllocator {
    /// Creates a new allocator.
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh entity id.
    pub fn allocate(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }

    /// Returns `true` if the given id has been issued by this allocator.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        entity.is_valid() && entity.id() < self.next_id
    }

    /// Returns the number of entities allocated so far.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.next_id - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
