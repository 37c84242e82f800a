//! Directed relations between entities.
//!
//! Edges are stored twice: as a pair set for O(1) adjacency tests, and as an
//! outgoing adjacency map so all edges leaving an entity can be enumerated
//! (and dropped) without scanning the pair set.

use std::collections::{HashMap, HashSet};

use crate::entity::Entity;

/// A directed graph over entity ids, independent of component data.
#[derive(Debug, Default)]
pub struct RelationGraph {
    /// Every live `(from, to)` edge.
    edges: HashSet<(Entity, Entity)>,
    /// Outgoing neighbors per source entity.
    outgoing: HashMap<Entity, HashSet<Entity>>,
}

impl RelationGraph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the edge `(from, to)`. Idempotent; returns `true` if the edge is
    /// new.
    pub fn connect(&mut self, from: Entity, to: Entity) -> bool {
        let added = self.edges.insert((from, to));
        self.outgoing.entry(from).or_default().insert(to);
        added
    }

    /// Remove the edge `(from, to)`. Idempotent; returns `true` if the edge
    /// existed.
    pub fn disconnect(&mut self, from: Entity, to: Entity) -> bool {
        let removed = self.edges.remove(&(from, to));
        if let Some(targets) = self.outgoing.get_mut(&from) {
            targets.remove(&to);
            if targets.is_empty() {
                self.outgoing.remove(&from);
            }
        }
        removed
    }

    /// Returns `true` if the edge `(from, to)` exists.
    #[must_use]
    pub fn is_connected(&self, from: Entity, to: Entity) -> bool {
        self.edges.contains(&(from, to))
    }

    /// Iterate the outgoing neighbors of `from`, in no particular order.
    pub fn targets_of(&self, from: Entity) -> impl Iterator<Item = Entity> + '_ {
        self.outgoing.get(&from).into_iter().flatten().copied()
    }

    /// Returns the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Remove every edge where `id` is the source or the target.
    ///
    /// Dropping the source side is direct via the adjacency entry; dropping
    /// the target side sweeps all other adjacency entries, O(total edges).
    pub fn remove_all(&mut self, id: Entity) {
        if let Some(targets) = self.outgoing.remove(&id) {
            for to in targets {
                self.edges.remove(&(id, to));
            }
        }
        self.outgoing.retain(|&from, targets| {
            if targets.remove(&id) {
                self.edges.remove(&(from, id));
            }
            !targets.is_empty()
        });
    }
}
