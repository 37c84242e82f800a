//! The [`World`] — entity lifecycle, component CRUD, cached queries, and
//! entity relations behind one facade.
//!
//! Storage model: one packed [`Column`] per component type, a per-entity map
//! from type tag to slot index, and a per-type membership set driving
//! queries. Two memo layers sit on top: a query-result cache keyed by the
//! unordered set of requested types, and a slot-lookup cache keyed by
//! `(entity, type)`. Both are invalidated on structural mutation — the
//! slot cache for the whole affected type on any erase, because an erase
//! shifts every later slot of that type.

use std::collections::{HashMap, HashSet};

use crate::column::Column;
use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator};
use crate::error::StoreError;
use crate::query::{QueryKey, QuerySet};
use crate::relation::RelationGraph;

/// The entity-component store.
///
/// Single-threaded and synchronous; operations run to completion and never
/// retry. References returned by [`World::emplace`], [`World::get`] and
/// [`World::get_mut`] are valid until the next structural mutation of the
/// component's type.
#[derive(Debug, Default)]
pub struct World {
    allocator: EntityAllocator,
    /// Ids retired by [`World::despawn`]. Ids are never reused, so this only
    /// grows; operations on retired ids fail instead of resurrecting them.
    destroyed: HashSet<Entity>,
    columns: HashMap<ComponentTypeId, Column>,
    /// Per-entity map from component type to slot in that type's column.
    entity_index: HashMap<Entity, HashMap<ComponentTypeId, usize>>,
    /// Entities holding at least one component of each type.
    membership: HashMap<ComponentTypeId, HashSet<Entity>>,
    /// Memoized query results, cleared on any membership change.
    query_cache: HashMap<QueryKey, Vec<Entity>>,
    /// Memoized `(entity, type) -> slot` lookups, purged per type on erase.
    slot_cache: HashMap<(Entity, ComponentTypeId), usize>,
    relations: RelationGraph,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            destroyed: HashSet::new(),
            columns: HashMap::new(),
            entity_index: HashMap::new(),
            membership: HashMap::new(),
            query_cache: HashMap::new(),
            slot_cache: HashMap::new(),
            relations: RelationGraph::new(),
        }
    }

    // -- Entity lifecycle --

    /// Allocate a new entity with no components. O(1), never fails.
    pub fn spawn(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Returns `true` if the id was issued and has not been despawned.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.contains(entity) && !self.destroyed.contains(&entity)
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), StoreError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(StoreError::EntityNotFound(entity))
        }
    }

    /// Number of live entities (ids issued minus ids despawned).
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.count() as usize - self.destroyed.len()
    }

    /// Allocate a new entity carrying a deep copy of every component the
    /// source holds, and an outgoing edge to each of the source's targets.
    ///
    /// A componentless (live) source yields a fresh empty entity.
    pub fn clone_entity(&mut self, source: Entity) -> Result<Entity, StoreError> {
        self.ensure_alive(source)?;
        let clone = self.allocator.allocate();

        let held: Vec<(ComponentTypeId, usize)> = self
            .entity_index
            .get(&source)
            .map(|slots| slots.iter().map(|(&ty, &slot)| (ty, slot)).collect())
            .unwrap_or_default();

        for (ty, slot) in held {
            if let Some(column) = self.columns.get_mut(&ty) {
                let new_slot = column.clone_from_slot(slot, clone);
                self.entity_index.entry(clone).or_default().insert(ty, new_slot);
                self.membership.entry(ty).or_default().insert(clone);
            }
        }

        // Duplicate outgoing edges 1-for-1: the clone points at the SAME
        // targets as the source, not at copies of them.
        let targets: Vec<Entity> = self.relations.targets_of(source).collect();
        for target in targets {
            self.relations.connect(clone, target);
        }

        self.query_cache.clear();
        Ok(clone)
    }

    /// Destroy an entity: drop every component it holds, repair the slots
    /// shifted by each erase, purge caches, and remove every relation edge
    /// touching it.
    ///
    /// Idempotent: unknown or already-despawned ids are a no-op returning
    /// `false`.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let held = self.entity_index.remove(&entity).unwrap_or_default();
        for (ty, slot) in held {
            if let Some(column) = self.columns.get_mut(&ty) {
                column.remove(slot);
                for (new_slot, owner) in column.owners().iter().enumerate().skip(slot) {
                    if let Some(slots) = self.entity_index.get_mut(owner) {
                        slots.insert(ty, new_slot);
                    }
                }
            }
            if let Some(members) = self.membership.get_mut(&ty) {
                members.remove(&entity);
            }
            // The erase shifted later slots of this type; every cached slot
            // for the type is suspect.
            self.slot_cache.retain(|&(_, cached_ty), _| cached_ty != ty);
        }
        self.slot_cache.retain(|&(owner, _), _| owner != entity);
        self.query_cache.clear();
        self.relations.remove_all(entity);
        self.destroyed.insert(entity);
        true
    }

    /// Drop every component and relation in the world, keeping the id
    /// counter running so ids stay unique across the reset.
    pub fn clear(&mut self) {
        self.columns.clear();
        self.entity_index.clear();
        self.membership.clear();
        self.query_cache.clear();
        self.slot_cache.clear();
        self.relations = RelationGraph::new();
    }

    // -- Component CRUD --

    /// Insert a component, or replace the entity's existing one of the same
    /// type in place (slot preserved, no membership change).
    ///
    /// First insert of a type registers its metadata thunks. Returns a
    /// reference to the stored value, valid until the next structural
    /// mutation of the type's column.
    pub fn emplace<T: Component>(
        &mut self,
        entity: Entity,
        value: T,
    ) -> Result<&mut T, StoreError> {
        self.ensure_alive(entity)?;
        let ty = ComponentTypeId::of::<T>();
        let existing = self
            .entity_index
            .get(&entity)
            .and_then(|slots| slots.get(&ty))
            .copied();
        let column = self.columns.entry(ty).or_insert_with(|| Column::new(T::meta()));

        match existing {
            Some(slot) => {
                // SAFETY: the slot bookkeeping guarantees a live T at `slot`
                // in T's own column.
                unsafe {
                    column.replace(slot, value);
                    Ok(column.get_mut(slot))
                }
            }
            None => {
                // SAFETY: the column was created from T::meta().
                let slot = unsafe { column.push(entity, value) };
                self.entity_index.entry(entity).or_default().insert(ty, slot);
                self.membership.entry(ty).or_default().insert(entity);
                self.query_cache.clear();
                // SAFETY: `slot` was just written with a T.
                unsafe { Ok(column.get_mut(slot)) }
            }
        }
    }

    /// Remove the entity's component of type `T`, if any.
    ///
    /// Returns `Ok(false)` when the component is absent. A removal erases
    /// the backing bytes, shifting every later same-type component down one
    /// slot; the shifted entities' bookkeeping is repaired in the same pass.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<bool, StoreError> {
        self.ensure_alive(entity)?;
        let ty = ComponentTypeId::of::<T>();
        let Some(slot) = self
            .entity_index
            .get_mut(&entity)
            .and_then(|slots| slots.remove(&ty))
        else {
            return Ok(false);
        };
        if let Some(column) = self.columns.get_mut(&ty) {
            column.remove(slot);
            for (new_slot, owner) in column.owners().iter().enumerate().skip(slot) {
                if let Some(slots) = self.entity_index.get_mut(owner) {
                    slots.insert(ty, new_slot);
                }
            }
        }
        self.finish_erase(entity, ty);
        Ok(true)
    }

    /// Move the entity's component of type `T` out of the store.
    ///
    /// Same structural effect as [`World::remove`], but the value is
    /// returned instead of dropped.
    pub fn take<T: Component>(&mut self, entity: Entity) -> Result<T, StoreError> {
        self.ensure_alive(entity)?;
        let ty = ComponentTypeId::of::<T>();
        let Some(slot) = self
            .entity_index
            .get_mut(&entity)
            .and_then(|slots| slots.remove(&ty))
        else {
            return Err(StoreError::ComponentNotFound {
                component: T::type_name(),
                entity,
            });
        };
        let Some(column) = self.columns.get_mut(&ty) else {
            return Err(StoreError::ComponentNotFound {
                component: T::type_name(),
                entity,
            });
        };
        // SAFETY: the slot bookkeeping guarantees a live T at `slot` in T's
        // own column.
        let value = unsafe { column.take::<T>(slot) };
        for (new_slot, owner) in column.owners().iter().enumerate().skip(slot) {
            if let Some(slots) = self.entity_index.get_mut(owner) {
                slots.insert(ty, new_slot);
            }
        }
        self.finish_erase(entity, ty);
        Ok(value)
    }

    /// Shared invalidation tail of every erase path.
    fn finish_erase(&mut self, entity: Entity, ty: ComponentTypeId) {
        if let Some(members) = self.membership.get_mut(&ty) {
            members.remove(&entity);
        }
        self.slot_cache.retain(|&(_, cached_ty), _| cached_ty != ty);
        self.query_cache.clear();
    }

    /// Get a reference to the entity's component of type `T`.
    ///
    /// Consults the slot-lookup cache first; a miss resolves through the
    /// index map and populates the cache.
    pub fn get<T: Component>(&mut self, entity: Entity) -> Result<&T, StoreError> {
        self.ensure_alive(entity)?;
        let ty = ComponentTypeId::of::<T>();
        let slot = self.resolve_slot::<T>(entity, ty)?;
        let Some(column) = self.columns.get(&ty) else {
            return Err(StoreError::ComponentNotFound {
                component: T::type_name(),
                entity,
            });
        };
        // SAFETY: the resolved slot is live and holds a T.
        unsafe { Ok(column.get(slot)) }
    }

    /// Get a mutable reference to the entity's component of type `T`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, StoreError> {
        self.ensure_alive(entity)?;
        let ty = ComponentTypeId::of::<T>();
        let slot = self.resolve_slot::<T>(entity, ty)?;
        let Some(column) = self.columns.get_mut(&ty) else {
            return Err(StoreError::ComponentNotFound {
                component: T::type_name(),
                entity,
            });
        };
        // SAFETY: the resolved slot is live and holds a T.
        unsafe { Ok(column.get_mut(slot)) }
    }

    fn resolve_slot<T: Component>(
        &mut self,
        entity: Entity,
        ty: ComponentTypeId,
    ) -> Result<usize, StoreError> {
        if let Some(&slot) = self.slot_cache.get(&(entity, ty)) {
            return Ok(slot);
        }
        let slot = self
            .entity_index
            .get(&entity)
            .and_then(|slots| slots.get(&ty))
            .copied()
            .ok_or(StoreError::ComponentNotFound {
                component: T::type_name(),
                entity,
            })?;
        self.slot_cache.insert((entity, ty), slot);
        Ok(slot)
    }

    /// Returns `true` if the entity holds a component of type `T`.
    ///
    /// O(1); `false` for unknown or despawned ids.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        let ty = ComponentTypeId::of::<T>();
        self.entity_index
            .get(&entity)
            .is_some_and(|slots| slots.contains_key(&ty))
    }

    /// Number of live components of type `T` across all entities.
    #[must_use]
    pub fn component_count<T: Component>(&self) -> usize {
        self.columns
            .get(&ComponentTypeId::of::<T>())
            .map_or(0, Column::len)
    }

    // -- Queries --

    /// All entities holding every component type in the tuple `Q`.
    ///
    /// Result order is unspecified. Repeating the same type set (in any
    /// order) before the next structural mutation is served from the cache.
    pub fn query<Q: QuerySet>(&mut self) -> Vec<Entity> {
        // Tuple arity is bounded by the QuerySet impls, so the key cannot
        // overflow.
        self.query_dyn(&Q::type_ids()).unwrap_or_default()
    }

    /// All entities holding every one of the given component type tags.
    ///
    /// More than [`MAX_QUERY_TYPES`](crate::query::MAX_QUERY_TYPES) distinct
    /// tags is a capacity violation.
    pub fn query_dyn(
        &mut self,
        types: &[ComponentTypeId],
    ) -> Result<Vec<Entity>, StoreError> {
        let key = QueryKey::new(types)?;
        if let Some(hit) = self.query_cache.get(&key) {
            return Ok(hit.clone());
        }
        let result = self.run_query(key.ids());
        self.query_cache.insert(key, result.clone());
        Ok(result)
    }

    /// Uncached query walk: iterate the smallest membership set and probe
    /// each candidate against the remaining sets, smallest pool first.
    fn run_query(&self, types: &[ComponentTypeId]) -> Vec<Entity> {
        let mut sets: Vec<&HashSet<Entity>> = Vec::with_capacity(types.len());
        for ty in types {
            match self.membership.get(ty) {
                Some(members) if !members.is_empty() => sets.push(members),
                // A type nobody holds empties the whole intersection.
                _ => return Vec::new(),
            }
        }
        sets.sort_by_key(|members| members.len());
        let Some((smallest, rest)) = sets.split_first() else {
            return Vec::new();
        };
        smallest
            .iter()
            .copied()
            .filter(|entity| rest.iter().all(|members| members.contains(entity)))
            .collect()
    }

    // -- Relations --

    /// Add a directed edge between two live entities. Idempotent.
    pub fn connect(&mut self, from: Entity, to: Entity) -> Result<(), StoreError> {
        self.ensure_alive(from)?;
        self.ensure_alive(to)?;
        self.relations.connect(from, to);
        Ok(())
    }

    /// Remove a directed edge. Idempotent.
    pub fn disconnect(&mut self, from: Entity, to: Entity) -> Result<(), StoreError> {
        self.ensure_alive(from)?;
        self.ensure_alive(to)?;
        self.relations.disconnect(from, to);
        Ok(())
    }

    /// Returns `true` if the edge `(from, to)` exists.
    #[must_use]
    pub fn is_connected(&self, from: Entity, to: Entity) -> bool {
        self.relations.is_connected(from, to)
    }

    /// Iterate the outgoing relation targets of an entity.
    pub fn targets_of(&self, from: Entity) -> impl Iterator<Item = Entity> + '_ {
        self.relations.targets_of(from)
    }

    /// Total number of relation edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.relations.edge_count()
    }
}
