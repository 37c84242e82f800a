//! Store error types.

use crate::entity::Entity;

/// Errors reported by [`World`](crate::world::World) operations.
///
/// Recoverable emptiness (a query matching nothing) is an empty result, not
/// an error; the store never retries internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The id was never allocated, or the entity has been destroyed.
    #[error("{0} not found")]
    EntityNotFound(Entity),

    /// The entity does not hold a component of the requested type.
    #[error("component '{component}' missing on {entity}")]
    ComponentNotFound {
        /// Name of the requested component type.
        component: &'static str,
        /// The entity that was queried.
        entity: Entity,
    },

    /// A query requested more distinct component types than the cache key
    /// can represent. This is a caller programming error, not runtime state.
    #[error("query requested {requested} component types, the limit is {max}")]
    QueryTooWide {
        /// Number of distinct types requested.
        requested: usize,
        /// The fixed capacity of the query key.
        max: usize,
    },
}
