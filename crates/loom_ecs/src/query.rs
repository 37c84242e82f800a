//! Query keys and the typed query-set trait.
//!
//! A query asks for every entity holding *all* of a set of component types.
//! Results are memoized in the world keyed by [`QueryKey`]: a fixed-capacity,
//! sorted, deduplicated tag array, so the same type set hits the same cache
//! line regardless of the order (or repetition) the types were requested in.

use crate::component::{Component, ComponentTypeId};
use crate::error::StoreError;

/// Maximum number of distinct component types representable in one query.
pub const MAX_QUERY_TYPES: usize = 16;

/// Canonical cache key for a multi-component query.
///
/// Tags are sorted and deduplicated; unused trailing slots stay zero so the
/// derived `Hash`/`Eq` see a canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct QueryKey {
    ids: [ComponentTypeId; MAX_QUERY_TYPES],
    len: u8,
}

impl QueryKey {
    /// Build a key from requested tags. Duplicates are ignored; more than
    /// [`MAX_QUERY_TYPES`] distinct tags is a capacity violation.
    pub(crate) fn new(types: &[ComponentTypeId]) -> Result<Self, StoreError> {
        let mut sorted = types.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() > MAX_QUERY_TYPES {
            return Err(StoreError::QueryTooWide {
                requested: sorted.len(),
                max: MAX_QUERY_TYPES,
            });
        }
        let mut ids = [ComponentTypeId(0); MAX_QUERY_TYPES];
        ids[..sorted.len()].copy_from_slice(&sorted);
        Ok(Self {
            ids,
            len: sorted.len() as u8,
        })
    }

    /// The requested tags, sorted and deduplicated.
    pub(crate) fn ids(&self) -> &[ComponentTypeId] {
        &self.ids[..self.len as usize]
    }
}

/// A tuple of component types usable with
/// [`World::query`](crate::world::World::query).
///
/// Implemented for tuples up to arity [`MAX_QUERY_TYPES`], so the typed
/// query surface can never overflow the cache key.
pub trait QuerySet {
    /// The type tags of the tuple's members, in declaration order.
    fn type_ids() -> Vec<ComponentTypeId>;
}

macro_rules! impl_query_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> QuerySet for ($($name,)+) {
            fn type_ids() -> Vec<ComponentTypeId> {
                vec![$(ComponentTypeId::of::<$name>()),+]
            }
        }
    };
}

impl_query_set!(A);
impl_query_set!(A, B);
impl_query_set!(A, B, C);
impl_query_set!(A, B, C, D);
impl_query_set!(A, B, C, D, E);
impl_query_set!(A, B, C, D, E, F);
impl_query_set!(A, B, C, D, E, F, G);
impl_query_set!(A, B, C, D, E, F, G, H);
impl_query_set!(A, B, C, D, E, F, G, H, I);
impl_query_set!(A, B, C, D, E, F, G, H, I, J);
impl_query_set!(A, B, C, D, E, F, G, H, I, J, K);
impl_query_set!(A, B, C, D, E, F, G, H, I, J, K, L);
impl_query_set!(A, B, C, D, E, F, G, H, I, J, K, L, M);
impl_query_set!(A, B, C, D, E, F, G, H, I, J, K, L, M, N);
impl_query_set!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O);
impl_query_set!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);
