//! # loom_ecs
//!
//! An in-process entity-component store. Entities are opaque `u32` ids;
//! component data is held in densely packed, type-erased columns (one per
//! component type), driven by per-type metadata thunks registered lazily on
//! first use.
//!
//! This crate provides:
//!
//! - [`Component`] trait — the contract all stored data must satisfy.
//! - [`Entity`] / [`EntityAllocator`] — monotonically increasing identifiers.
//! - [`Column`] — aligned, packed, type-erased per-type storage.
//! - [`World`] — entity lifecycle, component CRUD, cached multi-component
//!   queries, and directed entity relations.
//!
//! The store is single-threaded by contract: there is no locking and no
//! cross-thread sharing. Mutating the world invalidates previously returned
//! query results; snapshot them before mutating.

pub mod column;
pub mod component;
pub mod entity;
pub mod error;
pub mod query;
pub mod relation;
pub mod world;

pub use column::Column;
pub use component::{Component, ComponentMeta, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::StoreError;
pub use query::{MAX_QUERY_TYPES, QuerySet};
pub use relation::RelationGraph;
pub use world::World;
