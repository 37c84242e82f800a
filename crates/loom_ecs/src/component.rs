//! Core [`Component`] trait and type-erased metadata.
//!
//! Every piece of data stored in the world must implement [`Component`]. The
//! trait requires `Clone + 'static`: clones drive entity cloning, and the
//! `'static` bound lets the store own the data for the process lifetime.
//! Neither `Send`/`Sync` nor serialisability is required — the store is
//! single-threaded by contract, which is what allows trait-object payloads
//! (e.g. behaviour scripts) to live in it like any plain struct.
//!
//! ## Type Identity
//!
//! [`ComponentTypeId`] is derived from the component's **string name** using
//! the FNV-1a 64-bit hash algorithm. The id is deterministic across builds
//! and processes, so it can double as a stable runtime tag.

use serde::{Deserialize, Serialize};

/// A unique identifier for a component type, derived from its string name
/// using the FNV-1a 64-bit hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`ComponentTypeId`] from a component's string name using
    /// the FNV-1a 64-bit hash algorithm.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Compute the [`ComponentTypeId`] for a Rust component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

/// Metadata about a component type, used for type-erased storage.
///
/// Registered lazily the first time a component of the type is emplaced.
#[derive(Debug, Clone, Copy)]
pub struct ComponentMeta {
    /// The unique type identifier.
    pub type_id: ComponentTypeId,
    /// The human-readable name of the component (e.g. `"Position"`).
    pub name: &'static str,
    /// Size and alignment of one component instance.
    pub layout: std::alloc::Layout,
    /// Clone the instance at `src` into the uninitialised slot at `dst`.
    ///
    /// # Safety
    ///
    /// `src` must point to a valid, live instance of the type; `dst` must
    /// point to uninitialised, writable memory of at least `layout.size()`
    /// bytes, aligned to `layout.align()`.
    pub clone_fn: unsafe fn(*const u8, *mut u8),
    /// Drop the instance at the pointer in place. `None` when the type has
    /// no drop glue.
    pub drop_fn: Option<unsafe fn(*mut u8)>,
}

/// The core component trait.
///
/// All data stored in the world must implement this trait. Clones must be
/// deep: cloning an entity clones its components through [`ComponentMeta`]'s
/// clone thunk, and mutating the copy must not affect the original.
///
/// # Examples
///
/// ```rust
/// use loom_ecs::Component;
///
/// #[derive(Debug, Clone)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Clone + 'static {
    /// A human-readable name for this component type.
    fn type_name() -> &'static str;

    /// Returns the [`ComponentTypeId`] for this component.
    fn type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }

    /// Returns the [`ComponentMeta`] descriptor for this component type.
    fn meta() -> ComponentMeta {
        ComponentMeta {
            type_id: Self::type_id(),
            name: Self::type_name(),
            layout: std::alloc::Layout::new::<Self>(),
            clone_fn: |src: *const u8, dst: *mut u8| unsafe {
                // SAFETY: Caller guarantees `src` is a live `Self` and `dst`
                // is uninitialised memory fitting `Self`.
                let value = (*(src as *const Self)).clone();
                std::ptr::write(dst as *mut Self, value);
            },
            drop_fn: if std::mem::needs_drop::<Self>() {
                Some(|ptr: *mut u8| unsafe {
                    // SAFETY: Caller guarantees `ptr` is a live `Self`.
                    std::ptr::drop_in_place(ptr as *mut Self);
                })
            } else {
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[test]
    fn test_component_type_id_is_stable() {
        let id1 = Health::type_id();
        let id2 = Health::type_id();
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_component_type_id_matches_from_name() {
        assert_eq!(Health::type_id(), ComponentTypeId::from_name("Health"));
    }

    #[test]
    fn test_component_type_id_differs_between_types() {
        #[derive(Debug, Clone)]
        struct Velocity {
            x: f32,
            y: f32,
        }
        impl Component for Velocity {
            fn type_name() -> &'static str {
                "Velocity"
            }
        }

        let _ = Velocity { x: 0.0, y: 0.0 };
        assert_ne!(Health::type_id(), Velocity::type_id());
    }

    #[test]
    fn test_fnv1a_known_vector() {
        // FNV-1a 64-bit of the empty string is the offset basis itself.
        assert_eq!(
            ComponentTypeId::from_name(""),
            ComponentTypeId(0xcbf2_9ce4_8422_2325)
        );
    }

    #[test]
    fn test_component_meta_layout() {
        let meta = Health::meta();
        assert_eq!(meta.name, "Health");
        assert_eq!(meta.layout, std::alloc::Layout::new::<Health>());
        // Plain f32 pairs have no drop glue.
        assert!(meta.drop_fn.is_none());
    }

    #[test]
    fn test_meta_clone_thunk_deep_copies() {
        #[derive(Debug, Clone, PartialEq)]
        struct Tag {
            label: String,
        }
        impl Component for Tag {
            fn type_name() -> &'static str {
                "Tag"
            }
        }

        let meta = Tag::meta();
        assert!(meta.drop_fn.is_some());

        let src = Tag {
            label: "alpha".to_string(),
        };
        let mut dst = std::mem::MaybeUninit::<Tag>::uninit();
        // SAFETY: `src` is live; `dst` is uninitialised storage for a Tag.
        let copy = unsafe {
            (meta.clone_fn)(
                &src as *const Tag as *const u8,
                dst.as_mut_ptr() as *mut u8,
            );
            dst.assume_init()
        };
        assert_eq!(copy, src);
    }
}
