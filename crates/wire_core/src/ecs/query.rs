//! # Composite Queries
//!
//! [`ComponentSet`] names one or more component types at once, so the
//! registry can test and fetch them together:
//!
//! ```rust,ignore
//! registry.for_each::<(Position, Velocity)>(|id, (pos, vel)| { /* ... */ })?;
//! ```

use crate::ecs::component::Component;
use crate::ecs::entity::EntityId;
use crate::ecs::registry::Registry;
use crate::error::EcsResult;

/// A component type or a tuple of up to six component types.
pub trait ComponentSet {
    /// Borrowed records handed to query callbacks.
    type Item<'a>;

    /// Checks if `entity` has every component of the set.
    fn contains(registry: &Registry, entity: EntityId) -> bool;

    /// Checks that every existing pool of the set stores records of the
    /// right layout.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EcsError::SizeMismatch`] or
    /// [`crate::EcsError::UnsupportedAlignment`] for the first pool that does
    /// not fit. Missing pools are fine.
    fn check(registry: &Registry) -> EcsResult<()>;

    /// Borrows every component of the set, or `None` if any is missing.
    fn fetch(registry: &Registry, entity: EntityId) -> Option<Self::Item<'_>>;
}

impl<T: Component> ComponentSet for T {
    type Item<'a> = &'a T;

    #[inline]
    fn contains(registry: &Registry, entity: EntityId) -> bool {
        registry.has_component::<T>(entity)
    }

    #[inline]
    fn check(registry: &Registry) -> EcsResult<()> {
        registry.pool(T::GUID).map_or(Ok(()), |pool| pool.check_type::<T>())
    }

    #[inline]
    fn fetch(registry: &Registry, entity: EntityId) -> Option<Self::Item<'_>> {
        registry.get_component::<T>(entity).ok()
    }
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            type Item<'a> = ($(&'a $name,)+);

            #[inline]
            fn contains(registry: &Registry, entity: EntityId) -> bool {
                $(registry.has_component::<$name>(entity))&&+
            }

            #[inline]
            fn check(registry: &Registry) -> EcsResult<()> {
                $(<$name as ComponentSet>::check(registry)?;)+
                Ok(())
            }

            #[inline]
            fn fetch(registry: &Registry, entity: EntityId) -> Option<Self::Item<'_>> {
                Some(($(registry.get_component::<$name>(entity).ok()?,)+))
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
