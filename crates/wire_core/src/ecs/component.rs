//! # Component System
//!
//! Components are pure data containers with no behavior.
//! They must be Pod and have a fixed size so a pool can hold them as raw bytes.

use std::fmt;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::ecs::entity::EntityId;
use crate::guid::Guid;
use crate::reflect::Property;

/// Marker trait for components.
///
/// Components must be:
/// - `Copy`: No heap allocations, bitwise copyable
/// - `Pod`: Plain old data, safe to view as bytes
/// - `Zeroable`: Can be safely zeroed
/// - `Default`: Default-constructed by `add_default_component`
///
/// Prefer the [`component!`](crate::component) macro, which derives all of
/// the above and the property list from the field declarations.
///
/// # Example
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use wire_core::{Component, Guid};
///
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     const NAME: &'static str = "Health";
///     const GUID: Guid = Guid::parse("9E7D5D2C-0A61-4C4B-9F0E-5B6A3D2C1B0A");
/// }
/// ```
pub trait Component: Copy + Pod + Zeroable + Default + Send + Sync + 'static {
    /// Name used in the reflection table and in encoded entity records.
    const NAME: &'static str;

    /// Stable 128-bit identifier of this component type.
    const GUID: Guid;

    /// Ordered list of the component's fields.
    fn properties() -> Vec<Property> {
        Vec::new()
    }
}

/// Declares a Pod component struct and its [`Component`] implementation.
///
/// The struct is `#[repr(C)]` and derives `Clone`, `Copy`, `Default`,
/// `bytemuck::Pod` and `bytemuck::Zeroable`; the calling crate must depend on
/// `bytemuck`. The property list follows field declaration order.
///
/// ```rust
/// wire_core::component! {
///     /// A 2D position.
///     #[derive(Debug, PartialEq)]
///     pub struct Position("6A2347FD-8CB4-431D-8599-AF7340755113") {
///         /// Horizontal coordinate.
///         pub x: f32,
///         /// Vertical coordinate.
///         pub y: f32,
///     }
/// }
///
/// use wire_core::Component;
/// assert_eq!(Position::NAME, "Position");
/// assert_eq!(Position::properties().len(), 2);
/// ```
#[macro_export]
macro_rules! component {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($guid:literal) {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, ::bytemuck::Pod, ::bytemuck::Zeroable)]
        #[repr(C)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Component for $name {
            const NAME: &'static str = stringify!($name);
            const GUID: $crate::Guid = $crate::Guid::parse($guid);

            fn properties() -> ::std::vec::Vec<$crate::reflect::Property> {
                ::std::vec![
                    $(
                        $crate::reflect::Property::new(
                            stringify!($field),
                            <$ty as $crate::reflect::PropertyValue>::KIND,
                        ),
                    )*
                ]
            }
        }
    };
}

/// Callback run on a freshly added record.
pub type CreateHook = Arc<dyn Fn(EntityId, &mut [u8]) + Send + Sync>;

/// Callback run on a record about to be removed.
pub type RemoveHook = Arc<dyn Fn(EntityId, &[u8]) + Send + Sync>;

/// Callback run on every record still stored when its pool is dropped.
pub type DestroyHook = Arc<dyn Fn(&mut [u8]) + Send + Sync>;

/// Optional lifecycle callbacks attached to a component pool.
///
/// Each add runs `on_create` once; each removal (including the cascade of
/// an entity removal) runs `on_remove` once before the bytes are
/// overwritten; dropping the pool runs `destructor` once per surviving
/// record in buffer order.
#[derive(Clone, Default)]
pub struct ComponentHooks {
    /// Runs after a record is written.
    pub on_create: Option<CreateHook>,
    /// Runs before a record is removed.
    pub on_remove: Option<RemoveHook>,
    /// Runs on every record still present when the pool is dropped.
    pub destructor: Option<DestroyHook>,
}

impl ComponentHooks {
    /// Hooks with no callbacks set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a typed creation callback.
    #[must_use]
    pub fn on_create<T: Component>(
        mut self,
        hook: impl Fn(EntityId, &mut T) + Send + Sync + 'static,
    ) -> Self {
        self.on_create = Some(Arc::new(move |id, bytes: &mut [u8]| {
            hook(id, bytemuck::from_bytes_mut(bytes));
        }));
        self
    }

    /// Sets a typed removal callback.
    #[must_use]
    pub fn on_remove<T: Component>(
        mut self,
        hook: impl Fn(EntityId, &T) + Send + Sync + 'static,
    ) -> Self {
        self.on_remove = Some(Arc::new(move |id, bytes: &[u8]| {
            hook(id, bytemuck::from_bytes(bytes));
        }));
        self
    }

    /// Sets a typed destructor callback.
    #[must_use]
    pub fn destructor<T: Component>(mut self, hook: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.destructor = Some(Arc::new(move |bytes: &mut [u8]| {
            hook(bytemuck::from_bytes_mut(bytes));
        }));
        self
    }

    /// Checks if no callback is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on_create.is_none() && self.on_remove.is_none() && self.destructor.is_none()
    }
}

impl fmt::Debug for ComponentHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHooks")
            .field("on_create", &self.on_create.is_some())
            .field("on_remove", &self.on_remove.is_some())
            .field("destructor", &self.destructor.is_some())
            .finish()
    }
}
