//! # Entity Component System
//!
//! Type-erased dense storage keyed by 128-bit component identifiers.
//!
//! ## Design Philosophy
//!
//! - Entities are bare integer ids, recycled through a free list
//! - Each component type lives in one dense byte pool
//! - Removal is swap-remove, so pools never have holes
//! - Typed access goes through `bytemuck`, never raw pointer casts

mod component;
mod entity;
mod query;
mod registry;
mod storage;

pub use component::{Component, ComponentHooks, CreateHook, DestroyHook, RemoveHook};
pub use entity::{EntityAllocator, EntityId};
pub use query::ComponentSet;
pub use registry::Registry;
pub use storage::{ComponentPool, MAX_COMPONENT_ALIGN};
