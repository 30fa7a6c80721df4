//! # WIRE Core
//!
//! In-memory entity component store with a compact binary entity format.
//!
//! - Entities are integer ids recycled through a free list
//! - Each component type is stored in one dense, type-erased byte pool
//! - Pools are keyed by 128-bit identifiers, not Rust type ids, so the
//!   same data can be restored in another process
//!
//! ## Architecture Rules
//!
//! 1. **Dense storage** - swap-remove keeps every pool free of holes
//! 2. **No unsafe** - typed views over bytes go through `bytemuck`
//! 3. **Explicit registration** - the reflection table is an owned object
//!
//! ## Example
//!
//! ```rust
//! use wire_core::{EntityCodec, Registry, TypeRegistry};
//!
//! wire_core::component! {
//!     pub struct Position("6A2347FD-8CB4-431D-8599-AF7340755113") {
//!         pub x: f32,
//!         pub y: f32,
//!     }
//! }
//!
//! let mut types = TypeRegistry::new();
//! types.register::<Position>().unwrap();
//!
//! let mut registry = Registry::new();
//! let e = registry.create_entity();
//! registry.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
//!
//! let codec = EntityCodec::new(&types);
//! let bytes = codec.encode(&registry, e).unwrap();
//!
//! let mut restored = Registry::new();
//! codec.decode(&bytes, &mut restored).unwrap();
//! assert_eq!(restored.get_component::<Position>(e).unwrap().y, 2.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod config;
pub mod ecs;
pub mod error;
pub mod guid;
pub mod reflect;

pub use codec::EntityCodec;
pub use config::RegistryConfig;
pub use ecs::{
    Component, ComponentHooks, ComponentPool, ComponentSet, EntityAllocator, EntityId, Registry,
};
pub use error::{
    CodecError, CodecResult, ConfigError, ConfigResult, EcsError, EcsResult, GuidParseError,
    ReflectError, ReflectResult,
};
pub use guid::Guid;
pub use reflect::{ComponentDescriptor, TypeRegistry};
