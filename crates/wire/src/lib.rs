//! # WIRE
//!
//! Dense entity component storage with a compact binary entity format.
//!
//! - [`wire_core`]: identifiers, pools, the registry and the entity codec
//! - [`wire_scene`]: named scenes and one-file-per-entity persistence
//!
//! The most used items are re-exported at the crate root.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub use wire_core;
pub use wire_scene;

pub use wire_core::{
    component, Component, ComponentHooks, EntityCodec, EntityId, Guid, Registry, RegistryConfig,
    TypeRegistry,
};
pub use wire_scene::{Entity, Scene, SceneConfig, SceneStorage};
