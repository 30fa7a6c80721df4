//! # WIRE Scene
//!
//! Named scenes over a [`wire_core::Registry`] and their on-disk form.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wire_core::TypeRegistry;
//! use wire_scene::{Scene, SceneStorage};
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
//! let mut scene = Scene::new("Level1");
//! let e = scene.create_entity();
//! scene.entity_mut(e).unwrap().add(Position { x: 1.0, y: 2.0 }).unwrap();
//!
//! let storage = SceneStorage::new("assets/level1");
//! storage.save_scene(&types, &scene).unwrap();
//! let restored = storage.load_scene(&types).unwrap();
//! assert_eq!(restored.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod scene;
pub mod storage;

pub use config::SceneConfig;
pub use error::{SceneError, SceneResult};
pub use scene::{Entity, EntityMut, Scene};
pub use storage::SceneStorage;
