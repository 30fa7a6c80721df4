//! # Component Reflection
//!
//! The descriptor table the codec uses to name component types.
//!
//! Descriptors are produced at build time by the [`component!`](crate::component)
//! macro (or written by hand) and registered explicitly into a
//! [`TypeRegistry`] that the host application owns. There is no process-wide
//! registration state.

mod property;
mod types;

pub use property::{Property, PropertyType, PropertyValue};
pub use types::{ComponentDescriptor, TypeRegistry};
