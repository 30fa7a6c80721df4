//! Component descriptors and the table that resolves names and identifiers.

use std::collections::{BTreeMap, HashMap};

use crate::ecs::Component;
use crate::error::{ReflectError, ReflectResult};
use crate::guid::Guid;
use crate::reflect::Property;

/// Everything the codec needs to know about one component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentDescriptor {
    name: String,
    guid: Guid,
    size: usize,
    align: usize,
    properties: Vec<Property>,
}

impl ComponentDescriptor {
    /// Describes a Rust component type.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            name: T::NAME.to_owned(),
            guid: T::GUID,
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
            properties: T::properties(),
        }
    }

    /// Describes a layout that has no Rust type in this process.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        guid: Guid,
        size: usize,
        align: usize,
        properties: Vec<Property>,
    ) -> Self {
        Self {
            name: name.into(),
            guid,
            size,
            align,
            properties,
        }
    }

    /// Registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type identifier.
    #[must_use]
    pub fn guid(&self) -> Guid {
        self.guid
    }

    /// Record size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Record alignment in bytes.
    #[must_use]
    pub fn align(&self) -> usize {
        self.align
    }

    /// Ordered field list.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }
}

/// Resolves component names to descriptors and identifiers to names.
///
/// Owned by the host application and populated by explicit calls during
/// startup, so registration order is deterministic.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    by_name: BTreeMap<String, ComponentDescriptor>,
    names: HashMap<Guid, String>,
}

impl TypeRegistry {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a Rust component type.
    ///
    /// Returns `Ok(false)` if a type with the same name is already registered;
    /// the existing entry is kept.
    ///
    /// # Errors
    ///
    /// See [`Self::register_descriptor`].
    pub fn register<T: Component>(&mut self) -> ReflectResult<bool> {
        self.register_descriptor(ComponentDescriptor::of::<T>())
    }

    /// Registers a descriptor.
    ///
    /// Returns `Ok(false)` if the name is already registered.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectError::NullGuid`] for the null identifier and
    /// [`ReflectError::GuidCollision`] if the identifier already belongs to a
    /// different name.
    pub fn register_descriptor(&mut self, descriptor: ComponentDescriptor) -> ReflectResult<bool> {
        if descriptor.guid.is_null() {
            return Err(ReflectError::NullGuid(descriptor.name));
        }
        if self.by_name.contains_key(&descriptor.name) {
            return Ok(false);
        }
        if let Some(existing) = self.names.get(&descriptor.guid) {
            return Err(ReflectError::GuidCollision {
                guid: descriptor.guid,
                existing: existing.clone(),
                name: descriptor.name,
            });
        }

        tracing::trace!(
            name = %descriptor.name,
            guid = %descriptor.guid,
            size = descriptor.size,
            "registered component type"
        );
        self.names.insert(descriptor.guid, descriptor.name.clone());
        self.by_name.insert(descriptor.name.clone(), descriptor);
        Ok(true)
    }

    /// Looks up a descriptor by component name.
    #[must_use]
    pub fn descriptor_by_name(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.by_name.get(name)
    }

    /// Looks up a descriptor by identifier.
    #[must_use]
    pub fn descriptor_by_guid(&self, guid: Guid) -> Option<&ComponentDescriptor> {
        self.names.get(&guid).and_then(|name| self.by_name.get(name))
    }

    /// Returns the registered name of an identifier.
    #[must_use]
    pub fn name_of(&self, guid: Guid) -> Option<&str> {
        self.names.get(&guid).map(String::as_str)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Checks if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterates descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.by_name.values()
    }
}
