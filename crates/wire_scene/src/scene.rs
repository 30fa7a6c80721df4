//! # Scenes
//!
//! A scene is a named [`Registry`] plus lightweight entity handles.

use std::fmt;

use wire_core::{Component, EcsResult, EntityId, Registry};

use crate::config::SceneConfig;

/// Handle to an entity of a [`Scene`].
///
/// Plain id wrapper; it does not keep the scene borrowed. Use
/// [`Scene::entity_mut`] to operate on the entity's components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(EntityId);

impl Entity {
    /// The null handle.
    pub const NULL: Self = Self(EntityId::NULL);

    /// Wraps a raw entity id.
    #[inline]
    #[must_use]
    pub const fn new(id: EntityId) -> Self {
        Self(id)
    }

    /// The underlying id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> EntityId {
        self.0
    }

    /// Checks if this is the null handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl From<EntityId> for Entity {
    fn from(id: EntityId) -> Self {
        Self(id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A named collection of entities.
///
/// `Clone` deep-copies the underlying registry.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    name: String,
    registry: Registry,
}

impl Scene {
    /// Creates an empty scene with default registry settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: Registry::new(),
        }
    }

    /// Creates an empty scene named and tuned by `config`.
    #[must_use]
    pub fn with_config(config: &SceneConfig) -> Self {
        Self {
            name: config.name.clone(),
            registry: Registry::with_config(config.registry.clone()),
        }
    }

    /// Scene name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the scene.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Creates an entity.
    pub fn create_entity(&mut self) -> Entity {
        Entity(self.registry.create_entity())
    }

    /// Removes an entity and its components.
    ///
    /// Returns `false` if the entity is not part of this scene.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        if !self.contains(entity) {
            return false;
        }
        self.registry.remove_entity(entity.0).is_ok()
    }

    /// Checks if `entity` is alive in this scene.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.registry.is_alive(entity.0)
    }

    /// Live entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.registry.entities().iter().copied().map(Entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.entity_count()
    }

    /// Checks if the scene has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.entity_count() == 0
    }

    /// Mutable handle to a live entity.
    #[must_use]
    pub fn entity_mut(&mut self, entity: Entity) -> Option<EntityMut<'_>> {
        self.contains(entity).then(|| EntityMut {
            registry: &mut self.registry,
            id: entity.0,
        })
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The underlying registry, mutably.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}

/// Borrowed access to one live entity's components.
#[derive(Debug)]
pub struct EntityMut<'s> {
    registry: &'s mut Registry,
    id: EntityId,
}

impl EntityMut<'_> {
    /// The entity handle.
    #[must_use]
    pub fn entity(&self) -> Entity {
        Entity(self.id)
    }

    /// Adds a component.
    ///
    /// # Errors
    ///
    /// See [`Registry::add_component`].
    pub fn add<T: Component>(&mut self, value: T) -> EcsResult<&mut T> {
        self.registry.add_component(self.id, value)
    }

    /// Adds a default-constructed component.
    ///
    /// # Errors
    ///
    /// See [`Registry::add_component`].
    pub fn add_default<T: Component>(&mut self) -> EcsResult<&mut T> {
        self.registry.add_default_component(self.id)
    }

    /// Borrows a component.
    ///
    /// # Errors
    ///
    /// See [`Registry::get_component`].
    pub fn get<T: Component>(&self) -> EcsResult<&T> {
        self.registry.get_component(self.id)
    }

    /// Mutably borrows a component.
    ///
    /// # Errors
    ///
    /// See [`Registry::get_component`].
    pub fn get_mut<T: Component>(&mut self) -> EcsResult<&mut T> {
        self.registry.get_component_mut(self.id)
    }

    /// Checks if the entity has a component.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.registry.has_component::<T>(self.id)
    }

    /// Removes a component.
    ///
    /// # Errors
    ///
    /// See [`Registry::remove_component`].
    pub fn remove<T: Component>(&mut self) -> EcsResult<()> {
        self.registry.remove_component::<T>(self.id)
    }

    /// Attaches `child` under this entity.
    ///
    /// # Errors
    ///
    /// See [`Registry::add_child`].
    pub fn add_child(&mut self, child: Entity) -> EcsResult<()> {
        self.registry.add_child(self.id, child.0)
    }

    /// Children of this entity in attach order.
    pub fn children(&self) -> impl Iterator<Item = Entity> + '_ {
        self.registry.get_children(self.id).iter().copied().map(Entity)
    }
}
