//! # Registry
//!
//! The central container for entities and their component pools.
//!
//! Pools are created lazily, one per component type, on the first add of
//! that type. Removing an entity cascades into every pool that holds it
//! before its id is returned to the free list.

use std::collections::{btree_map, BTreeMap, HashMap};

use crate::config::RegistryConfig;
use crate::ecs::component::{Component, ComponentHooks};
use crate::ecs::entity::{EntityAllocator, EntityId};
use crate::ecs::query::ComponentSet;
use crate::ecs::storage::ComponentPool;
use crate::error::{EcsError, EcsResult};
use crate::guid::Guid;

/// Owns every entity and component pool of one world.
///
/// `Clone` is a deep copy: the two registries share no storage afterwards.
///
/// # Example
///
/// ```rust
/// wire_core::component! {
///     pub struct Position("6A2347FD-8CB4-431D-8599-AF7340755113") {
///         pub x: f32,
///         pub y: f32,
///     }
/// }
///
/// let mut registry = wire_core::Registry::new();
/// let e = registry.create_entity();
/// registry.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
///
/// assert!(registry.has_component::<Position>(e));
/// assert_eq!(registry.get_all_components::<Position>().unwrap().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
    allocator: EntityAllocator,
    /// Ordered by identifier so pool iteration is stable.
    pools: BTreeMap<Guid, ComponentPool>,
    /// Hooks applied to pools now or when they are created.
    hooks: HashMap<Guid, ComponentHooks>,
    /// Parent to children adjacency.
    children: HashMap<EntityId, Vec<EntityId>>,
}

impl Registry {
    /// Creates an empty registry with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Creates an entity, reusing the most recently freed id if any.
    pub fn create_entity(&mut self) -> EntityId {
        let id = self.allocator.allocate();
        tracing::trace!("Created entity {}", id);
        id
    }

    /// Admits an externally chosen id, e.g. one restored from a file.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NullEntity`] for the null id and
    /// [`EcsError::EntityAlreadyAlive`] if the id is in use.
    pub fn add_entity(&mut self, id: EntityId) -> EcsResult<()> {
        self.allocator.admit(id)?;
        tracing::trace!("Admitted entity {}", id);
        Ok(())
    }

    /// Removes an entity and every component it has.
    ///
    /// Each pool's removal callback runs for the entity's record. The entity
    /// is detached from the hierarchy; its children stay alive.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NullEntity`] for the null id and
    /// [`EcsError::EntityNotAlive`] if the entity does not exist.
    pub fn remove_entity(&mut self, id: EntityId) -> EcsResult<()> {
        self.check_alive(id)?;

        let mut removed = 0usize;
        for pool in self.pools.values_mut() {
            if pool.has(id) {
                pool.remove(id)?;
                removed += 1;
            }
        }

        self.children.remove(&id);
        for siblings in self.children.values_mut() {
            siblings.retain(|&child| child != id);
        }

        self.allocator.release(id)?;
        tracing::debug!("Removed entity {} ({} components)", id, removed);
        Ok(())
    }

    /// Checks if `id` is a live entity.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.len()
    }

    /// Live entities in creation order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        self.allocator.live()
    }

    /// Drops every pool and resets id allocation.
    ///
    /// Destructor callbacks run for every stored record. Hooks registered
    /// with [`Self::set_hooks`] stay registered.
    pub fn clear(&mut self) {
        self.pools.clear();
        self.children.clear();
        self.allocator.reset();
        tracing::debug!("Cleared registry");
    }

    // =========================================================================
    // Typed components
    // =========================================================================

    /// Adds `value` to `id` and returns the stored record.
    ///
    /// Creates the pool for `T` on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for unknown entities,
    /// [`EcsError::DuplicateComponent`] if `id` already has a `T`, and
    /// [`EcsError::SizeMismatch`] if a pool with `T`'s identifier was created
    /// with a different record size.
    pub fn add_component<T: Component>(&mut self, id: EntityId, value: T) -> EcsResult<&mut T> {
        self.check_alive(id)?;
        let pool = self.typed_pool::<T>()?;
        tracing::trace!("Adding {} to entity {}", T::NAME, id);
        pool.add(id, value)
    }

    /// Adds a default-constructed `T` to `id`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_component`].
    pub fn add_default_component<T: Component>(&mut self, id: EntityId) -> EcsResult<&mut T> {
        self.add_component(id, T::default())
    }

    /// Borrows `id`'s `T`.
    ///
    /// The borrow ends before any further mutation of the registry, which
    /// is what keeps swap-remove and buffer growth from invalidating it.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for unknown entities and
    /// [`EcsError::MissingComponent`] if `id` has no `T`.
    pub fn get_component<T: Component>(&self, id: EntityId) -> EcsResult<&T> {
        self.check_alive(id)?;
        self.pools
            .get(&T::GUID)
            .ok_or(EcsError::MissingComponent {
                entity: id,
                component: T::GUID,
            })?
            .get(id)
    }

    /// Mutably borrows `id`'s `T`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_component`].
    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> EcsResult<&mut T> {
        self.check_alive(id)?;
        self.pools
            .get_mut(&T::GUID)
            .ok_or(EcsError::MissingComponent {
                entity: id,
                component: T::GUID,
            })?
            .get_mut(id)
    }

    /// Checks if `id` has a `T`. False when no `T` was ever added.
    #[inline]
    #[must_use]
    pub fn has_component<T: Component>(&self, id: EntityId) -> bool {
        self.pools.get(&T::GUID).is_some_and(|pool| pool.has(id))
    }

    /// Checks if `id` has every component of `Q`.
    #[inline]
    #[must_use]
    pub fn has_components<Q: ComponentSet>(&self, id: EntityId) -> bool {
        Q::contains(self, id)
    }

    /// Removes `id`'s `T`, running the pool's removal callback.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for unknown entities and
    /// [`EcsError::MissingComponent`] if `id` has no `T`.
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> EcsResult<()> {
        self.check_alive(id)?;
        self.pools
            .get_mut(&T::GUID)
            .ok_or(EcsError::MissingComponent {
                entity: id,
                component: T::GUID,
            })?
            .remove(id)
    }

    /// Every `T` as a dense slice. Empty when no `T` was ever added.
    ///
    /// Record order is unspecified once anything has been removed.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] if `T`'s pool has another record size.
    pub fn get_all_components<T: Component>(&self) -> EcsResult<&[T]> {
        match self.pools.get(&T::GUID) {
            Some(pool) => pool.as_slice(),
            None => Ok(&[]),
        }
    }

    /// Every `T` as a mutable dense slice. Empty when no `T` was ever added.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] if `T`'s pool has another record size.
    pub fn get_all_components_mut<T: Component>(&mut self) -> EcsResult<&mut [T]> {
        match self.pools.get_mut(&T::GUID) {
            Some(pool) => pool.as_mut_slice(),
            None => Ok(&mut []),
        }
    }

    /// Entities holding a `T`, in the order they received it.
    #[must_use]
    pub fn get_component_view<T: Component>(&self) -> &[EntityId] {
        self.pools
            .get(&T::GUID)
            .map(ComponentPool::entities)
            .unwrap_or(&[])
    }

    /// Calls `f` for every live entity that has all of `Q`, in creation order.
    ///
    /// Costs one membership check per live entity and component type; iterate
    /// [`Self::get_all_components`] when only one type is involved.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] before calling `f` if a pool of `Q`
    /// holds records of another layout (see [`Self::add_component_data`]).
    pub fn for_each<'a, Q: ComponentSet>(
        &'a self,
        mut f: impl FnMut(EntityId, Q::Item<'a>),
    ) -> EcsResult<()> {
        Q::check(self)?;
        for &id in self.allocator.live() {
            if let Some(items) = Q::fetch(self, id) {
                f(id, items);
            }
        }
        Ok(())
    }

    /// Attaches lifecycle callbacks to `T`'s pool.
    pub fn set_hooks<T: Component>(&mut self, hooks: ComponentHooks) {
        self.set_hooks_for(T::GUID, hooks);
    }

    /// Attaches lifecycle callbacks to the pool for `guid`, now or once it
    /// is created.
    pub fn set_hooks_for(&mut self, guid: Guid, hooks: ComponentHooks) {
        if let Some(pool) = self.pools.get_mut(&guid) {
            pool.set_hooks(hooks.clone());
        }
        self.hooks.insert(guid, hooks);
    }

    // =========================================================================
    // Type-erased components
    // =========================================================================

    /// Adds a raw record to `id` in the pool for `guid`.
    ///
    /// Creates the pool, sized to `bytes.len()`, on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for unknown entities,
    /// [`EcsError::ZeroSizedComponent`] for an empty payload,
    /// [`EcsError::SizeMismatch`] if the pool has another record size and
    /// [`EcsError::DuplicateComponent`] if `id` already has the component.
    pub fn add_component_data(&mut self, bytes: &[u8], guid: Guid, id: EntityId) -> EcsResult<()> {
        self.check_alive(id)?;
        let pool = self.erased_pool(guid, bytes.len())?;
        tracing::trace!("Adding {} bytes of {} to entity {}", bytes.len(), guid, id);
        pool.add_bytes(id, bytes)
    }

    /// Owned copy of `id`'s record in the pool for `guid`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if there is no such record.
    pub fn component_data(&self, guid: Guid, id: EntityId) -> EcsResult<Vec<u8>> {
        self.pools
            .get(&guid)
            .ok_or(EcsError::MissingComponent {
                entity: id,
                component: guid,
            })?
            .component_data(id)
    }

    /// Snapshot of every component `id` has, keyed by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for unknown entities.
    pub fn get_components(&self, id: EntityId) -> EcsResult<BTreeMap<Guid, Vec<u8>>> {
        self.check_alive(id)?;
        Ok(self
            .pools
            .iter()
            .filter_map(|(&guid, pool)| pool.record(id).map(|bytes| (guid, bytes.to_vec())))
            .collect())
    }

    /// Overwrites the components `id` already has from a snapshot.
    ///
    /// Entries for components `id` does not have are ignored. Nothing is
    /// written unless every applicable entry has the right size.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for unknown entities and
    /// [`EcsError::SizeMismatch`] for a wrongly sized entry.
    pub fn set_components(
        &mut self,
        components: &BTreeMap<Guid, Vec<u8>>,
        id: EntityId,
    ) -> EcsResult<()> {
        self.check_alive(id)?;

        for (guid, bytes) in components {
            if let Some(pool) = self.pools.get(guid).filter(|pool| pool.has(id)) {
                if bytes.len() != pool.component_size() {
                    return Err(EcsError::SizeMismatch {
                        component: *guid,
                        expected: pool.component_size(),
                        actual: bytes.len(),
                    });
                }
            }
        }

        for (guid, bytes) in components {
            if let Some(pool) = self.pools.get_mut(guid) {
                if pool.has(id) {
                    pool.set_component_data(id, bytes)?;
                }
            }
        }
        Ok(())
    }

    /// Concatenation of every record `id` has, in pool order.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for unknown entities.
    pub fn entity_component_data(&self, id: EntityId) -> EcsResult<Vec<u8>> {
        self.check_alive(id)?;
        let mut out = Vec::new();
        for pool in self.pools.values() {
            if let Some(bytes) = pool.record(id) {
                out.extend_from_slice(bytes);
            }
        }
        Ok(out)
    }

    /// Number of components `id` has. Zero for unknown entities.
    #[must_use]
    pub fn component_count(&self, id: EntityId) -> usize {
        self.pools.values().filter(|pool| pool.has(id)).count()
    }

    /// The pool for `guid`, if one was created.
    #[must_use]
    pub fn pool(&self, guid: Guid) -> Option<&ComponentPool> {
        self.pools.get(&guid)
    }

    /// Every pool, ordered by identifier.
    pub fn pools(&self) -> impl Iterator<Item = &ComponentPool> {
        self.pools.values()
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Records `child` under `parent`. Adding the same child twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] if either entity does not exist.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> EcsResult<()> {
        self.check_alive(parent)?;
        self.check_alive(child)?;

        let children = self.children.entry(parent).or_default();
        if !children.contains(&child) {
            children.push(child);
        }
        Ok(())
    }

    /// Detaches `child` from `parent`. Returns `false` if it was not attached.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        let Some(children) = self.children.get_mut(&parent) else {
            return false;
        };
        let Some(pos) = children.iter().position(|&c| c == child) else {
            return false;
        };
        children.remove(pos);
        if children.is_empty() {
            self.children.remove(&parent);
        }
        true
    }

    /// Children of `parent` in attach order.
    #[must_use]
    pub fn get_children(&self, parent: EntityId) -> &[EntityId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_alive(&self, id: EntityId) -> EcsResult<()> {
        if id.is_null() {
            Err(EcsError::NullEntity)
        } else if self.allocator.is_alive(id) {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive(id))
        }
    }

    fn typed_pool<T: Component>(&mut self) -> EcsResult<&mut ComponentPool> {
        match self.pools.entry(T::GUID) {
            btree_map::Entry::Occupied(entry) => Ok(entry.into_mut()),
            btree_map::Entry::Vacant(entry) => {
                let mut pool = ComponentPool::for_type::<T>(self.config.initial_pool_capacity)?;
                if let Some(hooks) = self.hooks.get(&T::GUID) {
                    pool.set_hooks(hooks.clone());
                }
                tracing::debug!("Created pool for {} ({} bytes)", T::NAME, pool.component_size());
                Ok(entry.insert(pool))
            }
        }
    }

    fn erased_pool(&mut self, guid: Guid, size: usize) -> EcsResult<&mut ComponentPool> {
        match self.pools.entry(guid) {
            btree_map::Entry::Occupied(entry) => Ok(entry.into_mut()),
            btree_map::Entry::Vacant(entry) => {
                let mut pool =
                    ComponentPool::with_capacity(guid, size, self.config.initial_pool_capacity)?;
                if let Some(hooks) = self.hooks.get(&guid) {
                    pool.set_hooks(hooks.clone());
                }
                tracing::debug!("Created pool for {} ({} bytes)", guid, size);
                Ok(entry.insert(pool))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    crate::component! {
        #[derive(Debug, PartialEq)]
        struct Position("11111111-2222-4333-8444-555555555501") {
            x: f32,
            y: f32,
        }
    }

    crate::component! {
        #[derive(Debug, PartialEq)]
        struct Velocity("11111111-2222-4333-8444-555555555502") {
            dx: f32,
            dy: f32,
        }
    }

    crate::component! {
        #[derive(Debug, PartialEq)]
        struct Health("11111111-2222-4333-8444-555555555503") {
            hp: u32,
        }
    }

    #[test]
    fn test_create_entity_ids() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        let b = registry.create_entity();
        assert!(!a.is_null());
        assert_ne!(a, b);
        assert_eq!(registry.entities(), &[a, b]);
    }

    #[test]
    fn test_add_and_get_component() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();

        assert_eq!(*registry.get_component::<Position>(e).unwrap(), Position { x: 1.0, y: 2.0 });
        registry.get_component_mut::<Position>(e).unwrap().x = 3.0;
        assert_eq!(registry.get_component::<Position>(e).unwrap().x, 3.0);
    }

    #[test]
    fn test_add_to_dead_entity_fails() {
        let mut registry = Registry::new();
        let ghost = EntityId::from_raw(5);
        assert_eq!(
            registry.add_default_component::<Position>(ghost).unwrap_err(),
            EcsError::EntityNotAlive(ghost)
        );
        assert_eq!(
            registry.add_default_component::<Position>(EntityId::NULL).unwrap_err(),
            EcsError::NullEntity
        );
        assert!(registry.pool(Position::GUID).is_none());
    }

    #[test]
    fn test_has_component_without_pool_is_false() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        assert!(!registry.has_component::<Velocity>(e));
        assert!(registry.get_all_components::<Velocity>().unwrap().is_empty());
        assert!(registry.get_all_components_mut::<Velocity>().unwrap().is_empty());
        assert!(registry.get_component_view::<Velocity>().is_empty());
        assert!(matches!(
            registry.get_component::<Velocity>(e),
            Err(EcsError::MissingComponent { .. })
        ));
    }

    #[test]
    fn test_has_components_is_logical_and() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_default_component::<Position>(e).unwrap();
        registry.add_default_component::<Velocity>(e).unwrap();

        assert!(registry.has_components::<Position>(e));
        assert!(registry.has_components::<(Position, Velocity)>(e));
        assert!(!registry.has_components::<(Position, Velocity, Health)>(e));
    }

    #[test]
    fn test_remove_entity_cascades() {
        let removed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&removed);

        let mut registry = Registry::new();
        registry.set_hooks::<Position>(
            ComponentHooks::new().on_remove::<Position>(move |id, _| sink.lock().push(id)),
        );

        let a = registry.create_entity();
        let b = registry.create_entity();
        registry.add_default_component::<Position>(a).unwrap();
        registry.add_default_component::<Velocity>(a).unwrap();
        registry.add_default_component::<Position>(b).unwrap();

        registry.remove_entity(a).unwrap();

        assert!(!registry.is_alive(a));
        assert_eq!(registry.pool(Position::GUID).unwrap().len(), 1);
        assert!(registry.pool(Velocity::GUID).unwrap().is_empty());
        assert_eq!(*removed.lock(), vec![a]);

        // Reused id starts clean.
        let c = registry.create_entity();
        assert_eq!(c, a);
        assert!(!registry.has_component::<Position>(c));
        assert_eq!(registry.component_count(c), 0);
    }

    #[test]
    fn test_remove_entity_errors() {
        let mut registry = Registry::new();
        assert_eq!(registry.remove_entity(EntityId::NULL), Err(EcsError::NullEntity));

        let e = registry.create_entity();
        registry.remove_entity(e).unwrap();
        assert_eq!(registry.remove_entity(e), Err(EcsError::EntityNotAlive(e)));
    }

    #[test]
    fn test_add_entity_advances_allocator() {
        let mut registry = Registry::new();
        registry.add_entity(EntityId::from_raw(40)).unwrap();
        assert_eq!(registry.create_entity(), EntityId::from_raw(41));
        assert_eq!(
            registry.add_entity(EntityId::from_raw(40)),
            Err(EcsError::EntityAlreadyAlive(EntityId::from_raw(40)))
        );
    }

    #[test]
    fn test_remove_component() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_default_component::<Health>(e).unwrap();
        registry.remove_component::<Health>(e).unwrap();

        assert!(!registry.has_component::<Health>(e));
        assert!(matches!(
            registry.remove_component::<Health>(e),
            Err(EcsError::MissingComponent { .. })
        ));
        assert!(registry.is_alive(e));
    }

    #[test]
    fn test_for_each_in_creation_order() {
        let mut registry = Registry::new();
        let ids: Vec<_> = (0..5).map(|_| registry.create_entity()).collect();
        for (i, &id) in ids.iter().enumerate() {
            registry.add_component(id, Position { x: i as f32, y: 0.0 }).unwrap();
            if i % 2 == 0 {
                registry.add_component(id, Velocity { dx: 1.0, dy: 0.0 }).unwrap();
            }
        }
        // Swap-remove reorders the Position pool but not creation order.
        registry.remove_component::<Position>(ids[0]).unwrap();

        let mut seen = Vec::new();
        registry
            .for_each::<(Position, Velocity)>(|id, (pos, vel)| {
                seen.push((id, pos.x, vel.dx));
            })
            .unwrap();
        assert_eq!(seen, vec![(ids[2], 2.0, 1.0), (ids[4], 4.0, 1.0)]);

        let mut count = 0;
        registry.for_each::<Position>(|_, _| count += 1).unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_for_each_rejects_foreign_layout() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Velocity { dx: 1.0, dy: 0.0 }).unwrap();
        // A three-byte record under Position's identifier.
        registry.add_component_data(&[1, 2, 3], Position::GUID, e).unwrap();

        let mut visited = 0;
        assert_eq!(
            registry.for_each::<(Velocity, Position)>(|_, _| visited += 1),
            Err(EcsError::SizeMismatch {
                component: Position::GUID,
                expected: 3,
                actual: std::mem::size_of::<Position>(),
            })
        );
        assert_eq!(visited, 0);
        assert!(registry.for_each::<Velocity>(|_, _| visited += 1).is_ok());
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_type_erased_add_and_typed_read() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        let value = Position { x: 5.0, y: 6.0 };
        registry
            .add_component_data(bytemuck::bytes_of(&value), Position::GUID, e)
            .unwrap();

        assert_eq!(*registry.get_component::<Position>(e).unwrap(), value);
        assert_eq!(
            registry.component_data(Position::GUID, e).unwrap(),
            bytemuck::bytes_of(&value)
        );
        assert!(matches!(
            registry.add_component_data(&[0u8; 4], Position::GUID, e),
            Err(EcsError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_get_and_set_components() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Position { x: 1.0, y: 1.0 }).unwrap();
        registry.add_component(e, Health { hp: 10 }).unwrap();

        let snapshot = registry.get_components(e).unwrap();
        assert_eq!(snapshot.len(), 2);

        registry.get_component_mut::<Position>(e).unwrap().x = 9.0;
        registry.get_component_mut::<Health>(e).unwrap().hp = 1;
        registry.set_components(&snapshot, e).unwrap();

        assert_eq!(registry.get_component::<Position>(e).unwrap().x, 1.0);
        assert_eq!(registry.get_component::<Health>(e).unwrap().hp, 10);
    }

    #[test]
    fn test_set_components_is_not_upsert() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        let b = registry.create_entity();
        registry.add_component(a, Position { x: 1.0, y: 1.0 }).unwrap();
        registry.add_component(a, Health { hp: 3 }).unwrap();
        registry.add_component(b, Health { hp: 0 }).unwrap();

        let snapshot = registry.get_components(a).unwrap();
        registry.set_components(&snapshot, b).unwrap();

        assert!(!registry.has_component::<Position>(b));
        assert_eq!(registry.get_component::<Health>(b).unwrap().hp, 3);
    }

    #[test]
    fn test_set_components_validates_before_writing() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Health { hp: 7 }).unwrap();
        registry.add_component(e, Position { x: 1.0, y: 1.0 }).unwrap();

        let mut bad = registry.get_components(e).unwrap();
        bad.insert(Health::GUID, vec![0; 4]);
        bad.insert(Position::GUID, vec![0; 3]);

        assert!(matches!(
            registry.set_components(&bad, e),
            Err(EcsError::SizeMismatch { .. })
        ));
        assert_eq!(registry.get_component::<Health>(e).unwrap().hp, 7);
    }

    #[test]
    fn test_entity_component_data_in_pool_order() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Health { hp: 0xAABB_CCDD }).unwrap();
        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();

        let data = registry.entity_component_data(e).unwrap();
        // Position's identifier sorts before Health's.
        assert_eq!(data.len(), 12);
        assert_eq!(&data[8..], &0xAABB_CCDDu32.to_le_bytes());
        assert_eq!(registry.component_count(e), 2);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original = Registry::new();
        let e = original.create_entity();
        original.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();

        let copy = original.clone();
        original.get_component_mut::<Position>(e).unwrap().x = 100.0;
        original.remove_entity(e).unwrap();

        assert!(copy.is_alive(e));
        assert_eq!(copy.get_component::<Position>(e).unwrap().x, 1.0);
    }

    #[test]
    fn test_hierarchy() {
        let mut registry = Registry::new();
        let parent = registry.create_entity();
        let a = registry.create_entity();
        let b = registry.create_entity();

        registry.add_child(parent, a).unwrap();
        registry.add_child(parent, a).unwrap();
        registry.add_child(parent, b).unwrap();
        assert_eq!(registry.get_children(parent), &[a, b]);

        assert!(registry.remove_child(parent, a));
        assert!(!registry.remove_child(parent, a));

        registry.remove_entity(b).unwrap();
        assert!(registry.get_children(parent).is_empty());
        assert!(registry.add_child(parent, b).is_err());
    }

    #[test]
    fn test_clear_runs_destructors_and_resets() {
        let destroyed = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&destroyed);

        let mut registry = Registry::new();
        registry.set_hooks::<Health>(
            ComponentHooks::new().destructor::<Health>(move |_| *counter.lock() += 1),
        );
        for _ in 0..3 {
            let e = registry.create_entity();
            registry.add_default_component::<Health>(e).unwrap();
        }

        registry.clear();
        assert_eq!(*destroyed.lock(), 3);
        assert_eq!(registry.entity_count(), 0);
        assert_eq!(registry.create_entity(), EntityId::from_raw(1));
    }

    #[test]
    fn test_hooks_apply_to_existing_pool() {
        let created = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&created);

        let mut registry = Registry::new();
        let a = registry.create_entity();
        registry.add_default_component::<Health>(a).unwrap();

        registry.set_hooks_for(
            Health::GUID,
            ComponentHooks::new().on_create::<Health>(move |_, _| *counter.lock() += 1),
        );
        let b = registry.create_entity();
        registry.add_default_component::<Health>(b).unwrap();

        assert_eq!(*created.lock(), 1);
    }

    #[test]
    fn test_pool_capacity_from_config() {
        let registry = Registry::with_config(RegistryConfig {
            initial_pool_capacity: 8,
        });
        assert_eq!(registry.config().initial_pool_capacity, 8);
    }
}
