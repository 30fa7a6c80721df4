//! # Component Storage
//!
//! Dense, type-erased storage for one component type.
//!
//! A pool holds fixed-size records back to back in a single byte buffer:
//! - The buffer length is always `len() * component_size()`, no gaps
//! - Removal is O(1) swap-remove: the last record moves into the hole
//! - Entity to offset lookup is O(1)
//!
//! Swap-remove reorders the dense array. Callers must not depend on record
//! order, and must not hold a typed view across an add or remove on the
//! same pool (the borrow checker enforces the latter).

use std::collections::HashMap;
use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::ecs::component::{Component, ComponentHooks};
use crate::ecs::entity::EntityId;
use crate::error::{EcsError, EcsResult};
use crate::guid::Guid;

/// Largest record alignment a pool can serve typed views for.
pub const MAX_COMPONENT_ALIGN: usize = 16;

/// Backing unit of the byte buffer. Keeps the buffer start 16-byte aligned.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C, align(16))]
struct Block([u8; MAX_COMPONENT_ALIGN]);

/// Storage for every record of a single component type.
///
/// Three indices describe the same set of entities at all times:
/// the entity list in insertion order, the entity to byte offset map, and
/// the dense owner list (owner of record `i` is `owners[i]`).
#[derive(Clone)]
pub struct ComponentPool {
    /// Type stored here.
    guid: Guid,
    /// Bytes per record. Fixed at construction.
    component_size: usize,
    /// Aligned backing storage. Only the first `len_bytes` bytes are live.
    blocks: Vec<Block>,
    /// Live length of the byte buffer.
    len_bytes: usize,
    /// Entities in insertion order.
    entities: Vec<EntityId>,
    /// Byte offset of each entity's record.
    offsets: HashMap<EntityId, usize>,
    /// Owner of each record, in buffer order.
    owners: Vec<EntityId>,
    /// Lifecycle callbacks.
    hooks: ComponentHooks,
}

impl ComponentPool {
    /// Creates an empty pool for records of `component_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ZeroSizedComponent`] if `component_size` is zero.
    pub fn new(guid: Guid, component_size: usize) -> EcsResult<Self> {
        Self::with_capacity(guid, component_size, 0)
    }

    /// Creates an empty pool with room for `records` records.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ZeroSizedComponent`] if `component_size` is zero.
    pub fn with_capacity(guid: Guid, component_size: usize, records: usize) -> EcsResult<Self> {
        if component_size == 0 {
            return Err(EcsError::ZeroSizedComponent(guid));
        }

        let bytes = component_size.saturating_mul(records);
        Ok(Self {
            guid,
            component_size,
            blocks: Vec::with_capacity(bytes.div_ceil(MAX_COMPONENT_ALIGN)),
            len_bytes: 0,
            entities: Vec::with_capacity(records),
            offsets: HashMap::with_capacity(records),
            owners: Vec::with_capacity(records),
            hooks: ComponentHooks::default(),
        })
    }

    /// Creates an empty pool for a Rust component type.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ZeroSizedComponent`] for zero-sized types and
    /// [`EcsError::UnsupportedAlignment`] for alignments above
    /// [`MAX_COMPONENT_ALIGN`].
    pub fn for_type<T: Component>(records: usize) -> EcsResult<Self> {
        check_alignment::<T>()?;
        Self::with_capacity(T::GUID, std::mem::size_of::<T>(), records)
    }

    /// Type identifier of the stored records.
    #[inline]
    #[must_use]
    pub fn guid(&self) -> Guid {
        self.guid
    }

    /// Bytes per record.
    #[inline]
    #[must_use]
    pub fn component_size(&self) -> usize {
        self.component_size
    }

    /// Number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Checks if the pool holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Lifecycle callbacks currently attached.
    #[must_use]
    pub fn hooks(&self) -> &ComponentHooks {
        &self.hooks
    }

    /// Replaces the lifecycle callbacks.
    pub fn set_hooks(&mut self, hooks: ComponentHooks) {
        self.hooks = hooks;
    }

    /// Checks if `entity` has a record here. O(1).
    #[inline]
    #[must_use]
    pub fn has(&self, entity: EntityId) -> bool {
        self.offsets.contains_key(&entity)
    }

    /// Appends a record copied from `bytes`.
    ///
    /// Runs the creation callback once on the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] if `bytes` is not exactly one record
    /// long and [`EcsError::DuplicateComponent`] if `entity` already has one.
    pub fn add_bytes(&mut self, entity: EntityId, bytes: &[u8]) -> EcsResult<()> {
        self.check_len(bytes.len())?;
        let offset = self.push_record(entity)?;
        self.slot_mut(offset).copy_from_slice(bytes);
        self.run_on_create(entity, offset);
        Ok(())
    }

    /// Appends a typed record and returns it.
    ///
    /// Runs the creation callback once before returning.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] if `T` does not fit this pool and
    /// [`EcsError::DuplicateComponent`] if `entity` already has a record.
    pub fn add<T: Component>(&mut self, entity: EntityId, value: T) -> EcsResult<&mut T> {
        self.check_type::<T>()?;
        let offset = self.push_record(entity)?;
        self.slot_mut(offset)
            .copy_from_slice(bytemuck::bytes_of(&value));
        self.run_on_create(entity, offset);
        Ok(bytemuck::from_bytes_mut(self.slot_mut(offset)))
    }

    /// Removes `entity`'s record by swap-remove.
    ///
    /// The removal callback sees the record before it is overwritten. The
    /// last record in the buffer moves into the freed slot.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if `entity` has no record.
    pub fn remove(&mut self, entity: EntityId) -> EcsResult<()> {
        let offset = self.offset_of(entity)?;

        if let Some(hook) = &self.hooks.on_remove {
            hook(entity, self.slot(offset));
        }

        let size = self.component_size;
        let last = self.len_bytes - size;
        if offset != last {
            self.buffer_mut().copy_within(last..last + size, offset);
            let moved = self.owners[last / size];
            self.owners[offset / size] = moved;
            self.offsets.insert(moved, offset);
        }
        self.owners.pop();
        self.offsets.remove(&entity);
        self.len_bytes = last;
        self.blocks.truncate(last.div_ceil(MAX_COMPONENT_ALIGN));

        if let Some(pos) = self.entities.iter().position(|&e| e == entity) {
            self.entities.remove(pos);
        }

        tracing::trace!(guid = %self.guid, %entity, "removed component");
        Ok(())
    }

    /// Borrows `entity`'s record as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] if `T` does not fit this pool and
    /// [`EcsError::MissingComponent`] if `entity` has no record.
    pub fn get<T: Component>(&self, entity: EntityId) -> EcsResult<&T> {
        self.check_type::<T>()?;
        let offset = self.offset_of(entity)?;
        Ok(bytemuck::from_bytes(self.slot(offset)))
    }

    /// Mutably borrows `entity`'s record as `T`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> EcsResult<&mut T> {
        self.check_type::<T>()?;
        let offset = self.offset_of(entity)?;
        Ok(bytemuck::from_bytes_mut(self.slot_mut(offset)))
    }

    /// Borrows `entity`'s raw record bytes, if present.
    #[must_use]
    pub fn record(&self, entity: EntityId) -> Option<&[u8]> {
        self.offsets.get(&entity).map(|&offset| self.slot(offset))
    }

    /// Returns an owned copy of `entity`'s record bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if `entity` has no record.
    pub fn component_data(&self, entity: EntityId) -> EcsResult<Vec<u8>> {
        let offset = self.offset_of(entity)?;
        Ok(self.slot(offset).to_vec())
    }

    /// Overwrites `entity`'s record in place.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] if `bytes` is not exactly one record
    /// long and [`EcsError::MissingComponent`] if `entity` has no record.
    pub fn set_component_data(&mut self, entity: EntityId, bytes: &[u8]) -> EcsResult<()> {
        self.check_len(bytes.len())?;
        let offset = self.offset_of(entity)?;
        self.slot_mut(offset).copy_from_slice(bytes);
        Ok(())
    }

    /// Entities in insertion order.
    ///
    /// Index `i` here is not record `i` of [`Self::as_slice`] once a removal
    /// has happened; use [`Self::iter`] for correct pairs.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// All records as a typed dense slice, in buffer order.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] if `T` does not fit this pool.
    pub fn as_slice<T: Component>(&self) -> EcsResult<&[T]> {
        self.check_type::<T>()?;
        Ok(bytemuck::cast_slice(self.buffer()))
    }

    /// All records as a mutable typed dense slice.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] if `T` does not fit this pool.
    pub fn as_mut_slice<T: Component>(&mut self) -> EcsResult<&mut [T]> {
        self.check_type::<T>()?;
        Ok(bytemuck::cast_slice_mut(self.buffer_mut()))
    }

    /// Iterates `(owner, record)` pairs in buffer order.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SizeMismatch`] if `T` does not fit this pool.
    pub fn iter<T: Component>(&self) -> EcsResult<impl Iterator<Item = (EntityId, &T)> + '_> {
        let records = self.as_slice::<T>()?;
        Ok(self.owners.iter().copied().zip(records.iter()))
    }

    /// The live byte buffer.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.buffer()
    }

    fn buffer(&self) -> &[u8] {
        &bytemuck::cast_slice::<Block, u8>(&self.blocks)[..self.len_bytes]
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        let len = self.len_bytes;
        &mut bytemuck::cast_slice_mut::<Block, u8>(&mut self.blocks)[..len]
    }

    fn slot(&self, offset: usize) -> &[u8] {
        &self.buffer()[offset..offset + self.component_size]
    }

    fn slot_mut(&mut self, offset: usize) -> &mut [u8] {
        let size = self.component_size;
        &mut self.buffer_mut()[offset..offset + size]
    }

    fn offset_of(&self, entity: EntityId) -> EcsResult<usize> {
        self.offsets
            .get(&entity)
            .copied()
            .ok_or(EcsError::MissingComponent {
                entity,
                component: self.guid,
            })
    }

    fn check_len(&self, actual: usize) -> EcsResult<()> {
        if actual == self.component_size {
            Ok(())
        } else {
            Err(EcsError::SizeMismatch {
                component: self.guid,
                expected: self.component_size,
                actual,
            })
        }
    }

    pub(crate) fn check_type<T: Component>(&self) -> EcsResult<()> {
        self.check_len(std::mem::size_of::<T>())?;
        check_alignment::<T>()
    }

    /// Reserves a zeroed slot at the end of the buffer and indexes it.
    fn push_record(&mut self, entity: EntityId) -> EcsResult<usize> {
        if self.offsets.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: self.guid,
            });
        }

        let offset = self.len_bytes;
        self.len_bytes += self.component_size;
        // Vec growth is geometric, so appends stay amortized O(1).
        self.blocks
            .resize(self.len_bytes.div_ceil(MAX_COMPONENT_ALIGN), Block::zeroed());

        self.offsets.insert(entity, offset);
        self.entities.push(entity);
        self.owners.push(entity);
        Ok(offset)
    }

    fn run_on_create(&mut self, entity: EntityId, offset: usize) {
        if let Some(hook) = self.hooks.on_create.clone() {
            hook(entity, self.slot_mut(offset));
        }
    }
}

fn check_alignment<T: Component>() -> EcsResult<()> {
    let align = std::mem::align_of::<T>();
    if align > MAX_COMPONENT_ALIGN {
        return Err(EcsError::UnsupportedAlignment {
            component: T::GUID,
            align,
            max: MAX_COMPONENT_ALIGN,
        });
    }
    Ok(())
}

impl Drop for ComponentPool {
    fn drop(&mut self) {
        if let Some(destructor) = self.hooks.destructor.take() {
            let size = self.component_size;
            for record in self.buffer_mut().chunks_exact_mut(size) {
                destructor(record);
            }
        }
    }
}

impl fmt::Debug for ComponentPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentPool")
            .field("guid", &self.guid)
            .field("component_size", &self.component_size)
            .field("len", &self.len())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    crate::component! {
        #[derive(Debug, PartialEq)]
        struct Pair("7F3B2A10-0C1D-4E2F-8A3B-4C5D6E7F8091") {
            x: f32,
            y: f32,
        }
    }

    crate::component! {
        #[derive(Debug, PartialEq)]
        struct Wide("7F3B2A10-0C1D-4E2F-8A3B-4C5D6E7F8092") {
            v: [f32; 3],
        }
    }

    fn id(raw: u32) -> EntityId {
        EntityId::from_raw(raw)
    }

    fn pair(x: f32) -> Pair {
        Pair { x, y: 0.0 }
    }

    fn assert_consistent(pool: &ComponentPool) {
        assert_eq!(pool.bytes().len(), pool.len() * pool.component_size());
        assert_eq!(pool.entities().len(), pool.len());
        let listed: HashSet<_> = pool.entities().iter().copied().collect();
        assert_eq!(listed.len(), pool.len());
        for &entity in pool.entities() {
            assert!(pool.has(entity));
        }
    }

    #[test]
    fn test_add_and_get() {
        let mut pool = ComponentPool::for_type::<Pair>(4).unwrap();
        pool.add(id(1), Pair { x: 1.0, y: 2.0 }).unwrap();
        pool.add(id(2), Pair { x: 3.0, y: 4.0 }).unwrap();

        assert_eq!(pool.len(), 2);
        assert_eq!(*pool.get::<Pair>(id(2)).unwrap(), Pair { x: 3.0, y: 4.0 });
        assert_consistent(&pool);
    }

    #[test]
    fn test_zero_size_rejected() {
        let guid = Pair::GUID;
        assert_eq!(
            ComponentPool::new(guid, 0).unwrap_err(),
            EcsError::ZeroSizedComponent(guid)
        );
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        pool.add(id(1), pair(1.0)).unwrap();

        let err = pool.add(id(1), pair(2.0)).unwrap_err();
        assert_eq!(
            err,
            EcsError::DuplicateComponent {
                entity: id(1),
                component: Pair::GUID
            }
        );
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get::<Pair>(id(1)).unwrap().x, 1.0);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        assert!(matches!(
            pool.add_bytes(id(1), &[0u8; 7]),
            Err(EcsError::SizeMismatch { expected: 8, actual: 7, .. })
        ));
        assert!(matches!(
            pool.add(id(1), Wide::default()),
            Err(EcsError::SizeMismatch { expected: 8, actual: 12, .. })
        ));
        assert!(pool.is_empty());
        assert_consistent(&pool);
    }

    #[test]
    fn test_missing_component() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        let missing = EcsError::MissingComponent {
            entity: id(9),
            component: Pair::GUID,
        };
        assert_eq!(pool.get::<Pair>(id(9)).unwrap_err(), missing);
        assert_eq!(pool.remove(id(9)).unwrap_err(), missing);
        assert_eq!(pool.component_data(id(9)).unwrap_err(), missing);
        assert_eq!(pool.set_component_data(id(9), &[0; 8]).unwrap_err(), missing);
        assert!(pool.record(id(9)).is_none());
    }

    #[test]
    fn test_swap_remove_moves_last_record() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        for i in 1..=4 {
            pool.add(id(i), pair(i as f32)).unwrap();
        }

        pool.remove(id(2)).unwrap();

        // Record 4 now occupies the second slot.
        let xs: Vec<f32> = pool.as_slice::<Pair>().unwrap().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 4.0, 3.0]);
        // Insertion order list keeps its order.
        assert_eq!(pool.entities(), &[id(1), id(3), id(4)]);
        // Retargeted offset still resolves.
        assert_eq!(pool.get::<Pair>(id(4)).unwrap().x, 4.0);
        assert_consistent(&pool);
    }

    #[test]
    fn test_remove_last_and_only() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        pool.add(id(1), pair(1.0)).unwrap();
        pool.add(id(2), pair(2.0)).unwrap();

        pool.remove(id(2)).unwrap();
        assert_eq!(pool.get::<Pair>(id(1)).unwrap().x, 1.0);
        pool.remove(id(1)).unwrap();
        assert!(pool.is_empty());
        assert!(pool.bytes().is_empty());
        assert_consistent(&pool);
    }

    #[test]
    fn test_remove_middle_keeps_remaining_payloads() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        for i in 1..=9 {
            pool.add(id(i), pair(i as f32 * 10.0)).unwrap();
        }
        pool.remove(id(5)).unwrap();

        let mut xs: Vec<i32> = pool
            .as_slice::<Pair>()
            .unwrap()
            .iter()
            .map(|p| p.x as i32)
            .collect();
        xs.sort_unstable();
        assert_eq!(xs, vec![10, 20, 30, 40, 60, 70, 80, 90]);
    }

    #[test]
    fn test_iter_pairs_owner_with_record_after_removal() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        for i in 1..=5 {
            pool.add(id(i), pair(i as f32)).unwrap();
        }
        pool.remove(id(1)).unwrap();
        pool.remove(id(3)).unwrap();

        for (entity, record) in pool.iter::<Pair>().unwrap() {
            assert_eq!(record.x, entity.raw() as f32);
        }
        assert_eq!(pool.iter::<Pair>().unwrap().count(), 3);
    }

    #[test]
    fn test_component_data_is_a_copy() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        pool.add(id(1), Pair { x: 1.0, y: 2.0 }).unwrap();

        let snapshot = pool.component_data(id(1)).unwrap();
        pool.get_mut::<Pair>(id(1)).unwrap().x = 5.0;

        assert_eq!(*bytemuck::from_bytes::<Pair>(&snapshot), Pair { x: 1.0, y: 2.0 });

        pool.set_component_data(id(1), &snapshot).unwrap();
        assert_eq!(pool.get::<Pair>(id(1)).unwrap().x, 1.0);
    }

    #[test]
    fn test_add_bytes_then_typed_view() {
        let mut pool = ComponentPool::new(Pair::GUID, 8).unwrap();
        let value = Pair { x: 7.0, y: 8.0 };
        pool.add_bytes(id(3), bytemuck::bytes_of(&value)).unwrap();

        assert_eq!(pool.record(id(3)), Some(bytemuck::bytes_of(&value)));
        assert_eq!(*pool.get::<Pair>(id(3)).unwrap(), value);
    }

    #[test]
    fn test_mut_slice_writes_through() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        for i in 1..=3 {
            pool.add(id(i), pair(0.0)).unwrap();
        }
        for record in pool.as_mut_slice::<Pair>().unwrap() {
            record.y = 9.0;
        }
        assert!(pool.as_slice::<Pair>().unwrap().iter().all(|p| p.y == 9.0));
    }

    #[test]
    fn test_hooks_run_once_per_event() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (created, removed) = (Arc::clone(&log), Arc::clone(&log));

        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        pool.set_hooks(
            ComponentHooks::new()
                .on_create::<Pair>(move |e, p| {
                    p.y = 1.0;
                    created.lock().push(format!("create {e}"));
                })
                .on_remove::<Pair>(move |e, p| removed.lock().push(format!("remove {e} {}", p.x))),
        );

        pool.add(id(1), pair(10.0)).unwrap();
        pool.add_bytes(id(2), bytemuck::bytes_of(&pair(20.0))).unwrap();
        pool.remove(id(1)).unwrap();

        assert_eq!(
            *log.lock(),
            vec!["create 1", "create 2", "remove 1 10"]
        );
        // on_create may initialise the stored record.
        assert_eq!(pool.get::<Pair>(id(2)).unwrap().y, 1.0);
    }

    #[test]
    fn test_destructor_runs_on_drop_in_buffer_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        pool.set_hooks(ComponentHooks::new().destructor::<Pair>(move |p| sink.lock().push(p.x)));
        for i in 1..=3 {
            pool.add(id(i), pair(i as f32)).unwrap();
        }
        pool.remove(id(1)).unwrap();
        drop(pool);

        assert_eq!(*seen.lock(), vec![3.0, 2.0]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut pool = ComponentPool::for_type::<Pair>(0).unwrap();
        pool.add(id(1), pair(1.0)).unwrap();

        let copy = pool.clone();
        pool.get_mut::<Pair>(id(1)).unwrap().x = 42.0;
        pool.add(id(2), pair(2.0)).unwrap();

        assert_eq!(copy.get::<Pair>(id(1)).unwrap().x, 1.0);
        assert_eq!(copy.len(), 1);
        assert_consistent(&copy);
    }

    #[test]
    fn test_unaligned_sizes_stay_dense() {
        // 12-byte records straddle the 16-byte backing blocks.
        let mut pool = ComponentPool::for_type::<Wide>(0).unwrap();
        for i in 1..=7 {
            pool.add(id(i), Wide { v: [i as f32; 3] }).unwrap();
        }
        pool.remove(id(3)).unwrap();
        pool.remove(id(7)).unwrap();

        assert_eq!(pool.bytes().len(), 5 * 12);
        assert_eq!(pool.get::<Wide>(id(6)).unwrap().v, [6.0; 3]);
        assert_consistent(&pool);
    }
}
