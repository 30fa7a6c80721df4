//! # Entity Codec
//!
//! Binary format for one entity and all of its components.
//!
//! ## Layout
//!
//! All integers are little-endian.
//!
//! ```text
//! EntityId        u32
//! ComponentCount  u32
//! ComponentCount times:
//!     NameLength  u16
//!     Name        NameLength bytes of UTF-8, no terminator
//!     Data        the registered size of that component
//! ```
//!
//! The format is only self-describing front to back, so a single unknown
//! name makes the rest of the record unreadable. Decoding therefore parses
//! and validates the whole record before touching the target registry.

use std::collections::HashSet;

use crate::ecs::{EntityId, Registry};
use crate::error::{CodecError, CodecResult, EcsError};
use crate::guid::Guid;
use crate::reflect::TypeRegistry;

/// Fixed header size: entity id plus component count.
pub const HEADER_LEN: usize = EntityId::ENCODED_LEN + 4;

/// Encodes and decodes entity records against a reflection table.
#[derive(Clone, Copy, Debug)]
pub struct EntityCodec<'t> {
    types: &'t TypeRegistry,
}

/// A fully parsed record that has not been applied yet.
struct ParsedEntity<'a> {
    id: EntityId,
    components: Vec<(Guid, &'a [u8])>,
}

impl<'t> EntityCodec<'t> {
    /// Creates a codec that names components through `types`.
    #[must_use]
    pub fn new(types: &'t TypeRegistry) -> Self {
        Self { types }
    }

    /// Encodes entity `id` of `registry` into a new buffer.
    ///
    /// # Errors
    ///
    /// See [`Self::encode_into`].
    pub fn encode(&self, registry: &Registry, id: EntityId) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(registry, id, &mut out)?;
        Ok(out)
    }

    /// Appends the record of entity `id` to `out`.
    ///
    /// Components are written in pool order. `out` is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Ecs`] if `id` is not alive or one of its records
    /// differs in size from its registered descriptor, and
    /// [`CodecError::UnregisteredType`] if one of its components has no
    /// registered name.
    pub fn encode_into(
        &self,
        registry: &Registry,
        id: EntityId,
        out: &mut Vec<u8>,
    ) -> CodecResult<()> {
        if id.is_null() {
            return Err(EcsError::NullEntity.into());
        }
        if !registry.is_alive(id) {
            return Err(EcsError::EntityNotAlive(id).into());
        }

        let mut parts = Vec::new();
        for pool in registry.pools() {
            let Some(bytes) = pool.record(id) else {
                continue;
            };
            let descriptor = self
                .types
                .descriptor_by_guid(pool.guid())
                .ok_or(CodecError::UnregisteredType(pool.guid()))?;
            // Readers take the data length from the table, not the pool.
            if descriptor.size() != bytes.len() {
                return Err(EcsError::SizeMismatch {
                    component: pool.guid(),
                    expected: descriptor.size(),
                    actual: bytes.len(),
                }
                .into());
            }
            let name = descriptor.name();
            let name_len =
                u16::try_from(name.len()).map_err(|_| CodecError::NameTooLong(name.to_owned()))?;
            parts.push((name, name_len, bytes));
        }
        let count =
            u32::try_from(parts.len()).map_err(|_| CodecError::TooManyComponents(parts.len()))?;

        let body: usize = parts
            .iter()
            .map(|(name, _, bytes)| 2 + name.len() + bytes.len())
            .sum();
        out.reserve(HEADER_LEN + body);

        out.extend_from_slice(&id.raw().to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        for (name, name_len, bytes) in parts {
            out.extend_from_slice(&name_len.to_le_bytes());
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(bytes);
        }

        tracing::debug!(
            "Encoded entity {} ({} components, {} bytes)",
            id,
            count,
            HEADER_LEN + body
        );
        Ok(())
    }

    /// Decodes a buffer holding exactly one record into `registry`.
    ///
    /// The entity keeps its encoded id.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TrailingBytes`] if anything follows the record,
    /// plus everything [`Self::decode_next`] reports. `registry` is unchanged
    /// on error.
    pub fn decode(&self, bytes: &[u8], registry: &mut Registry) -> CodecResult<EntityId> {
        let mut reader = Reader::new(bytes);
        let parsed = self.parse(&mut reader, registry)?;
        if reader.remaining() > 0 {
            return Err(CodecError::TrailingBytes(reader.remaining()));
        }
        Self::apply(parsed, registry)
    }

    /// Decodes the first record of `input` and advances it past that record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] for short input,
    /// [`CodecError::UnknownComponent`] for names missing from the table,
    /// [`CodecError::DuplicateComponent`] for a name listed twice, and
    /// [`CodecError::Ecs`] when the id is null or alive, or a record does not
    /// fit an existing pool. On error neither `input` nor `registry` change.
    pub fn decode_next(&self, input: &mut &[u8], registry: &mut Registry) -> CodecResult<EntityId> {
        let bytes = *input;
        let mut reader = Reader::new(bytes);
        let parsed = self.parse(&mut reader, registry)?;
        let consumed = reader.position;
        let id = Self::apply(parsed, registry)?;
        *input = &bytes[consumed..];
        Ok(id)
    }

    fn parse<'a>(
        &self,
        reader: &mut Reader<'a>,
        registry: &Registry,
    ) -> CodecResult<ParsedEntity<'a>> {
        let id = EntityId::from_raw(reader.read_u32()?);
        if id.is_null() {
            return Err(EcsError::NullEntity.into());
        }
        if registry.is_alive(id) {
            return Err(EcsError::EntityAlreadyAlive(id).into());
        }

        let count = reader.read_u32()? as usize;
        // Every component needs at least its length prefix, so the count is
        // bounded by the input before anything is reserved.
        let mut components = Vec::with_capacity(count.min(reader.remaining() / 2));
        let mut seen = HashSet::new();

        for _ in 0..count {
            let name_len = usize::from(reader.read_u16()?);
            let name_at = reader.position;
            let name = std::str::from_utf8(reader.read_bytes(name_len)?)
                .map_err(|_| CodecError::InvalidName(name_at))?;

            let descriptor = self
                .types
                .descriptor_by_name(name)
                .ok_or_else(|| CodecError::UnknownComponent(name.to_owned()))?;
            if !seen.insert(descriptor.guid()) {
                return Err(CodecError::DuplicateComponent(name.to_owned()));
            }
            if descriptor.size() == 0 {
                return Err(EcsError::ZeroSizedComponent(descriptor.guid()).into());
            }
            if let Some(pool) = registry.pool(descriptor.guid()) {
                if pool.component_size() != descriptor.size() {
                    return Err(EcsError::SizeMismatch {
                        component: descriptor.guid(),
                        expected: pool.component_size(),
                        actual: descriptor.size(),
                    }
                    .into());
                }
            }

            let data = reader.read_bytes(descriptor.size())?;
            components.push((descriptor.guid(), data));
        }

        Ok(ParsedEntity { id, components })
    }

    fn apply(parsed: ParsedEntity<'_>, registry: &mut Registry) -> CodecResult<EntityId> {
        let ParsedEntity { id, components } = parsed;
        registry.add_entity(id)?;
        for (guid, data) in &components {
            registry.add_component_data(data, *guid, id)?;
        }
        tracing::debug!("Decoded entity {} ({} components)", id, components.len());
        Ok(id)
    }
}

/// Bounds-checked little-endian cursor over one record.
struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(CodecError::Truncated {
                offset: self.position,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn read_u16(&mut self) -> CodecResult<u16> {
        let mut raw = [0u8; 2];
        raw.copy_from_slice(self.read_bytes(2)?);
        Ok(u16::from_le_bytes(raw))
    }

    fn read_u32(&mut self) -> CodecResult<u32> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.read_bytes(4)?);
        Ok(u32::from_le_bytes(raw))
    }
}
