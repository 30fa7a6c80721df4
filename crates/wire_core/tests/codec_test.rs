//! # Entity Codec Tests
//!
//! Encoding whole registries and restoring them elsewhere.
#![allow(missing_docs)]

use wire_core::{
    CodecError, Component, ComponentDescriptor, EcsError, EntityCodec, EntityId, Guid, Registry,
    TypeRegistry,
};

wire_core::component! {
    #[derive(Debug, PartialEq)]
    pub struct A("0F1E2D3C-4B5A-4978-8695-A4B3C2D1E0F1") {
        pub x: f32,
        pub y: f32,
    }
}

wire_core::component! {
    #[derive(Debug, PartialEq)]
    pub struct B("0F1E2D3C-4B5A-4978-8695-A4B3C2D1E0F2") {
        pub x: f32,
        pub y: f32,
    }
}

fn types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types.register::<A>().unwrap();
    types.register::<B>().unwrap();
    types
}

/// Test: the A{1,2} / B{3,4} record survives a trip into a fresh registry.
#[test]
fn test_encode_decode_two_components() {
    let types = types();
    let codec = EntityCodec::new(&types);

    let mut source = Registry::new();
    let e = source.create_entity();
    source.add_component(e, A { x: 1.0, y: 2.0 }).unwrap();
    source.add_component(e, B { x: 3.0, y: 4.0 }).unwrap();

    let bytes = codec.encode(&source, e).unwrap();
    let mut target = Registry::new();
    let restored = codec.decode(&bytes, &mut target).unwrap();

    for guid in [A::GUID, B::GUID] {
        assert_eq!(
            target.component_data(guid, restored).unwrap(),
            source.component_data(guid, e).unwrap()
        );
    }
}

/// Test: every entity of a registry can be streamed out and back in.
#[test]
fn test_stream_whole_registry() {
    let types = types();
    let codec = EntityCodec::new(&types);

    let mut source = Registry::new();
    for i in 0..20 {
        let e = source.create_entity();
        source.add_component(e, A { x: i as f32, y: 0.0 }).unwrap();
        if i % 3 == 0 {
            source.add_component(e, B { x: 0.0, y: i as f32 }).unwrap();
        }
    }
    // Leave a hole in the id space.
    let sixth = source.entities()[5];
    source.remove_entity(sixth).unwrap();

    let mut stream = Vec::new();
    for &e in source.entities() {
        codec.encode_into(&source, e, &mut stream).unwrap();
    }

    let mut target = Registry::new();
    let mut input = stream.as_slice();
    while !input.is_empty() {
        codec.decode_next(&mut input, &mut target).unwrap();
    }

    assert_eq!(target.entities(), source.entities());
    for &e in source.entities() {
        assert_eq!(target.get_components(e).unwrap(), source.get_components(e).unwrap());
    }

    // Restored ids push the allocator past them.
    assert_eq!(target.create_entity(), EntityId::from_raw(21));
}

/// Test: a hand-built descriptor decodes records without a Rust type.
#[test]
fn test_foreign_descriptor() {
    let guid: Guid = "DEADBEEF-0000-4000-8000-000000000001".parse().unwrap();
    let mut types = TypeRegistry::new();
    assert!(types
        .register_descriptor(ComponentDescriptor::new("Blob", guid, 3, 1, Vec::new()))
        .unwrap());
    let codec = EntityCodec::new(&types);

    let mut source = Registry::new();
    let e = source.create_entity();
    source.add_component_data(&[7, 8, 9], guid, e).unwrap();

    let bytes = codec.encode(&source, e).unwrap();
    let mut target = Registry::new();
    codec.decode(&bytes, &mut target).unwrap();
    assert_eq!(target.component_data(guid, e).unwrap(), vec![7, 8, 9]);
}

/// Test: a size conflict with an existing pool is caught before admitting.
#[test]
fn test_size_conflict_with_existing_pool() {
    let guid = A::GUID;
    let mut writer_types = TypeRegistry::new();
    writer_types
        .register_descriptor(ComponentDescriptor::new("A", guid, 4, 4, Vec::new()))
        .unwrap();
    let writer = EntityCodec::new(&writer_types);

    let mut source = Registry::new();
    let e = source.create_entity();
    source.add_component_data(&[0; 4], guid, e).unwrap();
    let bytes = writer.encode(&source, e).unwrap();

    // The reader believes A has 4 bytes too, but its pool stores 8.
    let mut target = Registry::new();
    let other = target.create_entity();
    target.add_component(other, A::default()).unwrap();

    let err = writer.decode(&bytes, &mut target).unwrap_err();
    assert!(matches!(err, CodecError::Ecs(_)), "{err}");
    assert_eq!(target.entity_count(), 1);
}

/// Test: a record whose pool size disagrees with the table is not encoded.
#[test]
fn test_encode_rejects_size_disagreeing_with_table() {
    let guid: Guid = "DEADBEEF-0000-4000-8000-000000000002".parse().unwrap();
    let mut types = TypeRegistry::new();
    types
        .register_descriptor(ComponentDescriptor::new("Blob", guid, 4, 1, Vec::new()))
        .unwrap();
    let codec = EntityCodec::new(&types);

    let mut source = Registry::new();
    let e = source.create_entity();
    source.add_component_data(&[7, 8, 9], guid, e).unwrap();

    let mut out = vec![0xAA];
    assert_eq!(
        codec.encode_into(&source, e, &mut out),
        Err(CodecError::Ecs(EcsError::SizeMismatch {
            component: guid,
            expected: 4,
            actual: 3,
        }))
    );
    assert_eq!(out, vec![0xAA]);

    // A following record in the same stream still decodes cleanly.
    let mut registry = Registry::new();
    let ok = registry.create_entity();
    registry.add_component(ok, A { x: 1.0, y: 2.0 }).unwrap();
    let ab = types_with_blob(guid);
    let stream_codec = EntityCodec::new(&ab);
    assert!(stream_codec.encode_into(&source, e, &mut out).is_err());
    stream_codec.encode_into(&registry, ok, &mut out).unwrap();

    let mut target = Registry::new();
    let mut input = &out[1..];
    assert_eq!(stream_codec.decode_next(&mut input, &mut target).unwrap(), ok);
    assert!(input.is_empty());
}

fn types_with_blob(guid: Guid) -> TypeRegistry {
    let mut types = types();
    types
        .register_descriptor(ComponentDescriptor::new("Blob", guid, 4, 1, Vec::new()))
        .unwrap();
    types
}
