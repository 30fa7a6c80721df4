//! # Wire Demo
//!
//! Creates 100 entities through the type-erased path, prints their
//! components, then saves the scene to a temporary directory and reloads it.
//!
//! Run with: `RUST_LOG=debug cargo run --bin wire_demo`

use std::error::Error;

use wire::{Component, EntityCodec, Scene, SceneStorage, TypeRegistry};

wire::component! {
    /// A two-float test payload.
    pub struct TestComponent("{6A2347FD-8CB4-431D-8599-AF7340755113}") {
        /// First value.
        pub x: f32,
        /// Second value.
        pub y: f32,
    }
}

const ENTITY_COUNT: usize = 100;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut types = TypeRegistry::new();
    types.register::<TestComponent>()?;

    let mut scene = Scene::new("Demo");
    let payload = TestComponent { x: 10.0, y: 4.0 };
    for _ in 0..ENTITY_COUNT {
        let entity = scene.create_entity();
        scene.registry_mut().add_component_data(
            bytemuck::bytes_of(&payload),
            TestComponent::GUID,
            entity.id(),
        )?;
    }

    for component in scene.registry().get_all_components::<TestComponent>()? {
        println!("{} {}", component.x, component.y);
    }

    let first = scene.entities().next().ok_or("scene is empty")?;
    let record = EntityCodec::new(&types).encode(scene.registry(), first.id())?;
    tracing::info!("Entity {} encodes to {} bytes", first, record.len());

    let dir = std::env::temp_dir().join(format!("wire_demo_{}", std::process::id()));
    let storage = SceneStorage::new(&dir);
    let saved = storage.save_scene(&types, &scene)?;
    tracing::info!("Saved {} entities to {}", saved, dir.display());

    let restored = storage.load_scene(&types)?;
    let matching = restored
        .registry()
        .get_all_components::<TestComponent>()?
        .iter()
        .filter(|c| bytemuck::bytes_of(*c) == bytemuck::bytes_of(&payload))
        .count();
    tracing::info!(
        "Reloaded {} entities, {} with the original payload",
        restored.len(),
        matching
    );

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
