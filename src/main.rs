use std::path::Path;

use bevy::prelude::*;
use bevy::window::PresentMode;

use chunkstream::block::BlockVisuals;
use chunkstream::{ChunkStreamingPlugin, StreamingConfig, StreamingObserver};

mod input;

use input::{InputPlugin, ObserverMotion};

const CONFIG_PATH: &str = "streaming.json";

fn main() {
    let config = load_config(CONFIG_PATH);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Chunk Stream".into(),
                resolution: (1280., 720.).into(),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        // Visuals must exist before the first streaming pass spawns blocks.
        .add_systems(PreStartup, setup_block_visuals)
        .add_systems(Startup, setup_scene)
        .add_plugins((ChunkStreamingPlugin::new(config), InputPlugin))
        .run();
}

fn load_config(path: &str) -> StreamingConfig {
    if !Path::new(path).exists() {
        println!("No {} found, using default streaming config", path);
        return StreamingConfig::default();
    }

    match StreamingConfig::load_from_file(path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Ignoring {}: {}. Using default streaming config", path, err);
            StreamingConfig::default()
        }
    }
}

fn setup_block_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(BlockVisuals {
        mesh: meshes.add(Cuboid::new(1.0, 1.0, 1.0)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.36, 0.62, 0.28),
            perceptual_roughness: 0.9,
            ..default()
        }),
    });
}

fn setup_scene(mut commands: Commands, config: Res<StreamingConfig>) {
    info!("Streaming with {:?}", *config);

    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(8.0, 3.0, 8.0)
                .looking_to(Vec3::new(0.0, -0.3, 1.0), Vec3::Y),
            ..default()
        },
        StreamingObserver,
        ObserverMotion::default(),
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        transform: Transform::from_xyz(0.0, 50.0, 0.0)
            .looking_at(Vec3::new(-0.4, 0.0, 0.6), Vec3::Y),
        ..default()
    });
}
