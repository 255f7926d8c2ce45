//! Startup scene for the build demo.
//!
//! Spawns the player camera, a light and a handful of surfaces at different
//! slopes so the valid/invalid preview tint can be tried out: a flat floor,
//! a gentle ramp, a steep ramp and a wall.
use bevy::prelude::*;
use build_system::player::PlayerLook;
use build_system::plugin::{BuildSurface, Pawn, PlayerView};

/// Spawn one static box that blocks the build trace.
fn spawn_surface(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    name: &str,
    size: Vec3,
    transform: Transform,
) {
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::from_size(size)),
            material: material.clone(),
            transform,
            ..default()
        },
        BuildSurface::cuboid(size * 0.5),
        Name::new(name.to_string()),
    ));
}

/// Spawn the camera pawn, lighting and test surfaces.
///
/// # Arguments
/// - `commands`: Commands for spawning entities.
/// - `meshes`: Mesh assets for the surface boxes.
/// - `materials`: Material assets for the surface boxes.
#[allow(clippy::needless_pass_by_value)]
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let look = PlayerLook { yaw: 0.0, pitch: -20_f32.to_radians() };
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(0.0, 3.0, 8.0).with_rotation(look.rotation()),
            ..default()
        },
        look,
        Pawn,
        PlayerView { index: 0 },
        Name::new("Player"),
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
    commands.insert_resource(AmbientLight { color: Color::WHITE, brightness: 300.0 });

    let ground = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.45, 0.3),
        perceptual_roughness: 1.0,
        ..default()
    });
    let rock = materials.add(StandardMaterial {
        base_color: Color::srgb(0.5, 0.48, 0.45),
        perceptual_roughness: 0.9,
        ..default()
    });

    spawn_surface(
        &mut commands,
        &mut meshes,
        &ground,
        "Floor",
        Vec3::new(60.0, 1.0, 60.0),
        Transform::from_xyz(0.0, -0.5, 0.0),
    );
    spawn_surface(
        &mut commands,
        &mut meshes,
        &rock,
        "Gentle Ramp",
        Vec3::new(8.0, 0.5, 6.0),
        Transform::from_xyz(-8.0, 1.0, -6.0).with_rotation(Quat::from_rotation_z(30_f32.to_radians())),
    );
    spawn_surface(
        &mut commands,
        &mut meshes,
        &rock,
        "Steep Ramp",
        Vec3::new(8.0, 0.5, 6.0),
        Transform::from_xyz(8.0, 2.0, -6.0).with_rotation(Quat::from_rotation_z(-60_f32.to_radians())),
    );
    spawn_surface(
        &mut commands,
        &mut meshes,
        &rock,
        "Wall",
        Vec3::new(20.0, 6.0, 1.0),
        Transform::from_xyz(0.0, 3.0, -16.0),
    );
}
