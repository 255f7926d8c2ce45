//! Systems that drive build controllers from events and timers.
use bevy::log::{error, warn};
use bevy::prelude::*;

use super::host::BevyBuildHost;
use super::{
    BuildComponent, BuildCycleTimer, BuildPreview, BuildVisuals, CommitPlacement, Pawn,
    SetBuildMode,
};
use crate::settings::BuildSettings;

fn srgba(c: [f32; 4]) -> Color {
    Color::srgba(c[0], c[1], c[2], c[3])
}

/// Create the preview mesh and the three materials from `BuildSettings`.
///
/// The mesh is a box resting on its origin so a placement point on a floor
/// puts the object on top of it, not half inside.
#[allow(clippy::needless_pass_by_value)]
pub fn setup_build_visuals(
    mut commands: Commands,
    settings: Res<BuildSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let size = Vec3::from_array(settings.preview_size).max(Vec3::splat(0.01));
    let half_extents = size * 0.5;
    let mesh = Mesh::from(Cuboid::from_size(size)).translated_by(Vec3::new(0.0, half_extents.y, 0.0));

    let translucent = |color: [f32; 4]| StandardMaterial {
        base_color: srgba(color),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    };

    commands.insert_resource(BuildVisuals {
        mesh: meshes.add(mesh),
        valid_material: materials.add(translucent(settings.valid_color)),
        invalid_material: materials.add(translucent(settings.invalid_color)),
        placed_material: materials.add(StandardMaterial {
            base_color: srgba(settings.placed_color),
            perceptual_roughness: 0.8,
            ..default()
        }),
        half_extents,
    });
}

/// Give every new pawn a build controller.
#[allow(clippy::needless_pass_by_value)]
pub fn attach_build_components(
    mut commands: Commands,
    pawns: Query<Entity, (Added<Pawn>, Without<BuildComponent>)>,
    settings: Res<BuildSettings>,
    visuals: Res<BuildVisuals>,
) {
    for pawn in &pawns {
        match BuildComponent::from_settings(pawn, &settings, &visuals) {
            Ok(component) => {
                commands.entity(pawn).insert(component);
            }
            Err(e) => error!("cannot attach build component to {pawn:?}: {e}"),
        }
    }
}

pub fn handle_build_mode_requests(
    mut requests: EventReader<SetBuildMode>,
    mut builders: Query<&mut BuildComponent>,
    mut host: BevyBuildHost,
) {
    for request in requests.read() {
        let Ok(mut builder) = builders.get_mut(request.owner) else {
            warn!("build mode request for {:?}, which has no build component", request.owner);
            continue;
        };
        builder.controller.set_build_mode_enabled(request.enabled, &mut host);
    }
}

/// Run one build cycle for every owner whose timer elapsed this frame.
///
/// A long frame can cover several intervals. Nothing moves between them, so
/// one cycle is run, not one per interval.
#[allow(clippy::needless_pass_by_value)]
pub fn tick_build_cycles(
    time: Res<Time>,
    mut builders: Query<(&mut BuildComponent, &mut BuildCycleTimer)>,
    mut host: BevyBuildHost,
) {
    for (mut builder, mut timer) in &mut builders {
        if timer.0.tick(time.delta()).times_finished_this_tick() > 0 {
            builder.controller.update_build_cycle(&mut host);
        }
    }
}

pub fn handle_commit_requests(
    mut requests: EventReader<CommitPlacement>,
    builders: Query<&BuildComponent>,
    mut host: BevyBuildHost,
) {
    for request in requests.read() {
        let Ok(builder) = builders.get(request.owner) else {
            warn!("commit request for {:?}, which has no build component", request.owner);
            continue;
        };
        builder.controller.commit_placement(&mut host);
    }
}

/// Drop previews whose owner lost its build component or was despawned.
pub fn cleanup_orphaned_previews(
    mut commands: Commands,
    previews: Query<(Entity, &BuildPreview)>,
    builders: Query<(), With<BuildComponent>>,
) {
    for (entity, preview) in &previews {
        if !builders.contains(preview.owner) {
            commands.entity(entity).despawn_recursive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::OverlapPolicy;
    use crate::plugin::{BuildSurface, BuildSystemPlugin, Buildable, PlayerView};
    use std::time::Duration;

    fn app() -> App {
        app_with(OverlapPolicy::AlwaysSpawn)
    }

    fn app_with(overlap_policy: OverlapPolicy) -> App {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .insert_resource(Time::<()>::default())
            .add_plugins(BuildSystemPlugin::new(BuildSettings {
                line_trace_distance: 20.0,
                overlap_policy,
                ..BuildSettings::default()
            }));
        app
    }

    /// Camera pawn at (0, 2, 0) looking at `target`, plus a floor whose top is y = 0.
    fn spawn_scene(app: &mut App, target: Vec3) -> Entity {
        let view = Transform::from_xyz(0.0, 2.0, 0.0).looking_at(target, Vec3::Y);
        let pawn = app
            .world_mut()
            .spawn((view, GlobalTransform::from(view), Pawn, PlayerView { index: 0 }))
            .id();

        let floor = Transform::from_xyz(0.0, -0.5, 0.0);
        app.world_mut().spawn((
            floor,
            GlobalTransform::from(floor),
            BuildSurface::cuboid(Vec3::new(10.0, 0.5, 10.0)),
        ));

        let wall = Transform::from_xyz(0.0, 2.0, -8.0);
        app.world_mut().spawn((
            wall,
            GlobalTransform::from(wall),
            BuildSurface::cuboid(Vec3::new(10.0, 4.0, 0.5)),
        ));
        pawn
    }

    fn advance(app: &mut App, ms: u64) {
        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_millis(ms));
        app.update();
    }

    fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
        app.world_mut().query_filtered::<Entity, F>().iter(app.world()).count()
    }

    #[test]
    fn pawn_gets_build_component() {
        let mut app = app();
        let pawn = spawn_scene(&mut app, Vec3::new(0.0, 0.0, -2.0));
        app.update();

        let builder = app.world().get::<BuildComponent>(pawn).unwrap();
        assert!(!builder.controller.is_build_mode_enabled());
    }

    #[test]
    fn full_cycle_on_floor() {
        let mut app = app();
        let pawn = spawn_scene(&mut app, Vec3::new(0.0, 0.0, -2.0));
        app.update();

        app.world_mut().send_event(SetBuildMode { owner: pawn, enabled: true });
        app.update();
        assert!(app.world().get::<BuildCycleTimer>(pawn).is_some());
        assert!(app.world().get::<BuildComponent>(pawn).unwrap().controller.is_build_mode_enabled());

        advance(&mut app, 60);
        assert_eq!(count::<With<BuildPreview>>(&mut app), 1);
        let builder = app.world().get::<BuildComponent>(pawn).unwrap();
        assert!(builder.controller.can_build());
        let pending = builder.controller.placement().pending_transform.translation;
        assert!(pending.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-3));

        // more cycles keep a single preview
        advance(&mut app, 60);
        advance(&mut app, 60);
        assert_eq!(count::<With<BuildPreview>>(&mut app), 1);

        app.world_mut().send_event(CommitPlacement { owner: pawn });
        app.update();
        let placed: Vec<Buildable> = app
            .world_mut()
            .query::<&Buildable>()
            .iter(app.world())
            .copied()
            .collect();
        assert_eq!(placed, vec![Buildable { owner: pawn, instigator: pawn, build_id: 0 }]);

        app.world_mut().send_event(SetBuildMode { owner: pawn, enabled: false });
        app.update();
        assert_eq!(count::<With<BuildPreview>>(&mut app), 0);
        assert!(app.world().get::<BuildCycleTimer>(pawn).is_none());
    }

    #[test]
    fn wall_is_not_buildable() {
        let mut app = app();
        let pawn = spawn_scene(&mut app, Vec3::new(0.0, 2.0, -8.0));
        app.update();

        app.world_mut().send_event(SetBuildMode { owner: pawn, enabled: true });
        app.update();
        advance(&mut app, 60);

        let builder = app.world().get::<BuildComponent>(pawn).unwrap();
        assert!(builder.controller.is_build_mode_enabled());
        assert!(!builder.controller.can_build());

        app.world_mut().send_event(CommitPlacement { owner: pawn });
        app.update();
        assert_eq!(count::<With<Buildable>>(&mut app), 0);
    }

    #[test]
    fn enable_without_camera_is_refused() {
        let mut app = app();
        let pawn = app.world_mut().spawn((Transform::default(), GlobalTransform::default(), Pawn)).id();
        app.update();

        app.world_mut().send_event(SetBuildMode { owner: pawn, enabled: true });
        app.update();
        assert!(!app.world().get::<BuildComponent>(pawn).unwrap().controller.is_build_mode_enabled());
        assert!(app.world().get::<BuildCycleTimer>(pawn).is_none());
    }

    #[test]
    fn preview_removed_with_owner() {
        let mut app = app();
        let pawn = spawn_scene(&mut app, Vec3::new(0.0, 0.0, -2.0));
        app.update();
        app.world_mut().send_event(SetBuildMode { owner: pawn, enabled: true });
        app.update();
        advance(&mut app, 60);
        assert_eq!(count::<With<BuildPreview>>(&mut app), 1);

        app.world_mut().despawn(pawn);
        app.update();
        assert_eq!(count::<With<BuildPreview>>(&mut app), 0);
    }

    #[test]
    fn despawned_preview_is_recreated() {
        let mut app = app();
        let pawn = spawn_scene(&mut app, Vec3::new(0.0, 0.0, -2.0));
        app.update();
        app.world_mut().send_event(SetBuildMode { owner: pawn, enabled: true });
        app.update();
        advance(&mut app, 60);

        let Some(first) = app.world().get::<BuildComponent>(pawn).unwrap().controller.preview() else {
            panic!("no preview after the first cycle");
        };
        app.world_mut().despawn(first);
        assert_eq!(count::<With<BuildPreview>>(&mut app), 0);

        advance(&mut app, 60);
        assert_eq!(count::<With<BuildPreview>>(&mut app), 1);
        let builder = app.world().get::<BuildComponent>(pawn).unwrap();
        assert!(builder.controller.is_build_mode_enabled());
        let current = builder.controller.preview();
        assert!(current.is_some());
        assert_ne!(current, Some(first));
        let current = current.unwrap();
        assert!(app.world().get::<BuildPreview>(current).is_some());
        assert!(app.world().get::<Handle<StandardMaterial>>(current).is_some());
    }

    /// Commit on the floor at (0, 0, -2) next to a small box that sits where
    /// the placed object would be, out of the trace's way.
    fn commit_into_occupied_spot(policy: OverlapPolicy) -> usize {
        let mut app = app_with(policy);
        let pawn = spawn_scene(&mut app, Vec3::new(0.0, 0.0, -2.0));
        let blocker = Transform::from_xyz(0.0, 0.5, -2.0);
        app.world_mut().spawn((blocker, GlobalTransform::from(blocker), BuildSurface::cuboid(Vec3::splat(0.1))));
        app.update();

        app.world_mut().send_event(SetBuildMode { owner: pawn, enabled: true });
        app.update();
        advance(&mut app, 60);
        assert!(app.world().get::<BuildComponent>(pawn).unwrap().controller.can_build());

        app.world_mut().send_event(CommitPlacement { owner: pawn });
        app.update();
        count::<With<Buildable>>(&mut app)
    }

    #[test]
    fn always_spawn_places_into_overlap() {
        assert_eq!(commit_into_occupied_spot(OverlapPolicy::AlwaysSpawn), 1);
    }

    #[test]
    fn skip_if_overlapping_refuses_overlap() {
        assert_eq!(commit_into_occupied_spot(OverlapPolicy::SkipIfOverlapping), 0);
    }
}
