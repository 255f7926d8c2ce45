use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use bevy::math::{Quat, Vec2, Vec3};
use bevy::prelude::{GlobalTransform, Transform};
use build_system::build::{
    check_build_conditions, perform_build_trace, slope_angle_degrees, BuildAssets, BuildConfig,
    BuildController, BuildHost, HostTypes, SpawnRequest, SurfaceHit, TraceResult,
    ValidityThresholds, Viewpoint,
};
use build_system::player::camera::PlayerLook;
use build_system::plugin::BuildSurface;

/// Minimal host over a list of boxes, so a whole build cycle can be timed
/// without an ECS.
struct SceneHost {
    view: Viewpoint,
    surfaces: Vec<(u32, GlobalTransform, BuildSurface)>,
}

#[derive(Debug, Clone, Copy)]
struct SceneTypes;

impl HostTypes for SceneTypes {
    type Actor = u32;
    type Mesh = ();
    type Material = u8;
    type Preview = u32;
    type Object = u32;
    type Timer = u32;
}

impl BuildHost<SceneTypes> for SceneHost {
    fn viewpoint(&self, _player_index: u32) -> Option<Viewpoint> { Some(self.view) }
    fn controlled_pawn(&self, owner: u32) -> Option<u32> { Some(owner) }
    fn cast_ray(&self, start: Vec3, end: Vec3, ignore: &[u32]) -> Option<SurfaceHit> {
        self.surfaces
            .iter()
            .filter(|(id, _, _)| !ignore.contains(id))
            .filter_map(|(_, t, s)| s.ray_hit(t, start, end))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
    fn attach_visual(&mut self, _owner: u32, _transform: Transform, _mesh: &()) -> Option<u32> { Some(1) }
    fn visual_exists(&self, _preview: u32) -> bool { true }
    fn set_visual_transform(&mut self, _preview: u32, _transform: Transform) {}
    fn set_visual_material(&mut self, _preview: u32, _material: &u8) {}
    fn destroy_visual(&mut self, _preview: u32) {}
    fn spawn_object(&mut self, request: SpawnRequest<SceneTypes>) -> Option<u32> { Some(request.build_id) }
    fn schedule_repeating(&mut self, owner: u32, _interval: Duration) -> Option<u32> { Some(owner) }
    fn cancel(&mut self, _timer: u32) {}
}

/// A floor plus a row of ramps of increasing slope.
fn scene(count: u32) -> SceneHost {
    let mut surfaces = vec![(
        100,
        GlobalTransform::from(Transform::from_xyz(0.0, -0.5, 0.0)),
        BuildSurface::cuboid(Vec3::new(200.0, 0.5, 200.0)),
    )];
    for i in 0..count {
        let angle = (i as f32 / count as f32) * 80.0;
        let t = Transform::from_xyz(i as f32 * 3.0 - 30.0, 1.0, -10.0)
            .with_rotation(Quat::from_rotation_z(angle.to_radians()));
        surfaces.push((200 + i, GlobalTransform::from(t), BuildSurface::cuboid(Vec3::new(1.0, 0.25, 2.0))));
    }
    SceneHost {
        view: Viewpoint { position: Vec3::new(0.0, 2.0, 0.0), forward: Vec3::new(0.0, -0.3, -1.0).normalize() },
        surfaces,
    }
}

/// Test out small camera movement deltas
fn bench_camera_look_clamp(c: &mut Criterion) {
    c.bench_function("camera_look_clamp", |b| {
        b.iter(|| {
            let mut look = PlayerLook::default();
            // simulate many small mouse moves
            for i in 0..1_000usize {
                let dx = ((i * 13) % 17) as f32 * 0.1;
                let dy = ((i * 7) % 23) as f32 * 0.2 - 5.0;
                look.apply_delta(black_box(Vec2::new(dx, dy)), 1.0);
            }
            black_box((look.yaw, look.pitch));
        })
    });
}

/// Slope classification over a sweep of normals (deterministic LCG).
fn bench_slope_check(c: &mut Criterion) {
    let thresholds = ValidityThresholds::default();
    let mut state: u32 = 0x1234_5678;
    let traces: Vec<TraceResult> = (0..1_000)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let x = ((state >> 16) & 0x7fff) as f32 / 32767.0 * 2.0 - 1.0;
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let z = ((state >> 16) & 0x7fff) as f32 / 32767.0 * 2.0 - 1.0;
            let normal = Vec3::new(x, 1.0, z);
            TraceResult {
                trace_start: Vec3::ZERO,
                trace_end: Vec3::NEG_Z,
                hit: Some(SurfaceHit { point: Vec3::ZERO, normal, distance: 1.0 }),
            }
        })
        .collect();

    c.bench_function("slope_check", |b| {
        b.iter(|| {
            let buildable = traces.iter().filter(|t| check_build_conditions(t, &thresholds)).count();
            black_box(buildable);
            black_box(slope_angle_degrees(black_box(Vec3::new(0.3, 1.0, 0.1))));
        })
    });
}

/// Ray against a single rotated box.
fn bench_surface_ray_hit(c: &mut Criterion) {
    let ramp = BuildSurface::cuboid(Vec3::new(5.0, 0.25, 5.0));
    let t = GlobalTransform::from(Transform::from_rotation(Quat::from_rotation_z(0.5)));
    c.bench_function("surface_ray_hit", |b| {
        b.iter(|| {
            black_box(ramp.ray_hit(&t, black_box(Vec3::new(0.0, 10.0, 0.5)), black_box(Vec3::new(0.2, -10.0, 0.0))))
        })
    });
}

/// One trace through a scene of many surfaces.
fn bench_build_trace(c: &mut Criterion) {
    let host = scene(64);
    c.bench_function("build_trace_64_surfaces", |b| {
        b.iter(|| black_box(perform_build_trace::<SceneTypes, _>(&host, 0, 1, black_box(400.0))))
    });
}

/// Enable, run many cycles while sweeping the view, commit, disable.
fn bench_build_cycle(c: &mut Criterion) {
    let mut host = scene(64);
    let assets = BuildAssets::<SceneTypes> {
        preview_mesh: Some(()),
        valid_material: Some(0),
        invalid_material: Some(1),
    };
    let Ok(mut controller) = BuildController::new(BuildConfig::new(1, assets)) else {
        panic!("bench controller config rejected");
    };

    c.bench_function("build_cycle_sweep", |b| {
        b.iter(|| {
            controller.enable_build_mode(&mut host);
            for i in 0..100 {
                let yaw = (i as f32 / 100.0 - 0.5) * 1.2;
                host.view.forward = Quat::from_rotation_y(yaw) * Vec3::new(0.0, -0.3, -1.0).normalize();
                controller.update_build_cycle(&mut host);
            }
            black_box(controller.commit_placement(&mut host));
            controller.disable_build_mode(&mut host);
        })
    });
}

#[test]
fn __bench_smoke_test() {
    let host = scene(4);
    let trace = perform_build_trace::<SceneTypes, _>(&host, 0, 1, 400.0).unwrap();
    assert!(trace.is_hit());
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_camera_look_clamp,
        bench_slope_check,
        bench_surface_ray_hit,
        bench_build_trace,
        bench_build_cycle
}
criterion_main!(benches);
