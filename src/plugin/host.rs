//! `BuildHost` backed by the Bevy ECS.
//!
//! Visuals and objects are entities spawned through `Commands`, so they
//! appear once the commands are applied. The scheduler is a
//! `BuildCycleTimer` component on the owner entity that `tick_build_cycles`
//! advances.
use bevy::ecs::system::SystemParam;
use bevy::log::warn;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use std::time::Duration;

use super::surface::BuildSurface;
use super::{BevyTypes, BuildCycleTimer, BuildPreview, BuildVisuals, Buildable, Pawn, PlayerView};
use crate::build::host::{BuildHost, OverlapPolicy, SpawnRequest, SurfaceHit, Viewpoint};

#[derive(SystemParam)]
pub struct BevyBuildHost<'w, 's> {
    commands: Commands<'w, 's>,
    cameras: Query<'w, 's, (&'static GlobalTransform, &'static PlayerView)>,
    surfaces: Query<'w, 's, (Entity, &'static GlobalTransform, &'static BuildSurface)>,
    pawns: Query<'w, 's, (), With<Pawn>>,
    previews: Query<'w, 's, (), With<BuildPreview>>,
    visuals: Res<'w, BuildVisuals>,
}

impl BevyBuildHost<'_, '_> {
    fn overlaps_surface(&self, point: Vec3) -> bool {
        self.surfaces
            .iter()
            .any(|(_, transform, surface)| surface.contains_point(transform, point))
    }
}

impl BuildHost<BevyTypes> for BevyBuildHost<'_, '_> {
    fn viewpoint(&self, player_index: u32) -> Option<Viewpoint> {
        self.cameras
            .iter()
            .find(|(_, view)| view.index == player_index)
            .map(|(transform, _)| Viewpoint {
                position: transform.translation(),
                forward: *transform.forward(),
            })
    }

    fn controlled_pawn(&self, owner: Entity) -> Option<Entity> {
        self.pawns.contains(owner).then_some(owner)
    }

    fn cast_ray(&self, start: Vec3, end: Vec3, ignore: &[Entity]) -> Option<SurfaceHit> {
        self.surfaces
            .iter()
            .filter(|(entity, _, _)| !ignore.contains(entity))
            .filter_map(|(_, transform, surface)| surface.ray_hit(transform, start, end))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn attach_visual(&mut self, owner: Entity, transform: Transform, mesh: &Handle<Mesh>) -> Option<Entity> {
        if !self.pawns.contains(owner) {
            return None;
        }
        let preview = self
            .commands
            .spawn((
                PbrBundle { mesh: mesh.clone(), transform, ..default() },
                NotShadowCaster,
                BuildPreview { owner },
                Name::new("Build Preview"),
            ))
            .id();
        Some(preview)
    }

    fn visual_exists(&self, preview: Entity) -> bool {
        self.previews.contains(preview)
    }

    fn set_visual_transform(&mut self, preview: Entity, transform: Transform) {
        if let Some(mut entity) = self.commands.get_entity(preview) {
            entity.insert(transform);
        }
    }

    fn set_visual_material(&mut self, preview: Entity, material: &Handle<StandardMaterial>) {
        if let Some(mut entity) = self.commands.get_entity(preview) {
            entity.insert(material.clone());
        }
    }

    fn destroy_visual(&mut self, preview: Entity) {
        if let Some(entity) = self.commands.get_entity(preview) {
            entity.despawn_recursive();
        }
    }

    fn spawn_object(&mut self, request: SpawnRequest<BevyTypes>) -> Option<Entity> {
        let surface = BuildSurface::resting(self.visuals.half_extents);
        if request.overlap == OverlapPolicy::SkipIfOverlapping {
            let center = request.transform.transform_point(surface.center);
            if self.overlaps_surface(center) {
                warn!("placement at {} overlaps existing geometry", request.transform.translation);
                return None;
            }
        }

        let object = self
            .commands
            .spawn((
                PbrBundle {
                    mesh: request.mesh,
                    material: self.visuals.placed_material.clone(),
                    transform: request.transform,
                    ..default()
                },
                surface,
                Buildable {
                    owner: request.owner,
                    instigator: request.instigator,
                    build_id: request.build_id,
                },
                Name::new(format!("Buildable {}", request.build_id)),
            ))
            .id();
        Some(object)
    }

    fn schedule_repeating(&mut self, owner: Entity, interval: Duration) -> Option<Entity> {
        let mut entity = self.commands.get_entity(owner)?;
        entity.insert(BuildCycleTimer(Timer::new(interval, TimerMode::Repeating)));
        Some(owner)
    }

    fn cancel(&mut self, timer: Entity) {
        if let Some(mut entity) = self.commands.get_entity(timer) {
            entity.remove::<BuildCycleTimer>();
        }
    }
}
