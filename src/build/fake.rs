//! Recording host used by the unit tests.
use bevy::math::Vec3;
use bevy::transform::components::Transform;
use std::cell::RefCell;
use std::time::Duration;

use super::host::{BuildHost, HostTypes, SpawnRequest, SurfaceHit, Viewpoint};

#[derive(Debug, Clone, Copy)]
pub(crate) struct FakeTypes;

impl HostTypes for FakeTypes {
    type Actor = u32;
    type Mesh = &'static str;
    type Material = &'static str;
    type Preview = u32;
    type Object = u32;
    type Timer = u32;
}

#[derive(Debug, Clone)]
pub(crate) struct FakePreview {
    pub id: u32,
    pub owner: u32,
    pub transform: Transform,
    pub material: Option<&'static str>,
}

pub(crate) struct FakeHost {
    pub view: Option<Viewpoint>,
    pub pawn: bool,
    /// Returned for any ray long enough to reach it.
    pub hit: Option<SurfaceHit>,
    pub world: bool,
    pub accept_spawn: bool,
    pub scheduler_ok: bool,
    pub next_id: u32,
    pub previews: Vec<FakePreview>,
    pub destroyed: Vec<u32>,
    pub timers: Vec<(u32, Duration)>,
    pub cancelled: Vec<u32>,
    pub spawned: Vec<SpawnRequest<FakeTypes>>,
    pub last_ignore: RefCell<Vec<u32>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            view: Some(Viewpoint { position: Vec3::ZERO, forward: Vec3::NEG_Z }),
            pawn: true,
            hit: None,
            world: true,
            accept_spawn: true,
            scheduler_ok: true,
            next_id: 100,
            previews: Vec::new(),
            destroyed: Vec::new(),
            timers: Vec::new(),
            cancelled: Vec::new(),
            spawned: Vec::new(),
            last_ignore: RefCell::new(Vec::new()),
        }
    }
}

impl FakeHost {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl BuildHost<FakeTypes> for FakeHost {
    fn viewpoint(&self, _player_index: u32) -> Option<Viewpoint> {
        self.view
    }

    fn controlled_pawn(&self, owner: u32) -> Option<u32> {
        self.pawn.then_some(owner)
    }

    fn cast_ray(&self, start: Vec3, end: Vec3, ignore: &[u32]) -> Option<SurfaceHit> {
        *self.last_ignore.borrow_mut() = ignore.to_vec();
        self.hit.filter(|h| h.distance <= start.distance(end))
    }

    fn attach_visual(&mut self, owner: u32, transform: Transform, _mesh: &&'static str) -> Option<u32> {
        let id = self.next();
        self.previews.push(FakePreview { id, owner, transform, material: None });
        Some(id)
    }

    fn visual_exists(&self, preview: u32) -> bool {
        self.previews.iter().any(|p| p.id == preview)
    }

    fn set_visual_transform(&mut self, preview: u32, transform: Transform) {
        if let Some(p) = self.previews.iter_mut().find(|p| p.id == preview) {
            p.transform = transform;
        }
    }

    fn set_visual_material(&mut self, preview: u32, material: &&'static str) {
        if let Some(p) = self.previews.iter_mut().find(|p| p.id == preview) {
            p.material = Some(*material);
        }
    }

    fn destroy_visual(&mut self, preview: u32) {
        self.previews.retain(|p| p.id != preview);
        self.destroyed.push(preview);
    }

    fn has_world(&self) -> bool {
        self.world
    }

    fn spawn_object(&mut self, request: SpawnRequest<FakeTypes>) -> Option<u32> {
        if !self.accept_spawn {
            return None;
        }
        self.spawned.push(request);
        Some(self.next())
    }

    fn schedule_repeating(&mut self, _owner: u32, interval: Duration) -> Option<u32> {
        if !self.scheduler_ok {
            return None;
        }
        let id = self.next();
        self.timers.push((id, interval));
        Some(id)
    }

    fn cancel(&mut self, timer: u32) {
        self.timers.retain(|(id, _)| *id != timer);
        self.cancelled.push(timer);
    }
}
