//! Contract between the build cycle and the runtime hosting it.
//!
//! The controller never touches entities, assets or timers directly. It asks
//! a `BuildHost` for them, which keeps the state machine testable with a
//! plain struct and lets the Bevy plugin (see `crate::plugin`) supply the real
//! implementation.
use bevy::math::Vec3;
use bevy::transform::components::Transform;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

/// Handle types a host hands out. Kept separate from `BuildHost` so the
/// controller can be stored without borrowing the host (a Bevy `SystemParam`
/// carries lifetimes, the component holding the controller cannot).
pub trait HostTypes {
    /// Something that can own things and be ignored by traces.
    type Actor: Copy + PartialEq + Debug;
    type Mesh: Clone + Debug;
    type Material: Clone + Debug;
    /// Transient preview visual.
    type Preview: Copy + PartialEq + Debug;
    /// Permanent object created by a commit.
    type Object: Debug;
    /// Recurring schedule registration.
    type Timer: Copy + PartialEq + Debug;
}

/// Where the player is looking from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub position: Vec3,
    pub forward: Vec3,
}

/// First blocking surface along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Distance from the ray start to `point`.
    pub distance: f32,
}

/// How the object factory treats a spawn that starts inside other geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Spawn regardless of overlap. Never rejected for geometry reasons.
    #[default]
    AlwaysSpawn,
    /// Refuse the spawn if the location is inside a blocking surface.
    SkipIfOverlapping,
}

/// Everything the object factory needs for one commit.
#[derive(Debug, Clone)]
pub struct SpawnRequest<T: HostTypes> {
    pub transform: Transform,
    pub owner: T::Actor,
    pub instigator: T::Actor,
    pub mesh: T::Mesh,
    pub build_id: u32,
    pub overlap: OverlapPolicy,
}

pub trait BuildHost<T: HostTypes> {
    // Viewpoint source

    /// Camera position and forward direction of the given local player.
    fn viewpoint(&self, player_index: u32) -> Option<Viewpoint>;

    /// The pawn controlling `owner`, if `owner` is (or has) one.
    fn controlled_pawn(&self, owner: T::Actor) -> Option<T::Actor>;

    // Ray caster

    /// Nearest blocking surface between `start` and `end`, skipping `ignore`.
    fn cast_ray(&self, start: Vec3, end: Vec3, ignore: &[T::Actor]) -> Option<SurfaceHit>;

    // Preview factory

    /// Create a non-colliding visual for `owner`.
    fn attach_visual(
        &mut self,
        owner: T::Actor,
        transform: Transform,
        mesh: &T::Mesh,
    ) -> Option<T::Preview>;

    /// False once the visual is gone, whoever removed it.
    fn visual_exists(&self, preview: T::Preview) -> bool;

    fn set_visual_transform(&mut self, preview: T::Preview, transform: Transform);

    fn set_visual_material(&mut self, preview: T::Preview, material: &T::Material);

    fn destroy_visual(&mut self, preview: T::Preview);

    // Permanent object factory

    /// False when there is no world to spawn into.
    fn has_world(&self) -> bool {
        true
    }

    fn spawn_object(&mut self, request: SpawnRequest<T>) -> Option<T::Object>;

    // Recurring scheduler

    /// Start calling the owner's build cycle every `interval`.
    fn schedule_repeating(&mut self, owner: T::Actor, interval: Duration) -> Option<T::Timer>;

    fn cancel(&mut self, timer: T::Timer);
}
