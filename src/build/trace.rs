//! Build trace: cast a ray from the player's view and report what it hit.
//!
//! The trace always reports its end point, so a miss still gives the caller a
//! place to put the preview (floating at the end of the ray).
use bevy::math::Vec3;

use super::error::{BuildError, Dependency};
use super::host::{BuildHost, HostTypes, SurfaceHit};

/// Result of one build trace. Produced each cycle and consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceResult {
    pub trace_start: Vec3,
    pub trace_end: Vec3,
    /// `None` when nothing blocked the ray within the trace distance.
    pub hit: Option<SurfaceHit>,
}

impl TraceResult {
    /// A trace that hit nothing.
    #[must_use]
    pub fn miss(trace_start: Vec3, trace_end: Vec3) -> Self {
        Self { trace_start, trace_end, hit: None }
    }

    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }

    /// Impact point on a hit, otherwise the end of the ray.
    #[must_use]
    pub fn placement_point(&self) -> Vec3 {
        self.hit.map_or(self.trace_end, |h| h.point)
    }
}

/// Cast the build trace for `player_index`, ignoring `owner`.
///
/// # Errors
/// * `MissingDependency(Camera)` if the host has no viewpoint for the player.
/// * `InvalidGeometry` if the view direction or distance is degenerate, or the
///   host reported a non-finite hit.
pub fn perform_build_trace<T, H>(
    host: &H,
    player_index: u32,
    owner: T::Actor,
    trace_distance: f32,
) -> Result<TraceResult, BuildError>
where
    T: HostTypes,
    H: BuildHost<T> + ?Sized,
{
    let view = host
        .viewpoint(player_index)
        .ok_or(BuildError::MissingDependency(Dependency::Camera))?;

    if !(trace_distance.is_finite() && trace_distance > 0.0) {
        return Err(BuildError::InvalidGeometry("trace distance must be positive"));
    }
    if !view.position.is_finite() {
        return Err(BuildError::InvalidGeometry("viewpoint position is not finite"));
    }
    let forward = view
        .forward
        .try_normalize()
        .ok_or(BuildError::InvalidGeometry("view direction has no length"))?;

    let start = view.position;
    let end = start + forward * trace_distance;

    let hit = host.cast_ray(start, end, &[owner]);
    if let Some(h) = hit
        && !(h.point.is_finite() && h.normal.is_finite())
    {
        return Err(BuildError::InvalidGeometry("ray caster returned a non-finite hit"));
    }

    Ok(TraceResult { trace_start: start, trace_end: end, hit })
}
