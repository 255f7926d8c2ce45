//! Blocking surfaces the build trace can hit.
//!
//! Every `BuildSurface` is an oriented box in its entity's local space. The
//! ray test is a slab test done in that local space, so rotated and scaled
//! boxes (ramps, walls) work without a physics engine.
use bevy::math::Vec3;
use bevy::prelude::*;

use crate::build::host::SurfaceHit;

/// A box that blocks the build trace. Entities without one (previews,
/// decoration) are invisible to it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BuildSurface {
    pub half_extents: Vec3,
    /// Box center in the entity's local space.
    pub center: Vec3,
}

impl BuildSurface {
    /// Box centered on the entity origin.
    #[must_use]
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self { half_extents, center: Vec3::ZERO }
    }

    /// Box whose bottom face sits on the entity origin.
    #[must_use]
    pub fn resting(half_extents: Vec3) -> Self {
        Self { half_extents, center: Vec3::new(0.0, half_extents.y, 0.0) }
    }

    /// First entry of the segment `start..end` into this box.
    ///
    /// A segment starting inside the box does not hit it.
    #[must_use]
    pub fn ray_hit(&self, transform: &GlobalTransform, start: Vec3, end: Vec3) -> Option<SurfaceHit> {
        let world_to_local = transform.affine().inverse();
        let o = world_to_local.transform_point3(start) - self.center;
        let d = world_to_local.transform_point3(end) - self.center - o;

        // segment parameter, 0 at start and 1 at end
        let mut t_enter = 0.0_f32;
        let mut t_exit = 1.0_f32;
        let mut local_normal = Vec3::ZERO;

        for (axis, unit) in Vec3::AXES.iter().enumerate() {
            let h = self.half_extents[axis];
            let (oi, di) = (o[axis], d[axis]);

            if di.abs() <= f32::EPSILON {
                if oi < -h || oi > h {
                    return None;
                }
                continue;
            }

            let (near, far, face) = if di > 0.0 {
                ((-h - oi) / di, (h - oi) / di, -*unit)
            } else {
                ((h - oi) / di, (-h - oi) / di, *unit)
            };

            if near > t_enter {
                t_enter = near;
                local_normal = face;
            }
            t_exit = t_exit.min(far);
            if t_enter > t_exit {
                return None;
            }
        }

        if local_normal == Vec3::ZERO {
            return None;
        }

        // normals transform with the inverse transpose
        let normal = world_to_local
            .matrix3
            .transpose()
            .mul_vec3(local_normal)
            .normalize_or_zero();
        let point = start + (end - start) * t_enter;
        Some(SurfaceHit { point, normal, distance: start.distance(point) })
    }

    #[must_use]
    pub fn contains_point(&self, transform: &GlobalTransform, point: Vec3) -> bool {
        let local = transform.affine().inverse().transform_point3(point) - self.center;
        local.abs().cmple(self.half_extents).all()
    }
}
