//! Surface validity: is the traced surface flat enough to build on?
use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use super::trace::TraceResult;

pub const DEFAULT_ALLOWED_SLOPE_ANGLE: f32 = 45.0;
pub const DEFAULT_TRACE_DISTANCE: f32 = 400.0;

/// Limits fixed when a controller is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidityThresholds {
    /// Steepest surface (degrees from horizontal) that is still buildable.
    pub allowed_slope_angle_degrees: f32,
    /// How far from the camera the build trace reaches.
    pub trace_distance: f32,
}

impl Default for ValidityThresholds {
    fn default() -> Self {
        Self {
            allowed_slope_angle_degrees: DEFAULT_ALLOWED_SLOPE_ANGLE,
            trace_distance: DEFAULT_TRACE_DISTANCE,
        }
    }
}

/// Angle in degrees between a surface normal and world up.
///
/// Returns `None` for a zero-length or non-finite normal.
///
/// # Example
/// ```
/// use bevy::math::Vec3;
/// use build_system::build::validity::slope_angle_degrees;
///
/// assert_eq!(slope_angle_degrees(Vec3::Y), Some(0.0));
/// let wall = slope_angle_degrees(Vec3::X).unwrap();
/// assert!((wall - 90.0).abs() < 1e-4);
/// assert_eq!(slope_angle_degrees(Vec3::ZERO), None);
/// ```
#[must_use]
pub fn slope_angle_degrees(normal: Vec3) -> Option<f32> {
    let n = normal.try_normalize()?;
    // clamp: normalized vectors can still dot to 1.0000001
    let cos = n.dot(Vec3::Y).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// True when the trace hit something whose slope is within the threshold.
/// The comparison is inclusive: a surface exactly at the limit is buildable.
#[must_use]
pub fn check_build_conditions(trace: &TraceResult, thresholds: &ValidityThresholds) -> bool {
    let Some(hit) = trace.hit else {
        return false;
    };
    slope_angle_degrees(hit.normal)
        .is_some_and(|angle| angle <= thresholds.allowed_slope_angle_degrees)
}
