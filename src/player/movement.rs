//! Free-flying movement for the build demo pawn.
//!
//! WASD moves along the horizontal view direction, the mapped up/down keys
//! move vertically. There is no collision; build surfaces are only ever hit
//! by the build trace.

use bevy::prelude::*;

use crate::plugin::Pawn;
use crate::settings::Settings;

pub const FLY_SPEED: f32 = 6.0;

/// Direction of travel for the pressed keys, before scaling by speed.
///
/// `forward` and `right` are flattened onto the ground plane so looking down
/// does not slow horizontal movement.
#[must_use]
pub fn movement_direction(
    forward: Vec3,
    right: Vec3,
    keys: &ButtonInput<KeyCode>,
    settings: &Settings,
) -> Vec3 {
    let fwd = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    let right = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();

    let mut dir = Vec3::ZERO;
    if keys.pressed(settings.keybind("forward", KeyCode::KeyW)) { dir += fwd; }
    if keys.pressed(settings.keybind("back", KeyCode::KeyS)) { dir -= fwd; }
    if keys.pressed(settings.keybind("left", KeyCode::KeyA)) { dir -= right; }
    if keys.pressed(settings.keybind("right", KeyCode::KeyD)) { dir += right; }
    if keys.pressed(settings.keybind("up", KeyCode::Space)) { dir += Vec3::Y; }
    if keys.pressed(settings.keybind("down", KeyCode::ShiftLeft)) { dir -= Vec3::Y; }
    dir.normalize_or_zero()
}

/// Move the pawn each frame.
#[allow(clippy::needless_pass_by_value)]
pub fn fly_movement(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    settings: Res<Settings>,
    mut query: Query<&mut Transform, With<Pawn>>,
) {
    for mut transform in &mut query {
        let dir = movement_direction(*transform.forward(), *transform.right(), &keys, &settings);
        transform.translation += dir * FLY_SPEED * time.delta_seconds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_ignores_pitch() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyW);
        let forward = Vec3::new(0.0, -0.9, -0.1);
        let dir = movement_direction(forward, Vec3::X, &keys, &Settings::defaults());
        assert!(dir.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn no_keys_no_motion() {
        let keys = ButtonInput::<KeyCode>::default();
        let dir = movement_direction(Vec3::NEG_Z, Vec3::X, &keys, &Settings::defaults());
        assert_eq!(dir, Vec3::ZERO);
    }
}
