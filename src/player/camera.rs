//! Mouse look and cursor locking for the demo camera.
//!
//! The camera is the pawn, so the build trace starts exactly where the player
//! looks from. Look input is ignored while the cursor is free so menus and
//! window chrome can be used without spinning the view.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::plugin::Pawn;
use crate::settings::Settings;

const MAX_PITCH_DEGREES: f32 = 85.0;
const SENSITIVITY_SCALE: f32 = 1.0e-4;

/// Yaw (around Y) and pitch (around X) of the view, radians.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PlayerLook {
    pub yaw: f32,
    /// Kept within +/- 85 degrees so the view never flips over the pole.
    pub pitch: f32,
}

impl PlayerLook {
    /// Turn by a raw mouse delta scaled by `sensitivity`.
    pub fn apply_delta(&mut self, delta: Vec2, sensitivity: f32) {
        let step = delta * sensitivity * SENSITIVITY_SCALE;
        let limit = MAX_PITCH_DEGREES.to_radians();
        self.yaw -= step.x;
        self.pitch = (self.pitch - step.y).clamp(-limit, limit);
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Sum this frame's mouse motion, honoring the invert settings.
fn frame_delta(events: &mut EventReader<MouseMotion>, settings: &Settings) -> Vec2 {
    let flip = Vec2::new(
        if settings.controls.invert_x { -1.0 } else { 1.0 },
        if settings.controls.invert_y { -1.0 } else { 1.0 },
    );
    events.read().map(|ev| ev.delta * flip).sum()
}

/// Rotate every look-enabled pawn by this frame's mouse motion.
///
/// # Arguments
/// * `windows` - primary window; look is skipped while its cursor is visible
/// * `motion` - mouse motion events
/// * `pawns` - transforms and look state to update
#[allow(clippy::needless_pass_by_value)]
pub fn camera_look(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut motion: EventReader<MouseMotion>,
    mut pawns: Query<(&mut Transform, &mut PlayerLook), With<Pawn>>,
    settings: Res<Settings>,
) {
    let delta = frame_delta(&mut motion, &settings);
    if delta == Vec2::ZERO {
        return;
    }
    let cursor_free = windows.get_single().map_or(true, |w| w.cursor.visible);
    if cursor_free {
        return;
    }

    for (mut transform, mut look) in &mut pawns {
        look.apply_delta(delta, settings.controls.mouse_sensitivity);
        transform.rotation = look.rotation();
    }
}

/// Lock the cursor on left click, release it on the pause key.
#[allow(clippy::needless_pass_by_value)]
pub fn cursor_grab(
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    let Ok(mut window) = windows.get_single_mut() else { return };

    if mouse.just_pressed(MouseButton::Left) {
        window.cursor.grab_mode = CursorGrabMode::Locked;
        window.cursor.visible = false;
    } else if keys.just_pressed(settings.keybind("pause", KeyCode::Escape)) {
        window.cursor.grab_mode = CursorGrabMode::None;
        window.cursor.visible = true;
    }
}
