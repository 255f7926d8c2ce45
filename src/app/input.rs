//! Keyboard and mouse bindings for build mode.
use bevy::prelude::*;
use build_system::plugin::{BuildComponent, CommitPlacement, PlayerView, SetBuildMode};
use build_system::settings::Settings;

/// Toggle build mode and commit placements from input.
///
/// The toggle key flips build mode for every local player. The place key or
/// the right mouse button commits, but only while build mode is on.
///
/// # Arguments
/// - `keys`, `mouse`: Current input state.
/// - `settings`: Used for the `toggle_build` and `place` keybinds.
/// - `players`: Pawns with a camera and a build controller.
#[allow(clippy::needless_pass_by_value)]
pub fn build_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    settings: Res<Settings>,
    players: Query<(Entity, &BuildComponent), With<PlayerView>>,
    mut build_mode: EventWriter<SetBuildMode>,
    mut commits: EventWriter<CommitPlacement>,
) {
    let toggle = keys.just_pressed(settings.keybind("toggle_build", KeyCode::KeyB));
    let place = keys.just_pressed(settings.keybind("place", KeyCode::KeyE))
        || mouse.just_pressed(MouseButton::Right);

    for (owner, builder) in &players {
        let enabled = builder.controller.is_build_mode_enabled();
        if toggle {
            build_mode.send(SetBuildMode { owner, enabled: !enabled });
        } else if place && enabled {
            commits.send(CommitPlacement { owner });
        }
    }
}
