//! Bevy integration for build mode.
//!
//! Add `BuildSystemPlugin` and tag the player's entity with `Pawn` and its
//! camera with `PlayerView`. Every pawn gets a `BuildComponent`; drive it
//! with `SetBuildMode` and `CommitPlacement` events.
//!
//! # Example:
//!
//! ```ignore
//! app.add_plugins(BuildSystemPlugin::new(settings.build.clone()));
//! commands.spawn((Camera3dBundle::default(), Pawn, PlayerView { index: 0 }));
//! // later, from input handling
//! build_mode.send(SetBuildMode { owner: player, enabled: true });
//! commits.send(CommitPlacement { owner: player });
//! ```
pub mod host;
pub mod surface;
pub mod systems;

use bevy::prelude::*;

use crate::build::controller::{BuildAssets, BuildConfig, BuildController};
use crate::build::error::BuildError;
use crate::build::host::HostTypes;
use crate::settings::BuildSettings;

pub use host::BevyBuildHost;
pub use surface::BuildSurface;
pub use systems::{
    attach_build_components, cleanup_orphaned_previews, handle_build_mode_requests,
    handle_commit_requests, setup_build_visuals, tick_build_cycles,
};

/// Handle types used when the controller runs inside Bevy.
#[derive(Debug, Clone, Copy)]
pub struct BevyTypes;

impl HostTypes for BevyTypes {
    type Actor = Entity;
    type Mesh = Handle<Mesh>;
    type Material = Handle<StandardMaterial>;
    type Preview = Entity;
    type Object = Entity;
    type Timer = Entity;
}

/// Marks an entity that can own a build controller.
#[derive(Component, Debug, Default)]
pub struct Pawn;

/// Camera a local player looks through.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PlayerView {
    pub index: u32,
}

/// The build controller attached to a pawn.
#[derive(Component, Debug)]
pub struct BuildComponent {
    pub controller: BuildController<BevyTypes>,
}

impl BuildComponent {
    /// Build a controller for `owner` from settings and the shared visuals.
    ///
    /// # Errors
    /// Whatever `BuildController::new` rejects.
    pub fn from_settings(
        owner: Entity,
        settings: &BuildSettings,
        visuals: &BuildVisuals,
    ) -> Result<Self, BuildError> {
        let assets = BuildAssets {
            preview_mesh: Some(visuals.mesh.clone()),
            valid_material: Some(visuals.valid_material.clone()),
            invalid_material: Some(visuals.invalid_material.clone()),
        };
        let config = BuildConfig {
            player_index: settings.player_index,
            build_id: settings.build_id,
            update_interval: settings.update_interval(),
            thresholds: settings.thresholds(),
            overlap: settings.overlap_policy,
            ..BuildConfig::new(owner, assets)
        };
        Ok(Self { controller: BuildController::new(config)? })
    }
}

/// Repeating timer that drives an owner's build cycle while build mode is on.
#[derive(Component, Debug)]
pub struct BuildCycleTimer(pub Timer);

/// Transient preview entity. Has no `BuildSurface`, so traces pass through it.
#[derive(Component, Debug)]
pub struct BuildPreview {
    pub owner: Entity,
}

/// A committed placement.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buildable {
    pub owner: Entity,
    pub instigator: Entity,
    pub build_id: u32,
}

/// Mesh and materials shared by every builder, created at startup from
/// `BuildSettings`.
#[derive(Resource, Debug, Clone)]
pub struct BuildVisuals {
    pub mesh: Handle<Mesh>,
    pub valid_material: Handle<StandardMaterial>,
    pub invalid_material: Handle<StandardMaterial>,
    pub placed_material: Handle<StandardMaterial>,
    /// Half size of a placed object, used for its `BuildSurface`.
    pub half_extents: Vec3,
}

/// Turn build mode on or off for `owner`.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetBuildMode {
    pub owner: Entity,
    pub enabled: bool,
}

/// Place a buildable where `owner`'s preview currently is.
#[derive(Event, Debug, Clone, Copy)]
pub struct CommitPlacement {
    pub owner: Entity,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildSystemSet;

pub struct BuildSystemPlugin {
    pub settings: BuildSettings,
}

impl BuildSystemPlugin {
    #[must_use]
    pub fn new(settings: BuildSettings) -> Self {
        Self { settings }
    }
}

impl Default for BuildSystemPlugin {
    fn default() -> Self {
        Self::new(BuildSettings::default())
    }
}

impl Plugin for BuildSystemPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .add_event::<SetBuildMode>()
            .add_event::<CommitPlacement>()
            .add_systems(Startup, setup_build_visuals)
            .add_systems(
                Update,
                (
                    attach_build_components,
                    handle_build_mode_requests,
                    tick_build_cycles,
                    handle_commit_requests,
                    cleanup_orphaned_previews,
                )
                    .chain()
                    .in_set(BuildSystemSet),
            );
    }
}
