//! The build-cycle controller.
//!
//! Two states, Disabled and Active. While Active, the host's scheduler calls
//! `update_build_cycle` at a fixed interval; each call traces from the view,
//! decides whether the surface is buildable and keeps a single preview visual
//! in sync with the result. `spawn_buildable_actor` turns the pending
//! placement into a permanent object.
//!
//! Failures are logged and the call is abandoned. Nothing is retried; the
//! next scheduled cycle runs as usual.
use bevy::log::{debug, error, info, warn};
use bevy::transform::components::Transform;
use std::time::Duration;

use super::error::{BuildError, Dependency};
use super::host::{BuildHost, HostTypes, OverlapPolicy, SpawnRequest};
use super::trace::{perform_build_trace, TraceResult};
use super::validity::{check_build_conditions, ValidityThresholds};

pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(50);

/// Assets the preview and committed objects are drawn with. All three are
/// required; `BuildController::new` rejects a config missing any of them.
#[derive(Debug, Clone)]
pub struct BuildAssets<T: HostTypes> {
    pub preview_mesh: Option<T::Mesh>,
    pub valid_material: Option<T::Material>,
    pub invalid_material: Option<T::Material>,
}

#[derive(Debug, Clone)]
pub struct BuildConfig<T: HostTypes> {
    /// Actor the controller belongs to. Ignored by the build trace.
    pub owner: T::Actor,
    /// Local player whose camera drives the trace.
    pub player_index: u32,
    /// Tag stamped on every committed object.
    pub build_id: u32,
    pub update_interval: Duration,
    pub thresholds: ValidityThresholds,
    pub overlap: OverlapPolicy,
    pub assets: BuildAssets<T>,
}

impl<T: HostTypes> BuildConfig<T> {
    /// Config with the default interval, thresholds and overlap policy.
    #[must_use]
    pub fn new(owner: T::Actor, assets: BuildAssets<T>) -> Self {
        Self {
            owner,
            player_index: 0,
            build_id: 0,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            thresholds: ValidityThresholds::default(),
            overlap: OverlapPolicy::default(),
            assets,
        }
    }
}

/// Pending placement, recomputed every cycle while active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementState {
    pub pending_transform: Transform,
    pub is_valid: bool,
    pub is_active: bool,
}

impl Default for PlacementState {
    fn default() -> Self {
        Self { pending_transform: Transform::IDENTITY, is_valid: false, is_active: false }
    }
}

#[derive(Debug, Clone)]
struct ResolvedAssets<T: HostTypes> {
    mesh: T::Mesh,
    valid: T::Material,
    invalid: T::Material,
}

#[derive(Debug)]
pub struct BuildController<T: HostTypes> {
    owner: T::Actor,
    player_index: u32,
    build_id: u32,
    update_interval: Duration,
    thresholds: ValidityThresholds,
    overlap: OverlapPolicy,
    assets: ResolvedAssets<T>,
    placement: PlacementState,
    /// Pawn found when build mode was last enabled; the commit instigator.
    pawn: Option<T::Actor>,
    preview: Option<T::Preview>,
    timer: Option<T::Timer>,
}

impl<T: HostTypes> BuildController<T> {
    /// Validate `config` and build a disabled controller.
    ///
    /// # Errors
    /// * `MissingDependency(Mesh | Material)` when an asset is absent.
    /// * `InvalidConfig` for a non-positive interval, trace distance or a
    ///   non-finite slope angle.
    pub fn new(config: BuildConfig<T>) -> Result<Self, BuildError> {
        let BuildConfig { owner, player_index, build_id, update_interval, thresholds, overlap, assets } =
            config;

        if update_interval.is_zero() {
            return Err(BuildError::InvalidConfig("update interval must be greater than zero".into()));
        }
        if !(thresholds.trace_distance.is_finite() && thresholds.trace_distance > 0.0) {
            return Err(BuildError::InvalidConfig(format!(
                "trace distance must be positive, got {}",
                thresholds.trace_distance
            )));
        }
        if !thresholds.allowed_slope_angle_degrees.is_finite() {
            return Err(BuildError::InvalidConfig("allowed slope angle must be finite".into()));
        }

        let assets = ResolvedAssets {
            mesh: assets.preview_mesh.ok_or(Dependency::Mesh)?,
            valid: assets.valid_material.ok_or(Dependency::Material)?,
            invalid: assets.invalid_material.ok_or(Dependency::Material)?,
        };

        Ok(Self {
            owner,
            player_index,
            build_id,
            update_interval,
            thresholds,
            overlap,
            assets,
            placement: PlacementState::default(),
            pawn: None,
            preview: None,
            timer: None,
        })
    }

    #[must_use]
    pub fn is_build_mode_enabled(&self) -> bool {
        self.placement.is_active
    }

    #[must_use]
    pub fn can_build(&self) -> bool {
        self.placement.is_valid
    }

    #[must_use]
    pub fn placement(&self) -> &PlacementState {
        &self.placement
    }

    #[must_use]
    pub fn preview(&self) -> Option<T::Preview> {
        self.preview
    }

    #[must_use]
    pub fn owner(&self) -> T::Actor {
        self.owner
    }

    #[must_use]
    pub fn thresholds(&self) -> &ValidityThresholds {
        &self.thresholds
    }

    #[must_use]
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Enable or disable build mode. Returns whether build mode is enabled
    /// afterwards.
    pub fn set_build_mode_enabled<H>(&mut self, enabled: bool, host: &mut H) -> bool
    where
        H: BuildHost<T> + ?Sized,
    {
        if enabled {
            self.enable_build_mode(host)
        } else {
            self.disable_build_mode(host);
            false
        }
    }

    /// Start the recurring build cycle. Refused (and left disabled) when the
    /// camera or pawn is missing or the scheduler declines.
    pub fn enable_build_mode<H>(&mut self, host: &mut H) -> bool
    where
        H: BuildHost<T> + ?Sized,
    {
        if self.placement.is_active {
            debug!("build mode already enabled for {:?}", self.owner);
            return true;
        }

        match self.start_cycle(host) {
            Ok(()) => {
                info!("build mode enabled for {:?}", self.owner);
                true
            }
            Err(e) => {
                error!("failed to enable build mode for {:?}: {e}", self.owner);
                self.placement.is_active = false;
                false
            }
        }
    }

    fn start_cycle<H>(&mut self, host: &mut H) -> Result<(), BuildError>
    where
        H: BuildHost<T> + ?Sized,
    {
        if host.viewpoint(self.player_index).is_none() {
            return Err(Dependency::Camera.into());
        }
        let pawn = host.controlled_pawn(self.owner).ok_or(Dependency::Pawn)?;
        let timer = host
            .schedule_repeating(self.owner, self.update_interval)
            .ok_or(Dependency::Scheduler)?;

        self.pawn = Some(pawn);
        self.timer = Some(timer);
        self.placement.is_active = true;
        Ok(())
    }

    /// Stop the cycle and drop the preview. Always succeeds.
    pub fn disable_build_mode<H>(&mut self, host: &mut H)
    where
        H: BuildHost<T> + ?Sized,
    {
        if let Some(preview) = self.preview.take() {
            host.destroy_visual(preview);
        }
        if let Some(timer) = self.timer.take() {
            host.cancel(timer);
        }
        if self.placement.is_active {
            info!("build mode disabled for {:?}", self.owner);
        }
        self.placement.is_active = false;
        self.placement.is_valid = false;
    }

    /// One scheduled cycle: trace, validate, sync the preview.
    pub fn update_build_cycle<H>(&mut self, host: &mut H)
    where
        H: BuildHost<T> + ?Sized,
    {
        if !self.placement.is_active {
            debug!("build cycle called while disabled, ignoring");
            return;
        }

        let traced = perform_build_trace::<T, H>(
            &*host,
            self.player_index,
            self.owner,
            self.thresholds.trace_distance,
        );
        match traced {
            Ok(trace) => self.apply_trace(&trace),
            Err(e) => {
                // no trace this cycle; behave as a miss and keep the last position
                error!("build trace failed: {e}");
                self.placement.is_valid = false;
            }
        }

        self.sync_preview(host);
    }

    fn apply_trace(&mut self, trace: &TraceResult) {
        self.placement.pending_transform.translation = trace.placement_point();
        self.placement.is_valid = check_build_conditions(trace, &self.thresholds);
    }

    fn sync_preview<H>(&mut self, host: &mut H)
    where
        H: BuildHost<T> + ?Sized,
    {
        let transform = self.placement.pending_transform;
        if let Some(stale) = self.preview
            && !host.visual_exists(stale)
        {
            error!(
                "build preview {stale:?} disappeared, respawning: {}",
                BuildError::from(Dependency::Preview)
            );
            self.preview = None;
        }

        let preview = match self.preview {
            Some(preview) => {
                host.set_visual_transform(preview, transform);
                preview
            }
            None => match host.attach_visual(self.owner, transform, &self.assets.mesh) {
                Some(preview) => {
                    self.preview = Some(preview);
                    preview
                }
                None => {
                    error!("failed to spawn build preview: {}", BuildError::from(Dependency::Preview));
                    return;
                }
            },
        };

        let material = if self.placement.is_valid { &self.assets.valid } else { &self.assets.invalid };
        host.set_visual_material(preview, material);
    }

    /// Commit the pending placement. A no-op unless the last cycle found a
    /// buildable surface.
    pub fn spawn_buildable_actor<H>(&self, host: &mut H) -> Option<T::Object>
    where
        H: BuildHost<T> + ?Sized,
    {
        if !self.placement.is_valid {
            warn!("cannot build here, nothing spawned");
            return None;
        }

        match self.try_spawn(host) {
            Ok(object) => {
                info!(
                    "spawned buildable {} at {}",
                    self.build_id, self.placement.pending_transform.translation
                );
                Some(object)
            }
            Err(e) => {
                error!("failed to spawn buildable actor: {e}");
                None
            }
        }
    }

    /// Entry point for input handling: place an object where the preview is.
    /// Same checks and result as `spawn_buildable_actor`.
    pub fn commit_placement<H>(&self, host: &mut H) -> Option<T::Object>
    where
        H: BuildHost<T> + ?Sized,
    {
        self.spawn_buildable_actor(host)
    }

    fn try_spawn<H>(&self, host: &mut H) -> Result<T::Object, BuildError>
    where
        H: BuildHost<T> + ?Sized,
    {
        if !host.has_world() {
            return Err(Dependency::World.into());
        }
        let instigator = self
            .pawn
            .or_else(|| host.controlled_pawn(self.owner))
            .ok_or(Dependency::Pawn)?;

        let request = SpawnRequest {
            transform: self.placement.pending_transform,
            owner: self.owner,
            instigator,
            mesh: self.assets.mesh.clone(),
            build_id: self.build_id,
            overlap: self.overlap,
        };
        host.spawn_object(request).ok_or(BuildError::SpawnRejected)
    }
}
