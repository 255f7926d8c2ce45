//! Build mode: preview and place objects where the player is looking.
//!
//! The pieces, bottom-up:
//! * `trace` casts the build ray from the player's view.
//! * `validity` decides whether the surface it hit is flat enough.
//! * `controller` runs the periodic cycle, owns the preview and commits
//!   placements.
//! * `host` is the contract the runtime fulfils (camera, ray casts,
//!   visuals, spawning, scheduling). `crate::plugin` implements it for Bevy.
//!
//! # Example
//!
//! ```ignore
//! let mut controller = BuildController::new(BuildConfig::new(owner, assets))?;
//! if controller.enable_build_mode(&mut host) {
//!     // the host's scheduler now calls this every update interval
//!     controller.update_build_cycle(&mut host);
//!     controller.commit_placement(&mut host);
//! }
//! controller.disable_build_mode(&mut host);
//! ```

pub mod controller;
pub mod error;
pub mod host;
pub mod trace;
pub mod validity;

#[cfg(test)]
pub(crate) mod fake;

pub use controller::{BuildAssets, BuildConfig, BuildController, PlacementState, DEFAULT_UPDATE_INTERVAL};
pub use error::{BuildError, Dependency};
pub use host::{BuildHost, HostTypes, OverlapPolicy, SpawnRequest, SurfaceHit, Viewpoint};
pub use trace::{perform_build_trace, TraceResult};
pub use validity::{check_build_conditions, slope_angle_degrees, ValidityThresholds};
