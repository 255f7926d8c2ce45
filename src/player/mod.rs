//! Demo player controls (mouse look and free flight).
//!
//! # Example:
//!
//! ```ignore
//! commands.spawn((
//!     Camera3dBundle::default(),
//!     Pawn,
//!     PlayerView { index: 0 },
//!     PlayerLook::default(),
//! ));
//! app.add_systems(Update, (camera_look, cursor_grab, fly_movement));
//! ```
pub mod camera;
pub mod movement;

pub use camera::*;
pub use movement::*;
