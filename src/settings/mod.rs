//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `ron::setup_ron_watcher`). Build settings
//! are read once when a builder is attached; reloading only affects builders
//! attached afterwards.
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::build::host::OverlapPolicy;
use crate::build::validity::{ValidityThresholds, DEFAULT_ALLOWED_SLOPE_ANGLE, DEFAULT_TRACE_DISTANCE};

/// Build mode tuning. Inserted as a resource by `BuildSystemPlugin`.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "BuildSettings::default_update_interval")]
    pub update_interval_seconds: f32, // Seconds between build traces while build mode is on.
    #[serde(default)]
    pub player_index: u32, // Local player whose camera drives the build trace.
    #[serde(default)]
    pub build_id: u32, // Tag stamped on placed objects.
    #[serde(default = "BuildSettings::default_trace_distance")]
    pub line_trace_distance: f32, // How far from the camera the build trace reaches.
    #[serde(default = "BuildSettings::default_slope")]
    pub allowed_slope_angle: f32, // Steepest buildable surface, degrees from horizontal.
    #[serde(default)]
    pub overlap_policy: OverlapPolicy, // What to do when a placement starts inside geometry.
    #[serde(default = "BuildSettings::default_preview_size")]
    pub preview_size: [f32; 3], // Width, height, depth of the preview / placed object.
    #[serde(default = "BuildSettings::default_valid_color")]
    pub valid_color: [f32; 4], // Preview tint (sRGBA) over a buildable surface.
    #[serde(default = "BuildSettings::default_invalid_color")]
    pub invalid_color: [f32; 4], // Preview tint (sRGBA) over an unbuildable surface.
    #[serde(default = "BuildSettings::default_placed_color")]
    pub placed_color: [f32; 4], // Color of placed objects.
}

impl BuildSettings {
    fn default_update_interval() -> f32 { 0.05 }
    fn default_trace_distance() -> f32 { DEFAULT_TRACE_DISTANCE }
    fn default_slope() -> f32 { DEFAULT_ALLOWED_SLOPE_ANGLE }
    fn default_preview_size() -> [f32; 3] { [1.0, 1.0, 1.0] }
    fn default_valid_color() -> [f32; 4] { [0.2, 0.8, 0.2, 0.5] }
    fn default_invalid_color() -> [f32; 4] { [0.8, 0.2, 0.2, 0.5] }
    fn default_placed_color() -> [f32; 4] { [0.7, 0.7, 0.72, 1.0] }

    /// Interval as a `Duration`. Negative or non-finite values come back as
    /// zero, which the controller rejects at construction.
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        Duration::try_from_secs_f32(self.update_interval_seconds).unwrap_or(Duration::ZERO)
    }

    #[must_use]
    pub fn thresholds(&self) -> ValidityThresholds {
        ValidityThresholds {
            allowed_slope_angle_degrees: self.allowed_slope_angle,
            trace_distance: self.line_trace_distance,
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            update_interval_seconds: Self::default_update_interval(),
            player_index: 0,
            build_id: 0,
            line_trace_distance: Self::default_trace_distance(),
            allowed_slope_angle: Self::default_slope(),
            overlap_policy: OverlapPolicy::default(),
            preview_size: Self::default_preview_size(),
            valid_color: Self::default_valid_color(),
            invalid_color: Self::default_invalid_color(),
            placed_color: Self::default_placed_color(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_y: bool, // Invert mouse Y axis
    #[serde(default)]
    pub invert_x: bool, // Invert mouse X axis
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Mouse sensitivity multiplier
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 1.0 }

    fn default_keybinds() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("forward".to_string(), "W".to_string());
        m.insert("back".to_string(), "S".to_string());
        m.insert("left".to_string(), "A".to_string());
        m.insert("right".to_string(), "D".to_string());
        m.insert("up".to_string(), "Space".to_string());
        m.insert("down".to_string(), "LShift".to_string());
        m.insert("toggle_build".to_string(), "B".to_string());
        m.insert("place".to_string(), "E".to_string());
        m.insert("pause".to_string(), "Escape".to_string());
        m
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_y: false,
            invert_x: false,
            mouse_sensitivity: Self::default_sensitivity(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Log output, handed to bevy's `LogPlugin` at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "LogSettings::default_level")]
    pub level: String, // Default level for everything not matched by `filter`.
    #[serde(default = "LogSettings::default_filter")]
    pub filter: String, // `EnvFilter` directives, e.g. "wgpu=error,build_system=debug".
}

impl LogSettings {
    fn default_level() -> String { "info".to_string() }
    fn default_filter() -> String { "wgpu=error,naga=warn,build_system=info".to_string() }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: Self::default_level(), filter: Self::default_filter() }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub log: LogSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Key bound to `action`, or `default` when unbound or unparseable.
    #[must_use]
    pub fn keybind(&self, action: &str, default: KeyCode) -> KeyCode {
        self.controls
            .keybinds
            .get(action)
            .and_then(|s| Self::keycode_from_str(s))
            .unwrap_or(default)
    }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode` that
    /// can be used with Bevy's input system.
    ///
    /// # Arguments
    /// * `name` - The string key identifier to convert (e.g., "W", "Space", "F1").
    ///
    /// # Returns
    /// An `Option<KeyCode>` corresponding to the provided string, or `None` if the string
    /// does not match any known key.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        let s = name.to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let letter = match c {
                'A' => Some(KeyCode::KeyA),
                'B' => Some(KeyCode::KeyB),
                'C' => Some(KeyCode::KeyC),
                'D' => Some(KeyCode::KeyD),
                'E' => Some(KeyCode::KeyE),
                'F' => Some(KeyCode::KeyF),
                'G' => Some(KeyCode::KeyG),
                'H' => Some(KeyCode::KeyH),
                'I' => Some(KeyCode::KeyI),
                'J' => Some(KeyCode::KeyJ),
                'K' => Some(KeyCode::KeyK),
                'L' => Some(KeyCode::KeyL),
                'M' => Some(KeyCode::KeyM),
                'N' => Some(KeyCode::KeyN),
                'O' => Some(KeyCode::KeyO),
                'P' => Some(KeyCode::KeyP),
                'Q' => Some(KeyCode::KeyQ),
                'R' => Some(KeyCode::KeyR),
                'S' => Some(KeyCode::KeyS),
                'T' => Some(KeyCode::KeyT),
                'U' => Some(KeyCode::KeyU),
                'V' => Some(KeyCode::KeyV),
                'W' => Some(KeyCode::KeyW),
                'X' => Some(KeyCode::KeyX),
                'Y' => Some(KeyCode::KeyY),
                'Z' => Some(KeyCode::KeyZ),
                '0' => Some(KeyCode::Digit0),
                '1' => Some(KeyCode::Digit1),
                '2' => Some(KeyCode::Digit2),
                '3' => Some(KeyCode::Digit3),
                '4' => Some(KeyCode::Digit4),
                '5' => Some(KeyCode::Digit5),
                '6' => Some(KeyCode::Digit6),
                '7' => Some(KeyCode::Digit7),
                '8' => Some(KeyCode::Digit8),
                '9' => Some(KeyCode::Digit9),
                _ => None,
            };
            if letter.is_some() {
                return letter;
            }
        }

        Some(match s.as_str() {
            // Function keys
            "F1" => KeyCode::F1,
            "F2" => KeyCode::F2,
            "F3" => KeyCode::F3,
            "F4" => KeyCode::F4,
            "F5" => KeyCode::F5,
            "F6" => KeyCode::F6,
            "F7" => KeyCode::F7,
            "F8" => KeyCode::F8,
            "F9" => KeyCode::F9,
            "F10" => KeyCode::F10,
            "F11" => KeyCode::F11,
            "F12" => KeyCode::F12,

            // Arrows / navigation
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,

            // Whitespace / control
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" | "BACK" => KeyCode::Backspace,

            // Modifiers
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,

            _ => return None,
        })
    }
}

pub mod loader;
