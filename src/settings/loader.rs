//! Settings loading and hot-reloading.
//! This module provides utilities for loading settings from RON files and watching
//! for changes to enable hot-reloading of settings at runtime.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first successfully parsed `Settings` will be used.
//! If no RON files are found or if no parsing succeeds, default settings will be used.
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;
use bevy::log::{info, warn};
use bevy::prelude::{Res, ResMut, Resource};

pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub crate::ron::RonWatcher);

/// Load settings from `path` (directory). If multiple `.ron` files are present
/// the first parsed `Settings` will be used. If none exist the `Default` is used.
///
/// # Arguments
/// * `path` - The directory path where settings RON files are located (e.g., "data/settings").
///
/// # Returns
/// A `Settings` struct loaded from the first successfully parsed RON file in the specified directory
/// or default settings if no valid RON files are found.
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    if let Some(first) = items.into_iter().next() {
        first
    } else {
        warn!("no usable settings in {path}, using defaults");
        Settings::defaults()
    }
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns the `notify::Error` if the directory cannot be watched.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Check for changes and reload the settings resource when files change.
///
/// The reloaded `build` section is stored on `Settings` but the `BuildSettings`
/// resource used by the plugin is left alone; builders keep the values they
/// were constructed with.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    let mut flag = match watcher.0.changed.lock() {
        Ok(flag) => flag,
        Err(poisoned) => {
            warn!("settings watcher mutex poisoned, recovering");
            poisoned.into_inner()
        }
    };
    if *flag {
        info!("settings changed, reloading");
        *settings = load_settings_from_dir(SETTINGS_DIR);
        *flag = false;
    }
}

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(crate::ron::RonWatcher::stub())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dir_gives_defaults() {
        let s = load_settings_from_dir("definitely/not/a/settings/dir");
        assert_eq!(s.build, crate::settings::BuildSettings::default());
    }

    #[test]
    fn reads_first_ron_file() {
        let dir = std::env::temp_dir().join(format!("build_system_settings_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("build.ron"), "(build: (line_trace_distance: 12.5))").unwrap();

        let s = load_settings_from_dir(dir.to_str().unwrap());
        assert_eq!(s.build.line_trace_distance, 12.5);

        std::fs::remove_dir_all(&dir).ok();
    }
}
