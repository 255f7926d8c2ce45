use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use build_system::player::{camera_look, cursor_grab, fly_movement};
use build_system::plugin::{BuildSystemPlugin, BuildSystemSet};
use build_system::settings::loader as settings_loader;

mod app;
use app::{build_input, setup_scene};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let level = settings.log.level.parse::<Level>().unwrap_or(Level::INFO);

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Build Mode".to_string(),
                    position: WindowPosition::Centered(MonitorSelection::Primary),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                level,
                filter: settings.log.filter.clone(),
                ..default()
            }),
    )
    .add_plugins(BuildSystemPlugin::new(settings.build.clone()));

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, setup_scene);
    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, (fly_movement, camera_look, cursor_grab));
    app.add_systems(Update, build_input.before(BuildSystemSet));

    app.run();
}
