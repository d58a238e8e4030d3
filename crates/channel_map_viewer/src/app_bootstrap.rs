use super::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

use crate::headless::{ensure_headless_controller, headless_report};
use crate::logo_textures::LogoTextures;
use crate::map_canvas::render_channel_map_egui;
use crate::map_state::{advance_channel_map, load_channel_map_inputs};

pub(super) fn run_ui(config: MapViewerConfig) {
    let locale = config.locale;
    App::new()
        .insert_resource(config)
        .insert_resource(UiI18n { locale })
        .insert_resource(LogoTextures::default())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: WINDOW_TITLE.to_string(),
                resolution: (WINDOW_WIDTH, WINDOW_HEIGHT).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_systems(Startup, (setup_camera, load_channel_map_inputs))
        .add_systems(Update, advance_channel_map)
        .add_systems(EguiPrimaryContextPass, render_channel_map_egui)
        .run();
}

pub(super) fn run_headless(config: MapViewerConfig) {
    App::new()
        .insert_resource(config)
        .insert_resource(HeadlessStatus::default())
        .add_plugins(MinimalPlugins)
        .add_systems(Startup, load_channel_map_inputs)
        .add_systems(
            Update,
            (
                ensure_headless_controller,
                advance_channel_map,
                headless_report,
            )
                .chain(),
        )
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
