use bevy::prelude::*;

mod app_bootstrap;
mod headless;
mod i18n;
mod logo_textures;
mod map_canvas;
mod map_state;
mod sidebar_panel;
mod viewer_config;

use app_bootstrap::{run_headless, run_ui};
use i18n::UiI18n;
use viewer_config::{resolve_map_viewer_config, MapViewerConfig};

const WINDOW_TITLE: &str = "Channel Map";
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 800;

fn main() {
    let config = match resolve_map_viewer_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("channel map config invalid: {err}");
            std::process::exit(1);
        }
    };

    if config.headless {
        run_headless(config);
    } else {
        run_ui(config);
    }
}

/// Monotonic clock in milliseconds fed to the controller's transitions.
fn now_millis(time: &Time) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}

#[derive(Resource, Default)]
struct HeadlessStatus {
    last_ticks: u64,
    reported_settled: bool,
    reported_error: bool,
}

#[cfg(test)]
mod tests;
