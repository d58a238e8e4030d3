use super::*;
use std::path::PathBuf;

use crate::headless::{ensure_headless_controller, headless_report, HeadlessSummary};
use crate::map_state::{advance_channel_map, load_channel_map_inputs, ChannelMapState};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../channel_map/tests/fixtures")
        .join(name)
}

fn fixture_config() -> MapViewerConfig {
    MapViewerConfig {
        boundary_path: fixture("boundary.json"),
        channels_path: fixture("channels.json"),
        ticks_per_frame: 32,
        headless: true,
        ..MapViewerConfig::default()
    }
}

#[test]
fn load_inputs_inserts_state_with_sidebar_entries() {
    let mut app = App::new();
    app.insert_resource(fixture_config());
    app.add_systems(Startup, load_channel_map_inputs);

    app.update();

    let state = app.world().resource::<ChannelMapState>();
    assert!(state.load_error.is_none());
    assert!(state.inputs.is_some());
    let titles: Vec<_> = state.entries.iter().map(|entry| entry.title.as_str()).collect();
    assert_eq!(titles, vec!["Городские новости", "Погода", "Спорт района"]);
}

#[test]
fn missing_inputs_record_load_error() {
    let mut app = App::new();
    app.insert_resource(MapViewerConfig {
        boundary_path: fixture("missing-boundary.json"),
        ..fixture_config()
    });
    app.add_systems(Startup, load_channel_map_inputs);

    app.update();

    let state = app.world().resource::<ChannelMapState>();
    assert!(state
        .load_error
        .as_deref()
        .is_some_and(|err| err.contains("boundary")));
    assert!(state.entries.is_empty());
}

#[test]
fn advance_without_state_is_a_no_op() {
    let mut app = App::new();
    app.insert_resource(fixture_config());
    app.add_systems(Update, advance_channel_map);

    app.update();

    assert!(app.world().get_resource::<ChannelMapState>().is_none());
}

#[test]
fn headless_pipeline_settles_and_reports_once() {
    let mut app = App::new();
    app.insert_resource(fixture_config());
    app.insert_resource(HeadlessStatus::default());
    app.add_message::<bevy::app::AppExit>();
    app.add_systems(Startup, load_channel_map_inputs);
    app.add_systems(
        Update,
        (
            ensure_headless_controller,
            advance_channel_map,
            headless_report,
        )
            .chain(),
    );

    for _ in 0..200 {
        app.update();
        if app.world().resource::<HeadlessStatus>().reported_settled {
            break;
        }
    }

    let status = app.world().resource::<HeadlessStatus>();
    assert!(status.reported_settled);
    assert!(!status.reported_error);

    let state = app.world().resource::<ChannelMapState>();
    let summary = HeadlessSummary::from_state(state);
    assert_eq!(summary.markers, 3);
    assert!(summary.settled);
    assert!(summary.ticks > 0);

    let controller = state.controller.as_ref().expect("controller");
    assert_eq!(controller.viewport(), channel_map::Viewport::default());
    for marker in controller.markers() {
        let geo = marker.geo.expect("committed geo");
        assert!(controller.boundary().contains(geo));
    }
}

#[test]
fn headless_report_flags_load_error() {
    let mut app = App::new();
    app.insert_resource(MapViewerConfig {
        channels_path: fixture("missing-channels.json"),
        ..fixture_config()
    });
    app.insert_resource(HeadlessStatus::default());
    app.add_message::<bevy::app::AppExit>();
    app.add_systems(Startup, load_channel_map_inputs);
    app.add_systems(Update, (ensure_headless_controller, headless_report).chain());

    app.update();

    let status = app.world().resource::<HeadlessStatus>();
    assert!(status.reported_error);
    assert!(!status.reported_settled);
    assert!(app
        .world()
        .resource::<ChannelMapState>()
        .controller
        .is_none());
}

#[test]
fn headless_pipeline_exits_with_empty_channel_list() {
    let mut app = App::new();
    app.insert_resource(MapViewerConfig {
        channels_path: fixture("empty_channels.json"),
        ..fixture_config()
    });
    app.insert_resource(HeadlessStatus::default());
    app.add_message::<bevy::app::AppExit>();
    app.add_systems(Startup, load_channel_map_inputs);
    app.add_systems(
        Update,
        (
            ensure_headless_controller,
            advance_channel_map,
            headless_report,
        )
            .chain(),
    );

    for _ in 0..200 {
        app.update();
        if app.world().resource::<HeadlessStatus>().reported_settled {
            break;
        }
    }

    let status = app.world().resource::<HeadlessStatus>();
    assert!(status.reported_settled);
    assert!(!status.reported_error);
    let summary = HeadlessSummary::from_state(app.world().resource::<ChannelMapState>());
    assert_eq!(summary.markers, 0);
    assert!(summary.settled);
}
