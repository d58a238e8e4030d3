use bevy::app::AppExit;
use bevy::prelude::*;
use channel_map::Viewport;
use serde::Serialize;

use crate::map_state::ChannelMapState;
use crate::viewer_config::MapViewerConfig;
use crate::HeadlessStatus;

const HEADLESS_REPORT_EVERY_TICKS: u64 = 50;

/// Final line printed on stdout once the layout settles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(super) struct HeadlessSummary {
    pub markers: usize,
    pub ticks: u64,
    pub reverted_moves: usize,
    pub settled: bool,
}

impl HeadlessSummary {
    pub(super) fn from_state(state: &ChannelMapState) -> Self {
        Self {
            markers: state
                .controller
                .as_ref()
                .map(|controller| controller.markers().len())
                .unwrap_or(0),
            ticks: state.ticks,
            reverted_moves: state.reverted_moves,
            settled: state.is_settled(),
        }
    }
}

/// Headless runs have no canvas, so the controller uses the default surface.
pub(super) fn ensure_headless_controller(
    config: Res<MapViewerConfig>,
    state: Option<ResMut<ChannelMapState>>,
) {
    let Some(mut state) = state else {
        return;
    };
    if state.controller.is_none() {
        state.ensure_controller(&config, Viewport::default(), 0.0);
    }
}

pub(super) fn headless_report(
    mut status: ResMut<HeadlessStatus>,
    state: Option<Res<ChannelMapState>>,
    mut app_exit: MessageWriter<AppExit>,
) {
    let Some(state) = state else {
        return;
    };

    if let Some(err) = state.load_error.as_deref() {
        if !status.reported_error {
            eprintln!("channel map error: {err}");
            status.reported_error = true;
            app_exit.write(AppExit::error());
        }
        return;
    }

    if state.ticks >= status.last_ticks + HEADLESS_REPORT_EVERY_TICKS {
        eprintln!(
            "channel map ticks: {} reverted: {}",
            state.ticks, state.reverted_moves
        );
        status.last_ticks = state.ticks;
    }

    if state.is_settled() && !status.reported_settled {
        let summary = HeadlessSummary::from_state(&state);
        match serde_json::to_string(&summary) {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("channel map summary failed: {err}"),
        }
        status.reported_settled = true;
        app_exit.write(AppExit::Success);
    }
}
