use bevy::prelude::*;
use channel_map::{
    load_map_inputs, sidebar_entries, Lcg, MapController, MapInputs, Millis, ProjectionParams,
    SeedOptions, SidebarEntry, Viewport,
};

use crate::viewer_config::MapViewerConfig;

/// Everything the map systems share. The controller is built lazily once the
/// first drawable surface size is known.
#[derive(Resource)]
pub(super) struct ChannelMapState {
    pub inputs: Option<MapInputs>,
    pub controller: Option<MapController>,
    pub entries: Vec<SidebarEntry>,
    pub load_error: Option<String>,
    pub rng: Lcg,
    pub ticks: u64,
    pub reverted_moves: usize,
}

impl Default for ChannelMapState {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl ChannelMapState {
    pub(super) fn with_seed(seed: u64) -> Self {
        Self {
            inputs: None,
            controller: None,
            entries: Vec::new(),
            load_error: None,
            rng: Lcg::new(seed),
            ticks: 0,
            reverted_moves: 0,
        }
    }

    pub(super) fn from_inputs(inputs: MapInputs, seed: u64) -> Self {
        let mut state = Self::with_seed(seed);
        state.entries = sidebar_entries(&inputs.records);
        state.inputs = Some(inputs);
        state
    }

    pub(super) fn is_settled(&self) -> bool {
        self.controller
            .as_ref()
            .map(MapController::is_settled)
            .unwrap_or(false)
    }

    /// Builds, seeds and reveals the controller on first call; later calls
    /// return the existing one. `None` while inputs are missing, failed, or
    /// the surface has no area yet.
    pub(super) fn ensure_controller(
        &mut self,
        config: &MapViewerConfig,
        viewport: Viewport,
        now: Millis,
    ) -> Option<&mut MapController> {
        if self.controller.is_none() {
            if self.load_error.is_some() || !viewport.is_drawable() {
                return None;
            }
            let inputs = self.inputs.take()?;
            let params = ProjectionParams::for_viewport(config.center, config.scale, viewport);
            let mut controller =
                MapController::with_mercator(inputs.boundary, inputs.records, params, viewport);
            let options = SeedOptions::default();
            let seeded = if config.spaced_placement {
                controller.seed_spaced(&mut self.rng, options)
            } else {
                controller.seed(&mut self.rng, options)
            };
            if let Err(err) = seeded {
                warn!("channel map placement failed: {err}");
                self.load_error = Some(err.to_string());
                return None;
            }
            controller.reveal_markers(now, &mut self.rng);
            info!(
                "channel map placed {} markers on {}x{} surface",
                controller.markers().len(),
                viewport.width,
                viewport.height
            );
            self.controller = Some(controller);
        }
        self.controller.as_mut()
    }

    /// Runs up to `ticks` simulation steps; stops early once the layout settles.
    pub(super) fn advance(&mut self, ticks: usize) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        for _ in 0..ticks {
            if controller.is_settled() {
                break;
            }
            self.reverted_moves += controller.step().reverted;
            self.ticks += 1;
        }
    }
}

pub(super) fn load_channel_map_inputs(
    config: Res<MapViewerConfig>,
    mut commands: Commands,
) {
    match load_map_inputs(&config.boundary_path, &config.channels_path) {
        Ok(inputs) => {
            info!(
                "channel map loaded {} channels from {}",
                inputs.records.len(),
                config.channels_path.display()
            );
            commands.insert_resource(ChannelMapState::from_inputs(inputs, config.seed));
        }
        Err(err) => {
            warn!("channel map inputs unavailable: {err}");
            let mut state = ChannelMapState::with_seed(config.seed);
            state.load_error = Some(err.to_string());
            commands.insert_resource(state);
        }
    }
}

pub(super) fn advance_channel_map(
    config: Res<MapViewerConfig>,
    state: Option<ResMut<ChannelMapState>>,
) {
    let Some(mut state) = state else {
        return;
    };
    state.advance(config.ticks_per_frame);
}
