pub mod boundary;
pub mod catalog;
pub mod channel;
pub mod constraint;
pub mod controller;
pub mod export;
pub mod geometry;
pub mod inputs;
pub mod layout;
pub mod marker;
pub mod presentation;
pub mod projection;
pub mod rng;
pub mod seeding;
pub mod sidebar;
pub mod transition;
pub mod view;
pub mod viewport;

pub use boundary::{BoundaryError, Polygon, RegionBoundary, Ring};
pub use catalog::{
    CatalogError, ChannelCatalog, ChannelChange, ChannelField, ChannelGroup, HistoryEntry,
    StoredGroup, UpsertOutcome,
};
pub use channel::{
    circle_size, load_channel_records, parse_channel_records, sort_by_audience, ChannelLoadError,
    ChannelRecord, MAX_CIRCLE_SIZE, MIN_CIRCLE_SIZE,
};
pub use constraint::{BoundaryConstraint, StepReport, StepVerdict};
pub use controller::MapController;
pub use export::{MarkerExport, SceneExport};
pub use geometry::{GeoPoint, ScreenBounds, ScreenPoint};
pub use inputs::{load_channels_document, load_map_inputs, parse_channels_document, LoadError, MapInputs};
pub use layout::{ForceLayout, Layout, LayoutNode, COLLIDE_RADIUS_FACTOR};
pub use marker::ChannelMarker;
pub use presentation::{
    MarkerAppearance, MarkerVisual, TooltipContent, CIRCLE_FILL, CIRCLE_FILL_RGB,
    FADE_IN_DURATION_MS, FADE_IN_MAX_DELAY_MS, FOCUS_DURATION_MS, HOVER_DURATION_MS, HOVER_SCALE,
};
pub use projection::{
    MercatorProjection, PlanarProjector, ProjectionParams, Projector, DEFAULT_CENTER, DEFAULT_SCALE,
};
pub use rng::Lcg;
pub use seeding::{seed_positions, seed_spaced, PlacementError, SeedOptions};
pub use sidebar::{find_marker_by_name, sidebar_entries, SidebarEntry};
pub use transition::{ease_cubic_in_out, Lerp, Millis, Tween};
pub use view::{ViewTransform, ZoomBehavior, FOCUS_ZOOM, MAX_ZOOM, MIN_ZOOM};
pub use viewport::{FullscreenToggle, Viewport};
