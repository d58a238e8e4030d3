//! The single owner of all map state.
//!
//! Every interaction handler receives the [`MapController`] explicitly; there
//! is no ambient marker list or view transform.

use crate::boundary::RegionBoundary;
use crate::channel::ChannelRecord;
use crate::constraint::{BoundaryConstraint, StepReport};
use crate::geometry::ScreenPoint;
use crate::layout::{ForceLayout, Layout, LayoutNode, COLLIDE_RADIUS_FACTOR};
use crate::marker::ChannelMarker;
use crate::presentation::{
    MarkerVisual, TooltipContent, FADE_IN_DURATION_MS, FADE_IN_MAX_DELAY_MS,
    FOCUS_DURATION_MS, HOVER_DURATION_MS, HOVER_SCALE,
};
use crate::projection::{MercatorProjection, ProjectionParams, Projector};
use crate::rng::Lcg;
use crate::seeding::{seed_positions, seed_spaced, PlacementError, SeedOptions};
use crate::sidebar::find_marker_by_name;
use crate::transition::{Millis, Tween};
use crate::view::{ViewTransform, ZoomBehavior, FOCUS_ZOOM};
use crate::viewport::{FullscreenToggle, Viewport};

pub struct MapController<P: Projector = MercatorProjection, L: Layout = ForceLayout> {
    boundary: RegionBoundary,
    projector: P,
    layout: L,
    viewport: Viewport,
    fullscreen: FullscreenToggle,
    markers: Vec<ChannelMarker>,
    visuals: Vec<MarkerVisual>,
    scales: Vec<Tween<f64>>,
    opacities: Vec<Tween<f64>>,
    zoom: ZoomBehavior,
    view: Tween<ViewTransform>,
    hovered: Option<usize>,
    tooltip: Option<TooltipContent>,
}

impl MapController {
    /// Mercator projection centered on `params` with the default force layout.
    pub fn with_mercator(
        boundary: RegionBoundary,
        records: Vec<ChannelRecord>,
        params: ProjectionParams,
        viewport: Viewport,
    ) -> Self {
        let projector = MercatorProjection::new(ProjectionParams::for_viewport(
            params.center,
            params.scale,
            viewport,
        ));
        let layout = ForceLayout::new(viewport.center());
        Self::new(boundary, records, projector, layout, viewport)
    }
}

impl<P: Projector, L: Layout> MapController<P, L> {
    pub fn new(
        boundary: RegionBoundary,
        records: Vec<ChannelRecord>,
        projector: P,
        mut layout: L,
        viewport: Viewport,
    ) -> Self {
        layout.set_center(viewport.center());
        let visuals = records.iter().map(MarkerVisual::for_record).collect();
        let markers: Vec<ChannelMarker> = records.into_iter().map(ChannelMarker::new).collect();
        let count = markers.len();
        Self {
            boundary,
            projector,
            layout,
            viewport,
            fullscreen: FullscreenToggle::default(),
            markers,
            visuals,
            scales: vec![Tween::fixed(1.0); count],
            opacities: vec![Tween::fixed(1.0); count],
            zoom: ZoomBehavior::default(),
            view: Tween::fixed(ViewTransform::IDENTITY),
            hovered: None,
            tooltip: None,
        }
    }

    pub fn boundary(&self) -> &RegionBoundary {
        &self.boundary
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn markers(&self) -> &[ChannelMarker] {
        &self.markers
    }

    pub fn visual(&self, index: usize) -> Option<&MarkerVisual> {
        self.visuals.get(index)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_active()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<&TooltipContent> {
        self.tooltip.as_ref()
    }

    pub fn zoom_behavior(&self) -> ZoomBehavior {
        self.zoom
    }

    /// Projected boundary rings in surface coordinates.
    pub fn boundary_rings(&self) -> Vec<Vec<ScreenPoint>> {
        self.boundary.screen_rings(&self.projector)
    }

    pub fn seed(&mut self, rng: &mut Lcg, options: SeedOptions) -> Result<(), PlacementError> {
        seed_positions(&mut self.markers, &self.boundary, &self.projector, rng, options)
    }

    pub fn seed_spaced(&mut self, rng: &mut Lcg, options: SeedOptions) -> Result<(), PlacementError> {
        seed_spaced(&mut self.markers, &self.boundary, &self.projector, rng, options)
    }

    /// Starts every marker's fade-in after its own random delay.
    pub fn reveal_markers(&mut self, now: Millis, rng: &mut Lcg) {
        for opacity in &mut self.opacities {
            opacity.set(0.0);
            let delay = rng.range_f64(0.0, FADE_IN_MAX_DELAY_MS);
            opacity.retarget(1.0, now, delay, FADE_IN_DURATION_MS);
        }
    }

    /// One layout tick followed by the boundary accept/reject rule.
    pub fn step(&mut self) -> StepReport {
        let mut nodes: Vec<LayoutNode> = self
            .markers
            .iter()
            .map(|marker| marker.layout_node(COLLIDE_RADIUS_FACTOR))
            .collect();
        self.layout.tick(&mut nodes);

        let constraint =
            BoundaryConstraint::new(&self.boundary, &self.projector, self.viewport.center());
        let mut report = StepReport::default();
        for (marker, node) in self.markers.iter_mut().zip(&nodes) {
            marker.velocity = node.velocity();
            report.record(constraint.apply(marker, node.position()));
        }
        report
    }

    pub fn is_settled(&self) -> bool {
        self.layout.is_settled()
    }

    /// Enlarges the marker and shows its tooltip; a previously hovered
    /// marker shrinks back first.
    pub fn hover(&mut self, index: usize, pointer: ScreenPoint, now: Millis) -> Option<&TooltipContent> {
        if index >= self.markers.len() {
            return None;
        }
        if self.hovered != Some(index) {
            self.unhover(now);
            self.scales[index].retarget(HOVER_SCALE, now, 0.0, HOVER_DURATION_MS);
            self.hovered = Some(index);
        }
        self.tooltip = Some(TooltipContent::for_record(&self.markers[index].record, pointer));
        self.tooltip.as_ref()
    }

    pub fn unhover(&mut self, now: Millis) {
        if let Some(index) = self.hovered.take() {
            if let Some(scale) = self.scales.get_mut(index) {
                scale.retarget(1.0, now, 0.0, HOVER_DURATION_MS);
            }
        }
        self.tooltip = None;
    }

    /// Centers the view on a marker at the focus zoom.
    pub fn focus_marker(&mut self, index: usize, now: Millis) -> Option<ViewTransform> {
        let marker = self.markers.get(index)?;
        let target = ViewTransform::centered_on(
            marker.position,
            self.viewport,
            self.zoom.clamp_scale(FOCUS_ZOOM),
        );
        self.view.retarget(target, now, 0.0, FOCUS_DURATION_MS);
        Some(target)
    }

    /// Same focus as clicking the marker whose name matches `title`.
    pub fn select_sidebar(&mut self, title: &str, now: Millis) -> Option<ViewTransform> {
        let index = find_marker_by_name(&self.markers, title)?;
        self.focus_marker(index, now)
    }

    pub fn zoom_wheel(&mut self, anchor: ScreenPoint, delta_y: f64, now: Millis) -> ViewTransform {
        let next = self.zoom.wheel(self.view.value_at(now), anchor, delta_y);
        self.view.set(next);
        next
    }

    pub fn pan(&mut self, delta: ScreenPoint, now: Millis) -> ViewTransform {
        let next = self.zoom.pan(self.view.value_at(now), delta);
        self.view.set(next);
        next
    }

    /// Enters or leaves fullscreen and re-derives marker positions from
    /// their geographic coordinates under the refitted projection.
    pub fn toggle_fullscreen(&mut self, container: Viewport) -> Viewport {
        let next = self.fullscreen.toggle(self.viewport, container);
        self.viewport = next;
        self.projector.fit_viewport(next);
        self.layout.set_center(next.center());
        for marker in &mut self.markers {
            if let Some(geo) = marker.geo {
                let position = self.projector.project(geo);
                marker.position = position;
                marker.fallback = Some(position);
            }
        }
        next
    }

    pub fn view_at(&self, now: Millis) -> ViewTransform {
        self.view.value_at(now)
    }

    pub fn view_target(&self) -> ViewTransform {
        self.view.target()
    }

    pub fn marker_scale_at(&self, index: usize, now: Millis) -> f64 {
        self.scales
            .get(index)
            .map(|scale| scale.value_at(now))
            .unwrap_or(1.0)
    }

    pub fn marker_opacity_at(&self, index: usize, now: Millis) -> f64 {
        self.opacities
            .get(index)
            .map(|opacity| opacity.value_at(now))
            .unwrap_or(1.0)
    }

    /// Topmost marker under a screen point, accounting for zoom and hover scale.
    pub fn marker_at(&self, screen: ScreenPoint, now: Millis) -> Option<usize> {
        let surface = self.view_at(now).invert(screen);
        self.markers
            .iter()
            .enumerate()
            .rev()
            .find(|(index, marker)| {
                marker.position.distance(surface) <= marker.radius() * self.marker_scale_at(*index, now)
            })
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeoPoint;
    use crate::projection::PlanarProjector;

    fn square() -> RegionBoundary {
        RegionBoundary::from_geojson_str(
            r#"{"type": "Polygon", "coordinates": [[[0, 0], [100, 0], [100, 100], [0, 100], [0, 0]]]}"#,
        )
        .unwrap()
    }

    fn records() -> Vec<ChannelRecord> {
        vec![
            ChannelRecord {
                size: 4.0,
                members_count: Some(40),
                ..ChannelRecord::new("Alpha")
            },
            ChannelRecord {
                size: 3.0,
                logo_url: Some("data:image/png;base64,AA==".to_string()),
                ..ChannelRecord::new("Beta")
            },
        ]
    }

    fn controller() -> MapController<PlanarProjector, ForceLayout> {
        let viewport = Viewport::new(100.0, 100.0);
        MapController::new(
            square(),
            records(),
            PlanarProjector::identity(),
            ForceLayout::new(ScreenPoint::default()),
            viewport,
        )
    }

    #[test]
    fn steps_keep_markers_in_region() {
        let mut controller = controller();
        controller
            .seed(&mut Lcg::new(9), SeedOptions::default())
            .unwrap();
        for _ in 0..100 {
            let report = controller.step();
            assert_eq!(report.committed + report.reverted, 2);
            for marker in controller.markers() {
                let geo = PlanarProjector::identity().invert(marker.position).unwrap();
                assert!(controller.boundary().contains(geo));
            }
        }
    }

    #[test]
    fn hover_scales_marker_and_unhover_restores() {
        let mut controller = controller();
        let tooltip = controller
            .hover(0, ScreenPoint::new(5.0, 5.0), 0.0)
            .cloned()
            .unwrap();
        assert_eq!(tooltip.name, "Alpha");
        assert!((controller.marker_scale_at(0, 300.0) - 1.2).abs() < 1e-12);

        controller.hover(1, ScreenPoint::new(6.0, 6.0), 300.0);
        assert_eq!(controller.hovered(), Some(1));
        assert_eq!(controller.marker_scale_at(0, 600.0), 1.0);

        controller.unhover(600.0);
        assert!(controller.tooltip().is_none());
        assert_eq!(controller.marker_scale_at(1, 900.0), 1.0);
    }

    #[test]
    fn focus_animates_to_scale_four() {
        let mut controller = controller();
        controller.markers[0].commit(ScreenPoint::new(20.0, 30.0), GeoPoint::new(20.0, 30.0));
        let target = controller.focus_marker(0, 0.0).unwrap();
        assert_eq!(target, ViewTransform { x: -30.0, y: -70.0, k: 4.0 });
        assert_eq!(controller.view_at(0.0), ViewTransform::IDENTITY);
        assert_eq!(controller.view_at(750.0), target);
        assert_eq!(controller.focus_marker(9, 0.0), None);
    }

    #[test]
    fn unknown_sidebar_name_is_ignored() {
        let mut controller = controller();
        assert_eq!(controller.select_sidebar("Gamma", 0.0), None);
        assert_eq!(controller.view_target(), ViewTransform::IDENTITY);
    }

    #[test]
    fn reveal_fades_in_within_two_seconds() {
        let mut controller = controller();
        controller.reveal_markers(0.0, &mut Lcg::new(4));
        assert_eq!(controller.marker_opacity_at(0, 0.0), 0.0);
        assert_eq!(controller.marker_opacity_at(0, 2000.0), 1.0);
        assert_eq!(controller.marker_opacity_at(1, 2000.0), 1.0);
    }

    #[test]
    fn marker_at_respects_view_transform() {
        let mut controller = controller();
        controller.markers[1].commit(ScreenPoint::new(50.0, 50.0), GeoPoint::new(50.0, 50.0));
        controller.pan(ScreenPoint::new(10.0, 0.0), 0.0);
        assert_eq!(controller.marker_at(ScreenPoint::new(61.0, 50.0), 0.0), Some(1));
        assert_eq!(controller.marker_at(ScreenPoint::new(50.0, 50.0), 0.0), None);
    }

    #[test]
    fn fullscreen_reprojects_from_geography() {
        let mut controller = MapController::with_mercator(
            RegionBoundary::from_geojson_str(
                r#"{"type": "Polygon", "coordinates": [[[46, 55], [48, 55], [48, 56], [46, 56], [46, 55]]]}"#,
            )
            .unwrap(),
            records(),
            ProjectionParams::default(),
            Viewport::new(800.0, 600.0),
        );
        controller
            .seed(&mut Lcg::new(2), SeedOptions::default())
            .unwrap();
        let geo = controller.markers()[0].geo.unwrap();

        controller.toggle_fullscreen(Viewport::new(1600.0, 1000.0));
        assert!(controller.is_fullscreen());
        assert_eq!(controller.markers()[0].position, controller.projector().project(geo));
        assert_eq!(
            controller.projector().params().translate,
            ScreenPoint::new(800.0, 500.0)
        );
    }
}
