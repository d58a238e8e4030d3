use std::path::PathBuf;

use channel_map::{
    load_map_inputs, sidebar_entries, ChannelRecord, GeoPoint, Layout, LayoutNode, Lcg,
    MapController, MarkerAppearance, MarkerVisual, ProjectionParams, Projector, RegionBoundary,
    SceneExport, ScreenPoint, SeedOptions, StepReport, Viewport,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Never moves anything.
struct FrozenLayout;

impl Layout for FrozenLayout {
    fn tick(&mut self, _nodes: &mut [LayoutNode]) {}

    fn set_center(&mut self, _center: ScreenPoint) {}

    fn is_settled(&self) -> bool {
        true
    }
}

/// Pushes every node toward a fixed point regardless of the region.
struct DriftLayout {
    target: ScreenPoint,
}

impl Layout for DriftLayout {
    fn tick(&mut self, nodes: &mut [LayoutNode]) {
        for node in nodes {
            node.x += (self.target.x - node.x) * 0.5;
            node.y += (self.target.y - node.y) * 0.5;
        }
    }

    fn set_center(&mut self, center: ScreenPoint) {
        self.target = center;
    }

    fn is_settled(&self) -> bool {
        false
    }
}

/// Ten pixels per degree, north up, latitude 0 at y = 1000.
#[derive(Clone, Copy)]
struct TenPixelProjector;

impl Projector for TenPixelProjector {
    fn project(&self, point: GeoPoint) -> ScreenPoint {
        ScreenPoint::new(point.lon * 10.0, 1000.0 - point.lat * 10.0)
    }

    fn invert(&self, point: ScreenPoint) -> Option<GeoPoint> {
        Some(GeoPoint::new(point.x / 10.0, (1000.0 - point.y) / 10.0))
    }
}

fn triangle() -> RegionBoundary {
    RegionBoundary::from_geojson_str(
        r#"{"type": "Polygon", "coordinates": [[[0, 0], [40, 0], [0, 40], [0, 0]]]}"#,
    )
    .unwrap()
}

#[test]
fn frozen_layout_commits_every_seeded_marker() {
    let records = (0..6)
        .map(|index| ChannelRecord {
            size: 0.001,
            ..ChannelRecord::new(format!("c{index}"))
        })
        .collect();
    let mut controller = MapController::new(
        triangle(),
        records,
        TenPixelProjector,
        FrozenLayout,
        Viewport::new(400.0, 1000.0),
    );
    controller
        .seed(&mut Lcg::new(77), SeedOptions::default())
        .unwrap();
    let seeded: Vec<_> = controller.markers().iter().map(|m| m.position).collect();

    let report = controller.step();
    assert_eq!(
        report,
        StepReport {
            committed: 6,
            reverted: 0
        }
    );
    for (before, marker) in seeded.iter().zip(controller.markers()) {
        assert!(before.distance(marker.position) <= 0.001);
    }
}

#[test]
fn drift_out_of_region_is_reverted() {
    // The triangle's right-angle corner is at screen (0, 1000); the drift
    // target sits on the far side of the hypotenuse.
    let records = vec![ChannelRecord::new("drifter")];
    let mut controller = MapController::new(
        triangle(),
        records,
        TenPixelProjector,
        DriftLayout {
            target: ScreenPoint::default(),
        },
        Viewport::new(800.0, 1200.0),
    );
    controller
        .seed(&mut Lcg::new(5), SeedOptions::default())
        .unwrap();

    let mut reverted = 0;
    for _ in 0..20 {
        reverted += controller.step().reverted;
        let marker = &controller.markers()[0];
        let geo = TenPixelProjector.invert(marker.position).unwrap();
        assert!(controller.boundary().contains(geo));
    }
    assert!(reverted > 0);
}

#[test]
fn logo_and_circle_appearance_follow_records() {
    let inputs = load_map_inputs(&fixture("boundary.json"), &fixture("channels.json")).unwrap();
    let controller = MapController::with_mercator(
        inputs.boundary,
        inputs.records,
        ProjectionParams::default(),
        Viewport::default(),
    );

    let with_logo = controller.visual(0).unwrap();
    assert!(matches!(with_logo, MarkerVisual::Image { .. }));
    assert_eq!(
        with_logo.appearance(),
        MarkerAppearance {
            image_visible: true,
            circle_visible: false
        }
    );
    let without_logo = controller.visual(1).unwrap();
    assert!(matches!(without_logo, MarkerVisual::Circle { .. }));
    assert_eq!(
        without_logo.appearance(),
        MarkerAppearance {
            image_visible: false,
            circle_visible: true
        }
    );
}

#[test]
fn fixture_map_settles_and_exports_inside_region() {
    let inputs = load_map_inputs(&fixture("boundary.json"), &fixture("channels.json")).unwrap();
    let entries = sidebar_entries(&inputs.records);
    let mut controller = MapController::with_mercator(
        inputs.boundary,
        inputs.records,
        ProjectionParams::default(),
        Viewport::new(960.0, 640.0),
    );
    controller
        .seed(&mut Lcg::new(0x5eed), SeedOptions::default())
        .unwrap();

    let mut ticks = 0;
    while !controller.is_settled() {
        controller.step();
        ticks += 1;
        assert!(ticks < 1_000);
    }

    let scene = SceneExport::capture(&controller, 0.0);
    assert_eq!(scene.markers.len(), 3);
    for marker in &scene.markers {
        assert!(controller.boundary().contains(marker.geo.unwrap()));
    }

    assert_eq!(entries[0].title, "Городские новости");
    let focused = controller.select_sidebar(&entries[0].title, 0.0).unwrap();
    assert_eq!(focused.k, 4.0);
}

#[test]
fn empty_channel_list_settles() {
    let inputs =
        load_map_inputs(&fixture("boundary.json"), &fixture("empty_channels.json")).unwrap();
    assert!(inputs.records.is_empty());
    let mut controller = MapController::with_mercator(
        inputs.boundary,
        inputs.records,
        ProjectionParams::default(),
        Viewport::default(),
    );
    controller
        .seed(&mut Lcg::new(1), SeedOptions::default())
        .unwrap();

    let mut ticks = 0;
    while !controller.is_settled() {
        assert_eq!(controller.step(), StepReport::default());
        ticks += 1;
        assert!(ticks < 1_000);
    }
}
