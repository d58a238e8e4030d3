//! JSON snapshot of a laid-out map.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controller::MapController;
use crate::geometry::{GeoPoint, ScreenPoint};
use crate::layout::Layout;
use crate::presentation::MarkerVisual;
use crate::projection::{MercatorProjection, ProjectionParams};
use crate::transition::Millis;
use crate::view::ViewTransform;
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerExport {
    pub name: String,
    pub position: ScreenPoint,
    pub geo: Option<GeoPoint>,
    pub radius: f64,
    pub visual: MarkerVisual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneExport {
    pub viewport: Viewport,
    pub projection: ProjectionParams,
    pub view: ViewTransform,
    pub boundary: Vec<Vec<ScreenPoint>>,
    pub markers: Vec<MarkerExport>,
}

impl SceneExport {
    pub fn capture<L: Layout>(controller: &MapController<MercatorProjection, L>, now: Millis) -> Self {
        let markers = controller
            .markers()
            .iter()
            .enumerate()
            .filter_map(|(index, marker)| {
                let visual = controller.visual(index)?.clone();
                Some(MarkerExport {
                    name: marker.name().to_string(),
                    position: marker.position,
                    geo: marker.geo,
                    radius: marker.radius(),
                    visual,
                })
            })
            .collect();
        Self {
            viewport: controller.viewport(),
            projection: controller.projector().params(),
            view: controller.view_at(now),
            boundary: controller.boundary_rings(),
            markers,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), String> {
        let content = self
            .to_json_pretty()
            .map_err(|err| format!("serialize scene failed: {err}"))?;
        fs::write(path, content)
            .map_err(|err| format!("write scene failed ({}): {err}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::RegionBoundary;
    use crate::channel::ChannelRecord;
    use crate::rng::Lcg;
    use crate::seeding::SeedOptions;

    #[test]
    fn capture_lists_every_marker_with_its_visual() {
        let boundary = RegionBoundary::from_geojson_str(
            r#"{"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[46, 55], [48, 55], [48, 56], [46, 56], [46, 55]]]}}"#,
        )
        .unwrap();
        let records = vec![
            ChannelRecord::new("plain"),
            ChannelRecord {
                logo_url: Some("data:image/jpeg;base64,AA".to_string()),
                ..ChannelRecord::new("logo")
            },
        ];
        let mut controller = MapController::with_mercator(
            boundary,
            records,
            ProjectionParams::default(),
            Viewport::new(640.0, 480.0),
        );
        controller
            .seed(&mut Lcg::new(1), SeedOptions::default())
            .unwrap();

        let scene = SceneExport::capture(&controller, 0.0);
        assert_eq!(scene.markers.len(), 2);
        assert!(matches!(scene.markers[0].visual, MarkerVisual::Circle { .. }));
        assert!(matches!(scene.markers[1].visual, MarkerVisual::Image { .. }));
        assert!(scene.markers.iter().all(|marker| marker.geo.is_some()));
        assert_eq!(scene.boundary.len(), 1);

        let json = scene.to_json_pretty().unwrap();
        assert!(json.contains("\"kind\": \"circle\""));
        let back: SceneExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.markers[1].name, "logo");
    }
}
