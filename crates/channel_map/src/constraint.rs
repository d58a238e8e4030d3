//! Accept/reject rule keeping markers inside the region.

use crate::boundary::RegionBoundary;
use crate::geometry::{ScreenBounds, ScreenPoint};
use crate::marker::ChannelMarker;
use crate::projection::Projector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepVerdict {
    Committed,
    Reverted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub committed: usize,
    pub reverted: usize,
}

impl StepReport {
    pub fn record(&mut self, verdict: StepVerdict) {
        match verdict {
            StepVerdict::Committed => self.committed += 1,
            StepVerdict::Reverted => self.reverted += 1,
        }
    }
}

/// Per-step view of the boundary: its projected box and the surface center
/// used when a marker has no fallback yet.
pub struct BoundaryConstraint<'a, P: Projector> {
    boundary: &'a RegionBoundary,
    projector: &'a P,
    bounds: ScreenBounds,
    surface_center: ScreenPoint,
}

impl<'a, P: Projector> BoundaryConstraint<'a, P> {
    pub fn new(boundary: &'a RegionBoundary, projector: &'a P, surface_center: ScreenPoint) -> Self {
        Self {
            boundary,
            projector,
            bounds: boundary.screen_bounds(projector),
            surface_center,
        }
    }

    pub fn bounds(&self) -> ScreenBounds {
        self.bounds
    }

    /// Clamps `proposed` into the box inset by the marker radius, then
    /// commits it when its geographic counterpart lies in the region;
    /// otherwise the marker returns to its fallback.
    pub fn apply(&self, marker: &mut ChannelMarker, proposed: ScreenPoint) -> StepVerdict {
        let clamped = self.bounds.clamp_inset(proposed, marker.radius());
        match self.projector.invert(clamped) {
            Some(geo) if self.boundary.contains(geo) => {
                marker.commit(clamped, geo);
                StepVerdict::Committed
            }
            _ => {
                marker.revert(self.surface_center);
                StepVerdict::Reverted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelRecord;
    use crate::geometry::GeoPoint;
    use crate::projection::PlanarProjector;

    fn triangle() -> RegionBoundary {
        RegionBoundary::from_geojson_str(
            r#"{"type": "Polygon", "coordinates": [[[0, 0], [100, 0], [0, 100], [0, 0]]]}"#,
        )
        .unwrap()
    }

    fn marker(radius: f64) -> ChannelMarker {
        ChannelMarker::new(ChannelRecord {
            size: radius,
            ..ChannelRecord::new("m")
        })
    }

    #[test]
    fn inside_point_is_committed_and_remembered() {
        let boundary = triangle();
        let projector = PlanarProjector::identity();
        let constraint = BoundaryConstraint::new(&boundary, &projector, ScreenPoint::new(50.0, 50.0));
        let mut marker = marker(2.0);

        let verdict = constraint.apply(&mut marker, ScreenPoint::new(10.0, 20.0));
        assert_eq!(verdict, StepVerdict::Committed);
        assert_eq!(marker.position, ScreenPoint::new(10.0, 20.0));
        assert_eq!(marker.fallback, Some(ScreenPoint::new(10.0, 20.0)));
        assert_eq!(marker.geo, Some(GeoPoint::new(10.0, 20.0)));
    }

    #[test]
    fn raw_position_is_clamped_by_radius_first() {
        let boundary = triangle();
        let projector = PlanarProjector::identity();
        let constraint = BoundaryConstraint::new(&boundary, &projector, ScreenPoint::default());
        let mut marker = marker(5.0);

        let verdict = constraint.apply(&mut marker, ScreenPoint::new(-40.0, 10.0));
        assert_eq!(verdict, StepVerdict::Committed);
        assert_eq!(marker.position, ScreenPoint::new(5.0, 10.0));
    }

    #[test]
    fn outside_point_reverts_to_fallback() {
        let boundary = triangle();
        let projector = PlanarProjector::identity();
        let constraint = BoundaryConstraint::new(&boundary, &projector, ScreenPoint::new(1.0, 1.0));
        let mut marker = marker(1.0);
        marker.commit(ScreenPoint::new(10.0, 10.0), GeoPoint::new(10.0, 10.0));

        let verdict = constraint.apply(&mut marker, ScreenPoint::new(80.0, 80.0));
        assert_eq!(verdict, StepVerdict::Reverted);
        assert_eq!(marker.position, ScreenPoint::new(10.0, 10.0));
        assert_eq!(marker.geo, Some(GeoPoint::new(10.0, 10.0)));
    }

    #[test]
    fn outside_point_without_fallback_goes_to_surface_center() {
        let boundary = triangle();
        let projector = PlanarProjector::identity();
        let constraint =
            BoundaryConstraint::new(&boundary, &projector, ScreenPoint::new(30.0, 30.0));
        let mut marker = marker(1.0);

        let verdict = constraint.apply(&mut marker, ScreenPoint::new(90.0, 90.0));
        assert_eq!(verdict, StepVerdict::Reverted);
        assert_eq!(marker.position, ScreenPoint::new(30.0, 30.0));
        assert_eq!(marker.fallback, None);
    }
}
