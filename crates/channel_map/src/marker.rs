use crate::channel::ChannelRecord;
use crate::geometry::{GeoPoint, ScreenPoint};
use crate::layout::LayoutNode;

/// A plotted channel: its record plus simulated surface state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMarker {
    pub record: ChannelRecord,
    pub position: ScreenPoint,
    pub velocity: ScreenPoint,
    /// Last committed in-bounds position.
    pub fallback: Option<ScreenPoint>,
    /// Geographic coordinate of the last committed position.
    pub geo: Option<GeoPoint>,
}

impl ChannelMarker {
    pub fn new(record: ChannelRecord) -> Self {
        Self {
            record,
            position: ScreenPoint::default(),
            velocity: ScreenPoint::default(),
            fallback: None,
            geo: None,
        }
    }

    pub fn radius(&self) -> f64 {
        self.record.radius()
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Commits an in-bounds position and remembers it as the fallback.
    pub fn commit(&mut self, position: ScreenPoint, geo: GeoPoint) {
        self.position = position;
        self.fallback = Some(position);
        self.geo = Some(geo);
    }

    /// Discards a rejected move; without a fallback the marker goes to `default`.
    pub fn revert(&mut self, default: ScreenPoint) {
        self.position = self.fallback.unwrap_or(default);
    }

    pub(crate) fn layout_node(&self, collide_factor: f64) -> LayoutNode {
        LayoutNode {
            x: self.position.x,
            y: self.position.y,
            vx: self.velocity.x,
            vy: self.velocity.y,
            collide_radius: self.radius() * collide_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_prefers_fallback_over_default() {
        let mut marker = ChannelMarker::new(ChannelRecord::new("a"));
        marker.position = ScreenPoint::new(50.0, 50.0);
        marker.revert(ScreenPoint::new(10.0, 20.0));
        assert_eq!(marker.position, ScreenPoint::new(10.0, 20.0));

        marker.commit(ScreenPoint::new(3.0, 4.0), GeoPoint::new(0.3, 0.4));
        marker.position = ScreenPoint::new(99.0, 99.0);
        marker.revert(ScreenPoint::new(10.0, 20.0));
        assert_eq!(marker.position, ScreenPoint::new(3.0, 4.0));
        assert_eq!(marker.geo, Some(GeoPoint::new(0.3, 0.4)));
    }
}
