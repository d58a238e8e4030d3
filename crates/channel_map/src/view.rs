//! Pan/zoom state of the map group.

use serde::{Deserialize, Serialize};

use crate::geometry::ScreenPoint;
use crate::viewport::Viewport;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 8.0;
pub const FOCUS_ZOOM: f64 = 4.0;
const WHEEL_DELTA_SCALE: f64 = 0.002;

/// `screen = (x, y) + k * surface`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn apply(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.x + self.k * point.x, self.y + self.k * point.y)
    }

    pub fn invert(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new((point.x - self.x) / self.k, (point.y - self.y) / self.k)
    }

    /// `translate(w/2, h/2) · scale(k) · translate(-x, -y)`.
    pub fn centered_on(point: ScreenPoint, viewport: Viewport, k: f64) -> Self {
        let center = viewport.center();
        Self {
            x: center.x - k * point.x,
            y: center.y - k * point.y,
            k,
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Interaction rules for wheel zoom and drag pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBehavior {
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ZoomBehavior {
    fn default() -> Self {
        Self {
            min_scale: MIN_ZOOM,
            max_scale: MAX_ZOOM,
        }
    }
}

impl ZoomBehavior {
    pub fn clamp_scale(&self, k: f64) -> f64 {
        k.clamp(self.min_scale, self.max_scale)
    }

    /// Scales about `anchor` so the surface point under it stays put.
    pub fn scale_about(&self, view: ViewTransform, anchor: ScreenPoint, factor: f64) -> ViewTransform {
        if !factor.is_finite() || factor <= 0.0 {
            return view;
        }
        let k = self.clamp_scale(view.k * factor);
        let surface = view.invert(anchor);
        ViewTransform {
            x: anchor.x - k * surface.x,
            y: anchor.y - k * surface.y,
            k,
        }
    }

    pub fn wheel(&self, view: ViewTransform, anchor: ScreenPoint, delta_y: f64) -> ViewTransform {
        self.scale_about(view, anchor, wheel_factor(delta_y))
    }

    pub fn pan(&self, view: ViewTransform, delta: ScreenPoint) -> ViewTransform {
        ViewTransform {
            x: view.x + delta.x,
            y: view.y + delta.y,
            k: view.k,
        }
    }
}

/// Positive `delta_y` (scrolling down) zooms out.
pub fn wheel_factor(delta_y: f64) -> f64 {
    2f64.powf(-delta_y * WHEEL_DELTA_SCALE)
}
