use serde::{Deserialize, Serialize};

use crate::geometry::ScreenPoint;

const DEFAULT_VIEWPORT_WIDTH: f64 = 960.0;
const DEFAULT_VIEWPORT_HEIGHT: f64 = 640.0;

/// Pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

/// Remembers the windowed surface size while fullscreen is active.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FullscreenToggle {
    windowed: Option<Viewport>,
}

impl FullscreenToggle {
    pub fn is_active(&self) -> bool {
        self.windowed.is_some()
    }

    /// Flips the mode and returns the surface size to use next.
    ///
    /// Entering adopts `container`; leaving restores the size that was
    /// current when fullscreen was entered.
    pub fn toggle(&mut self, current: Viewport, container: Viewport) -> Viewport {
        match self.windowed.take() {
            Some(windowed) => windowed,
            None => {
                self.windowed = Some(current);
                container
            }
        }
    }
}
