//! Geo ↔ surface conversion.
//!
//! Everything that needs to turn a geographic coordinate into a pixel goes
//! through [`Projector`], so tests can swap the Mercator projection for a
//! plain affine mapping.

use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::geometry::{GeoPoint, ScreenPoint};
use crate::viewport::Viewport;

pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lon: 47.0,
    lat: 55.5,
};
pub const DEFAULT_SCALE: f64 = 8000.0;

// Mercator is unbounded at the poles; keep inverted latitudes finite.
const MAX_MERCATOR_LAT_RAD: f64 = 1.484_422_229_745_332;

pub trait Projector {
    fn project(&self, point: GeoPoint) -> ScreenPoint;

    /// Returns `None` when the surface point has no geographic counterpart.
    fn invert(&self, point: ScreenPoint) -> Option<GeoPoint>;

    /// Re-derives surface-dependent parameters after a resize.
    fn fit_viewport(&mut self, _viewport: Viewport) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub center: GeoPoint,
    pub scale: f64,
    pub translate: ScreenPoint,
}

impl ProjectionParams {
    pub fn for_viewport(center: GeoPoint, scale: f64, viewport: Viewport) -> Self {
        Self {
            center,
            scale,
            translate: viewport.center(),
        }
    }
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self::for_viewport(DEFAULT_CENTER, DEFAULT_SCALE, Viewport::default())
    }
}

/// Spherical Mercator with a geographic center, a pixel scale and a pixel
/// translation of that center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjection {
    params: ProjectionParams,
    center_raw_y: f64,
}

impl MercatorProjection {
    pub fn new(params: ProjectionParams) -> Self {
        Self {
            params,
            center_raw_y: mercator_y(params.center.lat.to_radians()),
        }
    }

    pub fn params(&self) -> ProjectionParams {
        self.params
    }

    pub fn set_params(&mut self, params: ProjectionParams) {
        *self = Self::new(params);
    }
}

impl Default for MercatorProjection {
    fn default() -> Self {
        Self::new(ProjectionParams::default())
    }
}

impl Projector for MercatorProjection {
    fn project(&self, point: GeoPoint) -> ScreenPoint {
        let ProjectionParams {
            center,
            scale,
            translate,
        } = self.params;
        let lat = point.lat.to_radians().clamp(-MAX_MERCATOR_LAT_RAD, MAX_MERCATOR_LAT_RAD);
        ScreenPoint::new(
            translate.x + scale * (point.lon - center.lon).to_radians(),
            translate.y - scale * (mercator_y(lat) - self.center_raw_y),
        )
    }

    fn invert(&self, point: ScreenPoint) -> Option<GeoPoint> {
        let ProjectionParams {
            center,
            scale,
            translate,
        } = self.params;
        if !point.is_finite() || scale == 0.0 || !scale.is_finite() {
            return None;
        }
        let lon = center.lon + ((point.x - translate.x) / scale).to_degrees();
        let raw_y = (translate.y - point.y) / scale + self.center_raw_y;
        let lat = (2.0 * raw_y.exp().atan() - FRAC_PI_2).to_degrees();
        let geo = GeoPoint::new(lon, lat);
        (geo.lon.is_finite() && geo.lat.is_finite()).then_some(geo)
    }

    /// Keeps center and scale, moves the translation to the new surface center.
    fn fit_viewport(&mut self, viewport: Viewport) {
        let params = ProjectionParams::for_viewport(self.params.center, self.params.scale, viewport);
        self.set_params(params);
    }
}

fn mercator_y(lat_rad: f64) -> f64 {
    (FRAC_PI_4 + lat_rad / 2.0).tan().ln()
}

/// Axis-aligned affine mapping: `screen = offset + scale * (lon, lat)`.
///
/// Useful for planar boundaries and as a deterministic stand-in for Mercator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarProjector {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset: ScreenPoint,
}

impl PlanarProjector {
    pub fn new(scale_x: f64, scale_y: f64, offset: ScreenPoint) -> Self {
        Self {
            scale_x,
            scale_y,
            offset,
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 1.0, ScreenPoint::default())
    }
}

impl Projector for PlanarProjector {
    fn project(&self, point: GeoPoint) -> ScreenPoint {
        ScreenPoint::new(
            self.offset.x + self.scale_x * point.lon,
            self.offset.y + self.scale_y * point.lat,
        )
    }

    fn invert(&self, point: ScreenPoint) -> Option<GeoPoint> {
        if self.scale_x == 0.0 || self.scale_y == 0.0 || !point.is_finite() {
            return None;
        }
        Some(GeoPoint::new(
            (point.x - self.offset.x) / self.scale_x,
            (point.y - self.offset.y) / self.scale_y,
        ))
    }
}
