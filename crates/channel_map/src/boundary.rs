//! Region boundary parsed from GeoJSON, used for containment and drawing.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::geometry::{GeoPoint, ScreenBounds, ScreenPoint};
use crate::projection::Projector;

const EDGE_EPSILON: f64 = 1e-12;
const MIN_RING_POINTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    Io { path: String, message: String },
    Json(String),
    MissingPolygon,
    InvalidRing { reason: String },
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryError::Io { path, message } => {
                write!(f, "read boundary failed ({path}): {message}")
            }
            BoundaryError::Json(message) => write!(f, "boundary json invalid: {message}"),
            BoundaryError::MissingPolygon => write!(f, "no polygon geometry in boundary"),
            BoundaryError::InvalidRing { reason } => write!(f, "invalid boundary ring: {reason}"),
        }
    }
}

impl Error for BoundaryError {}

impl From<serde_json::Error> for BoundaryError {
    fn from(error: serde_json::Error) -> Self {
        BoundaryError::Json(error.to_string())
    }
}

/// Closed ring of vertices; the closing vertex is not repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<GeoPoint>,
}

impl Ring {
    pub fn new(mut points: Vec<GeoPoint>) -> Result<Self, BoundaryError> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < MIN_RING_POINTS {
            return Err(BoundaryError::InvalidRing {
                reason: format!("ring needs at least {MIN_RING_POINTS} vertices"),
            });
        }
        if points
            .iter()
            .any(|point| !point.lon.is_finite() || !point.lat.is_finite())
        {
            return Err(BoundaryError::InvalidRing {
                reason: "non-finite coordinate".to_string(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let count = self.points.len();
        (0..count).map(move |index| (self.points[index], self.points[(index + 1) % count]))
    }

    fn on_edge(&self, point: GeoPoint) -> bool {
        self.edges().any(|(a, b)| point_on_segment(point, a, b))
    }

    /// Even-odd ray cast; edge points are reported separately.
    fn encloses(&self, point: GeoPoint) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.lat > point.lat) != (b.lat > point.lat) {
                let cross_lon = a.lon + (point.lat - a.lat) / (b.lat - a.lat) * (b.lon - a.lon);
                if point.lon < cross_lon {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.lon * b.lat - b.lon * a.lat)
            .sum::<f64>()
            / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    fn contains(&self, point: GeoPoint) -> bool {
        if self.exterior.on_edge(point) {
            return true;
        }
        if !self.exterior.encloses(point) {
            return false;
        }
        self.holes
            .iter()
            .all(|hole| hole.on_edge(point) || !hole.encloses(point))
    }

    fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|hole| hole.signed_area().abs()).sum();
        (self.exterior.signed_area().abs() - holes).max(0.0)
    }
}

/// Static region outline. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBoundary {
    polygons: Vec<Polygon>,
}

impl RegionBoundary {
    pub fn new(polygons: Vec<Polygon>) -> Result<Self, BoundaryError> {
        if polygons.is_empty() {
            return Err(BoundaryError::MissingPolygon);
        }
        Ok(Self { polygons })
    }

    pub fn load(path: &Path) -> Result<Self, BoundaryError> {
        let content = fs::read_to_string(path).map_err(|err| BoundaryError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_geojson_str(&content)
    }

    pub fn from_geojson_str(content: &str) -> Result<Self, BoundaryError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_geojson_value(&value)
    }

    /// Uses the first polygonal geometry found in the document.
    pub fn from_geojson_value(value: &Value) -> Result<Self, BoundaryError> {
        let geometry = find_polygonal_geometry(value).ok_or(BoundaryError::MissingPolygon)?;
        let polygons = parse_polygonal_geometry(geometry)?;
        Self::new(polygons)
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Boundary-inclusive containment test in geographic coordinates.
    pub fn contains(&self, point: GeoPoint) -> bool {
        if !point.lon.is_finite() || !point.lat.is_finite() {
            return false;
        }
        self.polygons.iter().any(|polygon| polygon.contains(point))
    }

    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Projected bounding box of every exterior ring.
    pub fn screen_bounds(&self, projector: &impl Projector) -> ScreenBounds {
        let mut bounds = ScreenBounds::empty();
        for polygon in &self.polygons {
            for point in polygon.exterior.points() {
                bounds.include(projector.project(*point));
            }
        }
        bounds
    }

    /// Projected rings (exteriors and holes) ready for drawing as closed paths.
    pub fn screen_rings(&self, projector: &impl Projector) -> Vec<Vec<ScreenPoint>> {
        self.polygons
            .iter()
            .flat_map(|polygon| std::iter::once(&polygon.exterior).chain(polygon.holes.iter()))
            .map(|ring| {
                ring.points()
                    .iter()
                    .map(|point| projector.project(*point))
                    .collect()
            })
            .collect()
    }
}

fn point_on_segment(point: GeoPoint, a: GeoPoint, b: GeoPoint) -> bool {
    let cross = (b.lon - a.lon) * (point.lat - a.lat) - (b.lat - a.lat) * (point.lon - a.lon);
    let span = ((b.lon - a.lon).abs() + (b.lat - a.lat).abs()).max(1.0);
    if cross.abs() > EDGE_EPSILON * span {
        return false;
    }
    point.lon >= a.lon.min(b.lon) - EDGE_EPSILON
        && point.lon <= a.lon.max(b.lon) + EDGE_EPSILON
        && point.lat >= a.lat.min(b.lat) - EDGE_EPSILON
        && point.lat <= a.lat.max(b.lat) + EDGE_EPSILON
}

fn find_polygonal_geometry(value: &Value) -> Option<&Value> {
    match value {
        // Some generators wrap the feature list one level deeper.
        Value::Array(items) => items.iter().find_map(find_polygonal_geometry),
        Value::Object(object) => match object.get("type").and_then(Value::as_str) {
            Some("Polygon") | Some("MultiPolygon") => Some(value),
            Some("Feature") => object.get("geometry").and_then(find_polygonal_geometry),
            Some("FeatureCollection") => object.get("features").and_then(find_polygonal_geometry),
            Some("GeometryCollection") => {
                object.get("geometries").and_then(find_polygonal_geometry)
            }
            _ => None,
        },
        _ => None,
    }
}

fn parse_polygonal_geometry(geometry: &Value) -> Result<Vec<Polygon>, BoundaryError> {
    let coordinates = geometry
        .get("coordinates")
        .ok_or(BoundaryError::MissingPolygon)?;
    match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => Ok(vec![parse_polygon(coordinates)?]),
        Some("MultiPolygon") => as_array(coordinates, "multipolygon")?
            .iter()
            .map(parse_polygon)
            .collect(),
        _ => Err(BoundaryError::MissingPolygon),
    }
}

fn parse_polygon(value: &Value) -> Result<Polygon, BoundaryError> {
    let mut rings = as_array(value, "polygon")?
        .iter()
        .map(parse_ring)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let exterior = rings.next().ok_or_else(|| BoundaryError::InvalidRing {
        reason: "polygon without exterior ring".to_string(),
    })?;
    Ok(Polygon {
        exterior,
        holes: rings.collect(),
    })
}

fn parse_ring(value: &Value) -> Result<Ring, BoundaryError> {
    let points = as_array(value, "ring")?
        .iter()
        .map(|position| {
            let pair = as_array(position, "position")?;
            match (
                pair.first().and_then(Value::as_f64),
                pair.get(1).and_then(Value::as_f64),
            ) {
                (Some(lon), Some(lat)) => Ok(GeoPoint::new(lon, lat)),
                _ => Err(BoundaryError::InvalidRing {
                    reason: "position needs numeric lon and lat".to_string(),
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ring::new(points)
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, BoundaryError> {
    value.as_array().ok_or_else(|| BoundaryError::InvalidRing {
        reason: format!("{what} is not an array"),
    })
}
