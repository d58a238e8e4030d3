//! Initial in-bounds marker placement by rejection sampling.

use std::error::Error;
use std::fmt;

use crate::boundary::RegionBoundary;
use crate::geometry::{GeoPoint, ScreenBounds, ScreenPoint};
use crate::marker::ChannelMarker;
use crate::projection::Projector;
use crate::rng::Lcg;

const SPACING_FACTOR: f64 = 0.3;
const SPACED_ATTEMPTS_PER_ROUND: u32 = 500;
const SPACING_RELAX: f64 = 1.2;
const SPACED_ROUNDS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedOptions {
    /// Sample cap per marker; `None` keeps sampling until a point qualifies.
    pub max_attempts: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacementError {
    DegenerateBoundary { area: f64 },
    AttemptsExhausted { marker: String, attempts: u64 },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::DegenerateBoundary { area } => {
                write!(f, "boundary cannot hold markers (area {area})")
            }
            PlacementError::AttemptsExhausted { marker, attempts } => {
                write!(f, "no in-bounds point for {marker} after {attempts} samples")
            }
        }
    }
}

impl Error for PlacementError {}

struct Sampler<'a, P: Projector> {
    boundary: &'a RegionBoundary,
    projector: &'a P,
    bounds: ScreenBounds,
}

impl<'a, P: Projector> Sampler<'a, P> {
    fn new(boundary: &'a RegionBoundary, projector: &'a P) -> Result<Self, PlacementError> {
        let area = boundary.area();
        let bounds = boundary.screen_bounds(projector);
        if !(area > 0.0) || bounds.is_empty() || !bounds.min.is_finite() || !bounds.max.is_finite() {
            return Err(PlacementError::DegenerateBoundary { area });
        }
        Ok(Self {
            boundary,
            projector,
            bounds,
        })
    }

    fn sample(&self, rng: &mut Lcg) -> Option<(ScreenPoint, GeoPoint)> {
        let candidate = ScreenPoint::new(
            rng.range_f64(self.bounds.min.x, self.bounds.max.x),
            rng.range_f64(self.bounds.min.y, self.bounds.max.y),
        );
        let geo = self.projector.invert(candidate)?;
        self.boundary.contains(geo).then_some((candidate, geo))
    }

    fn sample_until_inside(
        &self,
        marker: &ChannelMarker,
        rng: &mut Lcg,
        options: SeedOptions,
    ) -> Result<(ScreenPoint, GeoPoint), PlacementError> {
        let mut attempts = 0u64;
        loop {
            if let Some(limit) = options.max_attempts {
                if attempts >= limit {
                    return Err(PlacementError::AttemptsExhausted {
                        marker: marker.name().to_string(),
                        attempts,
                    });
                }
            }
            attempts += 1;
            if let Some(found) = self.sample(rng) {
                return Ok(found);
            }
        }
    }
}

/// Places every marker at a uniformly sampled point inside the region.
///
/// Position and fallback both take the sampled point.
pub fn seed_positions(
    markers: &mut [ChannelMarker],
    boundary: &RegionBoundary,
    projector: &impl Projector,
    rng: &mut Lcg,
    options: SeedOptions,
) -> Result<(), PlacementError> {
    if markers.is_empty() {
        return Ok(());
    }
    let sampler = Sampler::new(boundary, projector)?;
    for marker in markers.iter_mut() {
        let (position, geo) = sampler.sample_until_inside(marker, rng, options)?;
        marker.commit(position, geo);
    }
    Ok(())
}

/// Like [`seed_positions`], but keeps markers `(r_a + r_b) * 0.3` apart.
///
/// Each round tries up to 500 samples; a failed round divides the required
/// spacing by 1.2. After five rounds the marker is placed by plain sampling.
/// The relaxed spacing is applied to the next round's distance check, so a
/// crowded region loosens instead of retrying the same spacing five times.
pub fn seed_spaced(
    markers: &mut [ChannelMarker],
    boundary: &RegionBoundary,
    projector: &impl Projector,
    rng: &mut Lcg,
    options: SeedOptions,
) -> Result<(), PlacementError> {
    if markers.is_empty() {
        return Ok(());
    }
    let sampler = Sampler::new(boundary, projector)?;
    let mut placed: Vec<(ScreenPoint, f64)> = Vec::with_capacity(markers.len());
    for marker in markers.iter_mut() {
        let radius = marker.radius();
        let (position, geo) = match spaced_sample(&sampler, &placed, radius, rng) {
            Some(found) => found,
            None => sampler.sample_until_inside(marker, rng, options)?,
        };
        marker.commit(position, geo);
        placed.push((position, radius));
    }
    Ok(())
}

fn spaced_sample<P: Projector>(
    sampler: &Sampler<'_, P>,
    placed: &[(ScreenPoint, f64)],
    radius: f64,
    rng: &mut Lcg,
) -> Option<(ScreenPoint, GeoPoint)> {
    let mut relax = 1.0;
    for _ in 0..SPACED_ROUNDS {
        for _ in 0..SPACED_ATTEMPTS_PER_ROUND {
            let Some((candidate, geo)) = sampler.sample(rng) else {
                continue;
            };
            let clear = placed.iter().all(|(other, other_radius)| {
                candidate.distance(*other) >= (radius + other_radius) * SPACING_FACTOR / relax
            });
            if clear {
                return Some((candidate, geo));
            }
        }
        relax *= SPACING_RELAX;
    }
    None
}
