//! Hazard zone: the circle searched for incidents around a set of waypoints.

use crate::haversine::haversine_m;
use crate::traits::Point;

/// Widens the bounding circle for detours that swing past the straight-line
/// spread of the waypoints.
pub const HAZARD_RADIUS_FACTOR: f64 = 1.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardZone {
    pub center: Point,
    pub radius_meters: u32,
}

impl HazardZone {
    /// Bounding circle around `waypoints`, or `None` when there are none.
    ///
    /// The center is the plain mean of latitudes and longitudes. That is a
    /// planar approximation: fine at city or region scale, wrong near the
    /// poles and across the antimeridian. A single waypoint yields radius 0.
    /// The radius is rounded up to whole meters.
    pub fn around(waypoints: &[Point]) -> Option<Self> {
        if waypoints.is_empty() {
            return None;
        }

        let n = waypoints.len() as f64;
        let (sum_lat, sum_lon) = waypoints.iter().fold((0.0, 0.0), |(lat, lon), p| {
            (lat + p.latitude, lon + p.longitude)
        });
        let center = Point::new(sum_lat / n, sum_lon / n);

        let max_dist = waypoints
            .iter()
            .map(|p| haversine_m(center, *p))
            .fold(0.0_f64, f64::max);

        Some(Self {
            center,
            radius_meters: (max_dist * HAZARD_RADIUS_FACTOR).ceil() as u32,
        })
    }
}
