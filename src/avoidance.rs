//! Converts live incidents around a route into routing exclusion points.

use crate::context::RequestContext;
use crate::hazard::HazardZone;
use crate::traits::{IncidentSource, Point};

/// Looks up incidents inside the hazard zone of a waypoint list.
///
/// Incident source failures never fail the route: they are logged and the
/// route is computed without avoidance.
pub struct IncidentAvoidance<'a, I: IncidentSource> {
    source: &'a I,
}

impl<'a, I: IncidentSource> IncidentAvoidance<'a, I> {
    pub fn new(source: &'a I) -> Self {
        Self { source }
    }

    /// Locations of the incidents to route around, possibly empty.
    pub fn exclusions(&self, ctx: &RequestContext, waypoints: &[Point]) -> Vec<Point> {
        let Some(zone) = HazardZone::around(waypoints) else {
            return Vec::new();
        };

        let incidents = match self.source.incidents_in_radius(
            ctx,
            zone.center.latitude,
            zone.center.longitude,
            zone.radius_meters,
        ) {
            Ok(incidents) => incidents,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    center_lat = zone.center.latitude,
                    center_lon = zone.center.longitude,
                    radius_m = zone.radius_meters,
                    "incident lookup failed, routing without avoidance"
                );
                return Vec::new();
            }
        };

        tracing::debug!(
            count = incidents.len(),
            radius_m = zone.radius_meters,
            "incidents found in hazard zone"
        );

        incidents.iter().map(|incident| incident.location()).collect()
    }
}
