//! Core value types and the capability traits for upstream services.
//!
//! The gateway only ever talks to its collaborators through these traits, so
//! the HTTP adapters can be swapped for test doubles.

use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::error::UpstreamError;
use crate::incidents::Incident;
use crate::nominatim::{GeocodeResult, ReverseResult};
use crate::valhalla_types::{EngineRouteRequest, EngineRouteResponse};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
}

impl Point {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Forward and reverse address lookup.
pub trait Geocoder {
    fn search(&self, ctx: &RequestContext, query: &str) -> Result<Vec<GeocodeResult>, UpstreamError>;

    fn reverse(&self, ctx: &RequestContext, lat: f64, lon: f64) -> Result<ReverseResult, UpstreamError>;
}

/// Turn-by-turn routing with alternates.
pub trait RoutingEngine {
    fn calculate_route(
        &self,
        ctx: &RequestContext,
        request: &EngineRouteRequest,
    ) -> Result<EngineRouteResponse, UpstreamError>;
}

/// Live traffic incidents around a location.
pub trait IncidentSource {
    fn incidents_in_radius(
        &self,
        ctx: &RequestContext,
        lat: f64,
        lon: f64,
        radius_meters: u32,
    ) -> Result<Vec<Incident>, UpstreamError>;
}
