//! Route aggregation: hazard avoidance, engine call and trip normalization.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::avoidance::IncidentAvoidance;
use crate::context::RequestContext;
use crate::error::{PolylineError, RouteError, ValidationError};
use crate::polyline::{Polyline, ROUTE_SHAPE_PRECISION};
use crate::traits::{IncidentSource, Point, RoutingEngine};
use crate::valhalla_types::{
    self as wire, Costing, CostingOptions, EngineRouteRequest, ExcludeLocation, Lane, LocationRequest,
    LocationResponse, Sign,
};

pub const DEFAULT_LANGUAGE: &str = "fr-FR";
pub const DEFAULT_ALTERNATES: u32 = 2;

/// A route calculation as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteRequest {
    /// Waypoints in travel order.
    pub locations: Vec<LocationRequest>,
    /// Caller-supplied points to avoid; incident exclusions are added to these.
    #[serde(default)]
    pub exclude_locations: Vec<Point>,
    pub costing: Costing,
    #[serde(default)]
    pub costing_options: Option<CostingOptions>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub alternates: Option<u32>,
}

impl RouteRequest {
    pub fn new(locations: Vec<LocationRequest>, costing: Costing) -> Self {
        Self {
            locations,
            exclude_locations: Vec::new(),
            costing,
            costing_options: None,
            language: None,
            alternates: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.locations.len() < 2 {
            return Err(ValidationError::TooFewWaypoints {
                count: self.locations.len(),
            });
        }
        if let Some(options) = &self.costing_options {
            options.validate()?;
        }
        Ok(())
    }

    pub fn waypoints(&self) -> Vec<Point> {
        self.locations
            .iter()
            .map(|location| Point::new(location.lat, location.lon))
            .collect()
    }

    /// Engine request with defaults filled in and `exclusions` appended after
    /// the caller's own.
    pub fn into_engine_request(self, exclusions: Vec<Point>) -> EngineRouteRequest {
        let exclude_locations = self
            .exclude_locations
            .into_iter()
            .chain(exclusions)
            .map(|p| ExcludeLocation {
                lat: p.latitude,
                lon: p.longitude,
            })
            .collect();

        EngineRouteRequest {
            locations: self.locations,
            exclude_locations,
            costing: self.costing,
            costing_options: self.costing_options,
            language: self.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            alternates: self.alternates.unwrap_or(DEFAULT_ALTERNATES),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub time: f64,
    pub length: f64,
    pub has_toll: bool,
    pub has_highway: bool,
    pub has_ferry: bool,
    pub has_time_restrictions: bool,
}

impl From<wire::Summary> for Summary {
    fn from(summary: wire::Summary) -> Self {
        Self {
            time: summary.time,
            length: summary.length,
            has_toll: summary.has_toll,
            has_highway: summary.has_highway,
            has_ferry: summary.has_ferry,
            has_time_restrictions: summary.has_time_restrictions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Maneuver {
    #[serde(rename = "type")]
    pub kind: u8,
    pub instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbal_pre_transition_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbal_post_transition_instruction: Option<String>,
    pub street_names: Vec<String>,
    pub time: f64,
    pub length: f64,
    pub begin_shape_index: usize,
    pub end_shape_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roundabout_exit_count: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toll: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highway: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ferry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign: Option<Sign>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lanes: Vec<Lane>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_mode: Option<String>,
}

impl From<wire::Maneuver> for Maneuver {
    fn from(m: wire::Maneuver) -> Self {
        Self {
            kind: m.kind,
            instruction: m.instruction,
            verbal_pre_transition_instruction: m.verbal_pre_transition_instruction,
            verbal_post_transition_instruction: m.verbal_post_transition_instruction,
            street_names: m.street_names.unwrap_or_default(),
            time: m.time,
            length: m.length,
            begin_shape_index: m.begin_shape_index,
            end_shape_index: m.end_shape_index,
            roundabout_exit_count: m.roundabout_exit_count,
            toll: m.toll,
            highway: m.highway,
            ferry: m.ferry,
            sign: m.sign,
            lanes: m.lanes,
            travel_mode: m.travel_mode,
        }
    }
}

/// The part of a trip between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub maneuvers: Vec<Maneuver>,
    pub summary: Summary,
    pub shape: Vec<Point>,
}

/// One itinerary, primary or alternate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub locations: Vec<LocationResponse>,
    pub legs: Vec<Leg>,
    pub summary: Summary,
}

/// Orchestrates one route calculation against the injected collaborators.
pub struct RouteAggregator<'a, R: RoutingEngine, I: IncidentSource> {
    engine: &'a R,
    avoidance: IncidentAvoidance<'a, I>,
}

impl<'a, R: RoutingEngine, I: IncidentSource> RouteAggregator<'a, R, I> {
    pub fn new(engine: &'a R, incidents: &'a I) -> Self {
        Self {
            engine,
            avoidance: IncidentAvoidance::new(incidents),
        }
    }

    /// Primary trip first, then the alternates in the engine's order.
    #[tracing::instrument(skip_all, fields(waypoints = request.locations.len(), costing = %request.costing))]
    pub fn calculate_route(&self, ctx: &RequestContext, request: RouteRequest) -> Result<Vec<Trip>, RouteError> {
        request.validate()?;

        let exclusions = self.avoidance.exclusions(ctx, &request.waypoints());
        let engine_request = request.into_engine_request(exclusions);
        tracing::debug!(
            exclusions = engine_request.exclude_locations.len(),
            alternates = engine_request.alternates,
            "requesting route"
        );

        let response = self.engine.calculate_route(ctx, &engine_request)?;
        // A reply that lands after cancellation is not returned.
        ctx.remaining()?;

        let trips: Vec<wire::Trip> = std::iter::once(response.trip)
            .chain(response.alternates.into_iter().map(|alternate| alternate.trip))
            .collect();

        // Collected in index order so the lowest failing trip is reported.
        let normalized: Vec<Result<Trip, RouteError>> = trips
            .into_par_iter()
            .enumerate()
            .map(|(index, trip)| normalize_trip(index, trip))
            .collect();
        normalized.into_iter().collect()
    }
}

fn normalize_trip(index: usize, trip: wire::Trip) -> Result<Trip, RouteError> {
    let legs = trip
        .legs
        .into_iter()
        .enumerate()
        .map(|(leg, raw)| {
            normalize_leg(raw).map_err(|source| RouteError::Geometry {
                trip: index,
                leg,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Trip {
        locations: trip.locations,
        legs,
        summary: trip.summary.into(),
    })
}

fn normalize_leg(leg: wire::Leg) -> Result<Leg, PolylineError> {
    let shape = Polyline::decode(&leg.shape, ROUTE_SHAPE_PRECISION)?.into_points();

    Ok(Leg {
        maneuvers: leg.maneuvers.into_iter().map(Maneuver::from).collect(),
        summary: leg.summary.into(),
        shape,
    })
}
