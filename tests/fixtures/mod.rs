//! Test fixtures for route-gateway.
//!
//! Provides:
//! - Real Caen / Calvados locations (from OpenStreetMap)
//! - Scripted doubles for the routing engine and the incident source
//! - Builders for routing engine responses

#![allow(dead_code)]

pub mod caen_locations;

pub use caen_locations::*;

use std::cell::RefCell;

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use route_gateway::context::RequestContext;
use route_gateway::error::{Upstream, UpstreamError};
use route_gateway::incidents::Incident;
use route_gateway::polyline::{Polyline, ROUTE_SHAPE_PRECISION};
use route_gateway::traits::{IncidentSource, Point, RoutingEngine};
use route_gateway::valhalla_types::{EngineRouteRequest, EngineRouteResponse};

// ============================================================================
// Routing engine double
// ============================================================================

/// Routing engine that records every request and replays a canned outcome.
pub struct ScriptedEngine {
    response: Result<Value, u16>,
    cancel_during_call: bool,
    pub requests: RefCell<Vec<EngineRouteRequest>>,
}

impl ScriptedEngine {
    pub fn responding(response: Value) -> Self {
        Self {
            response: Ok(response),
            cancel_during_call: false,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            response: Err(status),
            cancel_during_call: false,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Replies successfully, but the caller cancels while the call is out.
    pub fn cancelled_mid_call(response: Value) -> Self {
        Self {
            cancel_during_call: true,
            ..Self::responding(response)
        }
    }

    pub fn last_request(&self) -> EngineRouteRequest {
        self.requests.borrow().last().cloned().expect("engine was called")
    }
}

impl RoutingEngine for ScriptedEngine {
    fn calculate_route(
        &self,
        ctx: &RequestContext,
        request: &EngineRouteRequest,
    ) -> Result<EngineRouteResponse, UpstreamError> {
        ctx.remaining()?;
        self.requests.borrow_mut().push(request.clone());
        if self.cancel_during_call {
            ctx.cancel();
        }
        match &self.response {
            Ok(body) => Ok(serde_json::from_value(body.clone()).expect("valid engine response")),
            Err(status) => Err(UpstreamError::Status {
                service: Upstream::RoutingEngine,
                status: *status,
                message: Some("No path could be found for input".to_string()),
            }),
        }
    }
}

// ============================================================================
// Incident source double
// ============================================================================

pub struct ScriptedIncidents {
    incidents: Option<Vec<Incident>>,
    pub calls: RefCell<Vec<(f64, f64, u32)>>,
}

impl ScriptedIncidents {
    pub fn with(points: &[Point]) -> Self {
        let incidents = points
            .iter()
            .enumerate()
            .map(|(i, p)| incident(i as i64 + 1, *p))
            .collect();
        Self {
            incidents: Some(incidents),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn none() -> Self {
        Self::with(&[])
    }

    /// Every lookup fails as if the incident service were down.
    pub fn unavailable() -> Self {
        Self {
            incidents: None,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl IncidentSource for ScriptedIncidents {
    fn incidents_in_radius(
        &self,
        _ctx: &RequestContext,
        lat: f64,
        lon: f64,
        radius_meters: u32,
    ) -> Result<Vec<Incident>, UpstreamError> {
        self.calls.borrow_mut().push((lat, lon, radius_meters));
        self.incidents.clone().ok_or(UpstreamError::Status {
            service: Upstream::IncidentSource,
            status: 503,
            message: None,
        })
    }
}

pub fn incident(id: i64, at: Point) -> Incident {
    let reported = Utc.with_ymd_and_hms(2025, 3, 10, 8, 15, 0).unwrap();
    Incident {
        id,
        user: None,
        kind: None,
        lat: at.latitude,
        lon: at.longitude,
        created_at: reported,
        updated_at: reported,
        deleted_at: None,
        distance: 0.0,
    }
}

// ============================================================================
// Engine response builders
// ============================================================================

/// A trip whose legs follow `stops`; `length` tags the trip for ordering checks.
pub fn trip_json(stops: &[Location], length: f64) -> Value {
    let legs: Vec<Value> = stops
        .windows(2)
        .map(|pair| {
            let shape = Polyline::new(vec![pair[0].point(), pair[1].point()]).encode(ROUTE_SHAPE_PRECISION);
            leg_json(&shape, pair[1].name)
        })
        .collect();

    let locations: Vec<Value> = stops
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            json!({
                "lat": stop.lat,
                "lon": stop.lng,
                "type": "break",
                "original_index": i,
                "name": stop.name,
            })
        })
        .collect();

    json!({
        "locations": locations,
        "legs": legs,
        "summary": {
            "has_time_restrictions": false,
            "has_toll": false,
            "has_highway": true,
            "has_ferry": false,
            "min_lat": 49.0,
            "min_lon": -0.7,
            "max_lat": 49.3,
            "max_lon": -0.2,
            "time": length * 60.0,
            "length": length,
            "cost": length * 70.0,
        },
        "status_message": "Found route between points",
        "status": 0,
        "units": "kilometers",
        "language": "fr-FR",
    })
}

pub fn leg_json(shape: &str, destination: &str) -> Value {
    json!({
        "maneuvers": [
            {
                "type": 1,
                "instruction": "Conduisez vers le nord.",
                "street_names": ["Rue Saint-Pierre"],
                "time": 30.5,
                "length": 0.4,
                "begin_shape_index": 0,
                "end_shape_index": 1,
                "travel_mode": "drive",
                "travel_type": "car",
            },
            {
                "type": 26,
                "instruction": "Prenez le rond-point.",
                "time": 12.0,
                "length": 0.1,
                "begin_shape_index": 1,
                "end_shape_index": 1,
                "roundabout_exit_count": 2,
                "lanes": [{"directions": 4, "valid": 4}],
                "travel_mode": "drive",
                "travel_type": "car",
            },
            {
                "type": 4,
                "instruction": format!("Vous êtes arrivé à {}.", destination),
                "time": 0.0,
                "length": 0.0,
                "begin_shape_index": 1,
                "end_shape_index": 1,
                "travel_mode": "drive",
                "travel_type": "car",
            }
        ],
        "summary": {
            "has_time_restrictions": false,
            "has_toll": false,
            "has_highway": false,
            "has_ferry": false,
            "time": 42.5,
            "length": 0.5,
        },
        "shape": shape,
    })
}

/// Engine response with one primary trip and `alternates` alternates.
///
/// The primary trip has length 10.0, alternate `i` has length `11.0 + i`.
pub fn route_json(stops: &[Location], alternates: usize) -> Value {
    let alternates: Vec<Value> = (0..alternates)
        .map(|i| json!({ "trip": trip_json(stops, 11.0 + i as f64) }))
        .collect();
    json!({
        "trip": trip_json(stops, 10.0),
        "alternates": alternates,
    })
}
