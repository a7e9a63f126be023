//! Error taxonomy for the gateway core.

use std::fmt;
use std::num::ParseFloatError;

use thiserror::Error;

/// Upstream collaborator an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Geocoder,
    RoutingEngine,
    IncidentSource,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Upstream::Geocoder => "geocoder",
            Upstream::RoutingEngine => "routing engine",
            Upstream::IncidentSource => "incident source",
        };
        f.write_str(name)
    }
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Malformed or insufficient request, rejected before any upstream call.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("at least 2 locations must be provided, got {count}")]
    TooFewWaypoints { count: usize },

    #[error("costing {0:?} is invalid")]
    UnknownCosting(String),

    #[error("costing option {option} must be within [0, 1], got {value}")]
    RatioOutOfRange { option: &'static str, value: f64 },
}

/// Failure talking to one of the upstream services.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request was cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error("{service} request failed: {source}")]
    Transport {
        service: Upstream,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}{}", detail(.message))]
    Status {
        service: Upstream,
        status: u16,
        message: Option<String>,
    },
}

impl UpstreamError {
    pub(crate) fn transport(service: Upstream) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| UpstreamError::Transport { service, source }
    }
}

/// Corrupt encoded polyline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolylineError {
    #[error("polyline ends inside a value at byte {offset}")]
    Truncated { offset: usize },

    #[error("invalid polyline byte {byte:#04x} at {offset}")]
    InvalidCharacter { offset: usize, byte: u8 },

    #[error("polyline value starting before byte {offset} overflows 64 bits")]
    Overflow { offset: usize },
}

/// Failure of a route calculation.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route request: {0}")]
    Validation(#[from] ValidationError),

    #[error("calculate route: {0}")]
    Upstream(#[from] UpstreamError),

    /// `trip` is 0 for the primary trip, 1.. for alternates in engine order.
    #[error("trips[{trip}].legs[{leg}]: shape decode failed: {source}")]
    Geometry {
        trip: usize,
        leg: usize,
        #[source]
        source: PolylineError,
    },
}

/// Failure of a forward or reverse geocoding lookup.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("failed to parse {field} {value:?}: {source}")]
    FieldParse {
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("no address found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_is_optional() {
        let bare = UpstreamError::Status {
            service: Upstream::RoutingEngine,
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "routing engine returned status 502");

        let detailed = UpstreamError::Status {
            service: Upstream::RoutingEngine,
            status: 400,
            message: Some("No suitable edges near location".to_string()),
        };
        assert_eq!(
            detailed.to_string(),
            "routing engine returned status 400: No suitable edges near location"
        );
    }

    #[test]
    fn test_geometry_error_names_trip_and_leg() {
        let err = RouteError::Geometry {
            trip: 2,
            leg: 1,
            source: PolylineError::Truncated { offset: 9 },
        };
        let message = err.to_string();
        assert!(message.contains("trips[2].legs[1]"), "got {}", message);
    }
}
