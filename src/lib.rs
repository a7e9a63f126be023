//! route-gateway core
//!
//! Routes between waypoints while steering around live traffic incidents, and
//! normalizes the routing engine's trips into one response shape. Also offers
//! forward/reverse address lookup.

pub mod traits;
pub mod context;
pub mod error;
pub mod haversine;
pub mod hazard;
pub mod polyline;
pub mod avoidance;
pub mod routing;
pub mod geocoding;
pub mod valhalla;
pub mod valhalla_types;
pub mod nominatim;
pub mod incidents;
