//! Real Caen / Calvados locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use route_gateway::traits::Point;
use route_gateway::valhalla_types::LocationRequest;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lng)
    }

    pub fn waypoint(&self) -> LocationRequest {
        LocationRequest {
            lat: self.lat,
            lon: self.lng,
            kind: None,
            name: Some(self.name.to_string()),
        }
    }
}

// ============================================================================
// Caen city center
// ============================================================================

pub const CAEN_CENTER: &[Location] = &[
    Location::new("Abbaye aux Hommes", 49.1813, -0.3746),
    Location::new("Abbaye aux Dames", 49.1862, -0.3539),
    Location::new("Château de Caen", 49.1864, -0.3630),
    Location::new("Gare de Caen", 49.1760, -0.3487),
];

// ============================================================================
// Around Caen
// ============================================================================

pub const CALVADOS: &[Location] = &[
    Location::new("Mémorial de Caen", 49.1975, -0.3839),
    Location::new("Hérouville-Saint-Clair", 49.2047, -0.3256),
    Location::new("Villers-Bocage", 49.0793, -0.6553),
    Location::new("Ouistreham", 49.2760, -0.2590),
];

/// Waypoints for a short cross-town route.
pub fn cross_town() -> Vec<Location> {
    vec![CAEN_CENTER[0].clone(), CAEN_CENTER[3].clone()]
}

/// Waypoints for a three-stop regional route.
pub fn regional_tour() -> Vec<Location> {
    vec![CALVADOS[2].clone(), CAEN_CENTER[2].clone(), CALVADOS[3].clone()]
}
