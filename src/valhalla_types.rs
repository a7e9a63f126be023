//! Wire types of the Valhalla turn-by-turn `/route` API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Travel-mode cost model used to weight the route search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Costing {
    Auto,
    Bicycle,
    Truck,
    MotorScooter,
    Pedestrian,
}

impl Costing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Costing::Auto => "auto",
            Costing::Bicycle => "bicycle",
            Costing::Truck => "truck",
            Costing::MotorScooter => "motor_scooter",
            Costing::Pedestrian => "pedestrian",
        }
    }
}

impl fmt::Display for Costing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Costing {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Costing::Auto),
            "bicycle" => Ok(Costing::Bicycle),
            "truck" => Ok(Costing::Truck),
            "motor_scooter" => Ok(Costing::MotorScooter),
            "pedestrian" => Ok(Costing::Pedestrian),
            other => Err(ValidationError::UnknownCosting(other.to_string())),
        }
    }
}

/// Ratios in [0, 1] biasing the costing model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_highways: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tolls: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tracks: Option<f64>,
}

impl CostingOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let ratios = [
            ("use_highways", self.use_highways),
            ("use_tolls", self.use_tolls),
            ("use_tracks", self.use_tracks),
        ];
        for (option, value) in ratios {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ValidationError::RatioOutOfRange { option, value });
                }
            }
        }
        Ok(())
    }
}

/// How the route may use a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Break,
    Through,
    Via,
    BreakThrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LocationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcludeLocation {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRouteRequest {
    pub locations: Vec<LocationRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_locations: Vec<ExcludeLocation>,
    pub costing: Costing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costing_options: Option<CostingOptions>,
    pub language: String,
    pub alternates: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineRouteResponse {
    pub trip: Trip,
    #[serde(default)]
    pub alternates: Vec<Alternate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alternate {
    pub trip: Trip,
}

/// Body of a non-2xx `/route` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResponse {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LocationType>,
    #[serde(default)]
    pub original_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub has_time_restrictions: bool,
    pub has_toll: bool,
    pub has_highway: bool,
    pub has_ferry: bool,
    pub time: f64,
    pub length: f64,
}

/// One element of an interchange sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignElement {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consecutive_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sign {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exit_number_elements: Vec<SignElement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exit_branch_elements: Vec<SignElement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exit_toward_elements: Vec<SignElement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exit_name_elements: Vec<SignElement>,
}

/// Lane directions as bit masks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub directions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Maneuver {
    #[serde(rename = "type")]
    pub kind: u8,
    pub instruction: String,
    pub verbal_pre_transition_instruction: Option<String>,
    pub verbal_post_transition_instruction: Option<String>,
    pub street_names: Option<Vec<String>>,
    pub time: f64,
    pub length: f64,
    pub begin_shape_index: usize,
    pub end_shape_index: usize,
    pub toll: Option<bool>,
    pub highway: Option<bool>,
    pub ferry: Option<bool>,
    pub sign: Option<Sign>,
    pub roundabout_exit_count: Option<u8>,
    pub lanes: Vec<Lane>,
    pub travel_mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub maneuvers: Vec<Maneuver>,
    #[serde(default)]
    pub summary: Summary,
    pub shape: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub locations: Vec<LocationResponse>,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub summary: Summary,
}
