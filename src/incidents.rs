//! Incident store HTTP adapter and incident wire types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::context::RequestContext;
use crate::error::{Upstream, UpstreamError};
use crate::traits::{IncidentSource, Point};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IncidentsConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for IncidentsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            timeout_secs: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Role {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
    pub handle: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncidentType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A live traffic incident as reported by the incident store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Incident {
    pub id: i64,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(rename = "type", default)]
    pub kind: Option<IncidentType>,
    pub lat: f64,
    pub lon: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Distance in meters from the query center.
    #[serde(default)]
    pub distance: f64,
}

impl Incident {
    pub fn location(&self) -> Point {
        Point::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone)]
pub struct IncidentsClient {
    config: IncidentsConfig,
    client: reqwest::blocking::Client,
}

impl IncidentsClient {
    pub fn new(config: IncidentsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl IncidentSource for IncidentsClient {
    fn incidents_in_radius(
        &self,
        ctx: &RequestContext,
        lat: f64,
        lon: f64,
        radius_meters: u32,
    ) -> Result<Vec<Incident>, UpstreamError> {
        let url = format!("{}/incidents", self.config.base_url);
        let query = [
            ("lat", format!("{:.6}", lat)),
            ("lon", format!("{:.6}", lon)),
            ("radius", radius_meters.to_string()),
        ];
        let builder = self.client.get(url).query(&query);

        ctx.run(move |remaining| {
            let builder = match remaining {
                Some(remaining) => builder.timeout(remaining),
                None => builder,
            };
            let response = builder
                .send()
                .map_err(UpstreamError::transport(Upstream::IncidentSource))?;

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(
                    status = status.as_u16(),
                    radius_m = radius_meters,
                    "incident store returned non-success status"
                );
                return Err(UpstreamError::Status {
                    service: Upstream::IncidentSource,
                    status: status.as_u16(),
                    message: None,
                });
            }

            response
                .json::<Vec<Incident>>()
                .map_err(UpstreamError::transport(Upstream::IncidentSource))
        })
    }
}
