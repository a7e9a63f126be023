//! Nominatim HTTP adapter for forward and reverse geocoding.

use serde::Deserialize;

use crate::context::RequestContext;
use crate::error::{Upstream, UpstreamError};
use crate::traits::Geocoder;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Sent as `Accept-Language` on searches.
    pub language: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 7,
            language: "fr-FR".to_string(),
        }
    }
}

/// One match of a forward search. Coordinates come back as strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeocodeResult {
    pub place_id: i64,
    pub lat: String,
    pub lon: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub importance: f64,
    pub addresstype: String,
    pub name: String,
    pub display_name: String,
    pub boundingbox: Vec<String>,
}

/// GeoJSON feature collection returned by `/reverse`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReverseResult {
    pub features: Vec<ReverseFeature>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReverseFeature {
    pub properties: ReverseProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReverseProperties {
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn get<T>(&self, ctx: &RequestContext, path: &'static str, query: &[(&str, String)]) -> Result<T, UpstreamError>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let url = format!("{}{}", self.config.base_url, path);
        let builder = self
            .client
            .get(url)
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::ACCEPT_LANGUAGE, self.config.language.as_str());

        ctx.run(move |remaining| {
            let builder = match remaining {
                Some(remaining) => builder.timeout(remaining),
                None => builder,
            };
            let response = builder
                .send()
                .map_err(UpstreamError::transport(Upstream::Geocoder))?;

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(status = status.as_u16(), path, "geocoder returned non-success status");
                return Err(UpstreamError::Status {
                    service: Upstream::Geocoder,
                    status: status.as_u16(),
                    message: None,
                });
            }

            response
                .json::<T>()
                .map_err(UpstreamError::transport(Upstream::Geocoder))
        })
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, ctx: &RequestContext, query: &str) -> Result<Vec<GeocodeResult>, UpstreamError> {
        self.get(
            ctx,
            "/search",
            &[("q", query.to_string()), ("format", "jsonv2".to_string())],
        )
    }

    fn reverse(&self, ctx: &RequestContext, lat: f64, lon: f64) -> Result<ReverseResult, UpstreamError> {
        self.get(
            ctx,
            "/reverse",
            &[
                ("format", "geojson".to_string()),
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
            ],
        )
    }
}
