//! Valhalla HTTP adapter for turn-by-turn routes.

use serde::Deserialize;

use crate::context::RequestContext;
use crate::error::{Upstream, UpstreamError};
use crate::traits::RoutingEngine;
use crate::valhalla_types::{EngineRouteRequest, EngineRouteResponse, ErrorPayload};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValhallaConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            timeout_secs: 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValhallaClient {
    config: ValhallaConfig,
    client: reqwest::blocking::Client,
}

impl ValhallaClient {
    pub fn new(config: ValhallaConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RoutingEngine for ValhallaClient {
    fn calculate_route(
        &self,
        ctx: &RequestContext,
        request: &EngineRouteRequest,
    ) -> Result<EngineRouteResponse, UpstreamError> {
        let url = format!("{}/route", self.config.base_url);
        let builder = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request);

        ctx.run(move |remaining| {
            let builder = match remaining {
                Some(remaining) => builder.timeout(remaining),
                None => builder,
            };
            let response = builder
                .send()
                .map_err(UpstreamError::transport(Upstream::RoutingEngine))?;

            let status = response.status();
            if !status.is_success() {
                // Valhalla explains most rejections in a JSON body.
                let message = response.json::<ErrorPayload>().ok().map(|payload| payload.error);
                tracing::warn!(
                    status = status.as_u16(),
                    message = message.as_deref().unwrap_or(""),
                    "routing engine returned non-success status"
                );
                return Err(UpstreamError::Status {
                    service: Upstream::RoutingEngine,
                    status: status.as_u16(),
                    message,
                });
            }

            response
                .json::<EngineRouteResponse>()
                .map_err(UpstreamError::transport(Upstream::RoutingEngine))
        })
    }
}
