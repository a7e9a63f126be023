//! Forward and reverse address lookup.

use serde::Serialize;

use crate::context::RequestContext;
use crate::error::GeocodeError;
use crate::traits::Geocoder;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Address {
    pub display_name: String,
}

pub struct GeocodingService<'a, G: Geocoder> {
    geocoder: &'a G,
}

impl<'a, G: Geocoder> GeocodingService<'a, G> {
    pub fn new(geocoder: &'a G) -> Self {
        Self { geocoder }
    }

    /// Places matching `address`; no match is an empty list, not an error.
    #[tracing::instrument(skip(self, ctx))]
    pub fn search(&self, ctx: &RequestContext, address: &str) -> Result<Vec<Place>, GeocodeError> {
        let results = self.geocoder.search(ctx, address)?;
        tracing::debug!(matches = results.len(), "geocoder search done");

        results
            .into_iter()
            .map(|result| -> Result<Place, GeocodeError> {
                Ok(Place {
                    lat: parse_coordinate("latitude", &result.lat)?,
                    lon: parse_coordinate("longitude", &result.lon)?,
                    name: result.name,
                    display_name: result.display_name,
                })
            })
            .collect()
    }

    /// Display name of the first feature found at the coordinates.
    #[tracing::instrument(skip(self, ctx))]
    pub fn reverse(&self, ctx: &RequestContext, lat: f64, lon: f64) -> Result<Address, GeocodeError> {
        let result = self.geocoder.reverse(ctx, lat, lon)?;

        let display_name = result
            .features
            .into_iter()
            .next()
            .map(|feature| feature.properties.display_name)
            .filter(|name| !name.is_empty())
            .ok_or(GeocodeError::NotFound)?;

        Ok(Address { display_name })
    }
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<f64, GeocodeError> {
    value.parse().map_err(|source| GeocodeError::FieldParse {
        field,
        value: value.to_string(),
        source,
    })
}
