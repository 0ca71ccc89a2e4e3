//! Place name to coordinates.

use crate::ephemeris::GeoLocation;
use crate::error::LookupError;
use async_trait::async_trait;
use natal_config::GeocoderSettings;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "geocoder";

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// First coordinate matching `query`, or `LookupError::NotFound`.
    async fn geocode(&self, query: &str) -> Result<GeoLocation, LookupError>;
}

/// OpenStreetMap Nominatim search client.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    country_hint: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self, LookupError> {
        // Nominatim's usage policy requires an identifying User-Agent
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LookupError::Transport {
                service: SERVICE,
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            country_hint: settings.country_hint.clone(),
            timeout: settings.timeout,
        })
    }

    fn full_query(&self, query: &str) -> String {
        match &self.country_hint {
            Some(country) => format!("{}, {}", query, country),
            None => query.to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeoLocation, LookupError> {
        let full_query = self.full_query(query);
        let url = format!("{}/search", self.base_url);

        let places: Vec<NominatimPlace> = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("limit", "1"), ("q", full_query.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LookupError::from_reqwest(SERVICE, self.timeout, e))?
            .json()
            .await
            .map_err(|e| LookupError::from_reqwest(SERVICE, self.timeout, e))?;

        let place = places.into_iter().next().ok_or_else(|| LookupError::NotFound {
            query: full_query.clone(),
        })?;
        parse_place(&place)
    }
}

fn parse_place(place: &NominatimPlace) -> Result<GeoLocation, LookupError> {
    let parse = |value: &str| {
        value.trim().parse::<f64>().map_err(|e| LookupError::Decode {
            service: SERVICE,
            message: format!("bad coordinate '{}': {}", value, e),
        })
    };
    Ok(GeoLocation {
        lat: parse(&place.lat)?,
        lon: parse(&place.lon)?,
    })
}
