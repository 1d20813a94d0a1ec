use super::{GeocodeBackend, GeocodeHit};
use crate::core::{config::GeocoderConfig, geo::LatLng};
use crate::{MapError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

/// Shared client for geocoders without a custom timeout. Building the
/// client once avoids TLS and connection pool setup for every search.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Raw place entry as Nominatim returns it; coordinates are strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
    user_agent: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = match config.timeout_secs {
            Some(secs) => reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(secs))
                .build()?,
            None => HTTP_CLIENT.clone(),
        };

        Ok(Self::with_client(client, config))
    }

    /// Uses a caller-built client, e.g. one with proxy or TLS settings
    pub fn with_client(client: reqwest::Client, config: &GeocoderConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// `GET {endpoint}?format=json&q=<query>` with the identifying User-Agent.
    /// The query is passed through untouched apart from URL escaping.
    pub fn build_request(&self, query: &str) -> Result<reqwest::Request> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("q", query)])
            .header(USER_AGENT, &self.user_agent)
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl GeocodeBackend for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeHit>> {
        let request = self.build_request(query)?;
        log::debug!("geocoding {:?} via {}", query, request.url());

        let response = self.client.execute(request).await?.error_for_status()?;
        let body = response.text().await?;
        parse_response(&body)
    }

    fn name(&self) -> &str {
        "nominatim"
    }
}

/// Parses a Nominatim JSON array, keeping the provider's order
pub fn parse_response(body: &str) -> Result<Vec<GeocodeHit>> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body)?;
    places
        .into_iter()
        .map(|place| {
            let lat = parse_degrees(&place.lat)?;
            let lng = parse_degrees(&place.lon)?;
            Ok(GeocodeHit {
                position: LatLng::new(lat, lng),
                display_name: place.display_name,
            })
        })
        .collect()
}

fn parse_degrees(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MapError::ParseError(format!("invalid coordinate {:?}", raw))),
    }
}
