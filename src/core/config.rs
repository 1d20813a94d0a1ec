//! Configuration for a map session
//!
//! Every section has working defaults pointing at public OpenStreetMap
//! services, so `SessionConfig::default()` is enough for most hosts.
//! Hosts that need another geocoder, tile server or starting region can
//! load the same structure from JSON.

use crate::core::{
    constants::*,
    geo::LatLng,
    viewport::Viewport,
};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How out-of-range coordinates coming from taps, viewport reports or
/// the geocoder are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatePolicy {
    /// Refuse the input and leave state untouched
    #[default]
    Reject,
    /// Clamp latitude and wrap longitude into range
    Clamp,
    /// Accept the input as reported
    Trust,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    /// Client-side request timeout. `None` leaves timing to the network stack.
    pub timeout_secs: Option<u64>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub max_zoom: u8,
    pub attribution: String,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_TEMPLATE.to_string(),
            subdomains: DEFAULT_TILE_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            max_zoom: DEFAULT_MAX_TILE_ZOOM,
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub initial_viewport: Viewport,
    pub geocoder: GeocoderConfig,
    pub tiles: TileConfig,
    pub coordinate_policy: CoordinatePolicy,
}

impl TileConfig {
    /// Zoom must stay within what tile indices can address, and the
    /// attribution may not be blanked out
    pub fn validate(&self) -> Result<()> {
        if self.max_zoom > MAX_SUPPORTED_TILE_ZOOM {
            return Err(crate::MapError::Config(format!(
                "tile max_zoom {} exceeds {}",
                self.max_zoom, MAX_SUPPORTED_TILE_ZOOM
            )));
        }
        if self.attribution.trim().is_empty() {
            return Err(crate::MapError::Config(
                "tile attribution must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_viewport: Viewport {
                center: LatLng::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
                lat_span: DEFAULT_SPAN,
                lng_span: DEFAULT_SPAN,
            },
            geocoder: GeocoderConfig::default(),
            tiles: TileConfig::default(),
            coordinate_policy: CoordinatePolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Parses a JSON document; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.initial_viewport.check_spans()?;
        if !self.initial_viewport.center.is_valid() {
            return Err(crate::MapError::InvalidCoordinates(format!(
                "initial center {} out of range",
                self.initial_viewport.center
            )));
        }
        self.tiles.validate()
    }

    pub fn with_coordinate_policy(mut self, policy: CoordinatePolicy) -> Self {
        self.coordinate_policy = policy;
        self
    }

    pub fn with_initial_viewport(mut self, viewport: Viewport) -> Self {
        self.initial_viewport = viewport;
        self
    }
}
