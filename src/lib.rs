//! # mappin
//!
//! A headless, async-aware map session engine.
//!
//! A host UI owns one [`MapSession`] and forwards user events to it:
//! free-text place search through a forward geocoder, dropping and
//! tapping markers, reporting viewport changes. The session keeps the
//! map state consistent and publishes a [`SessionSnapshot`] plus
//! one-shot [`Notice`]s for the rendering layer to observe.

pub mod core;
pub mod geocoding;
pub mod layers;
pub mod location;
pub mod prelude;
pub mod runtime;
pub mod session;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{CoordinatePolicy, SessionConfig},
    geo::{LatLng, TileCoord},
    viewport::Viewport,
};

pub use layers::{
    marker::{Marker, MarkerOrigin},
    route::RouteOverlay,
};

pub use geocoding::{nominatim::NominatimGeocoder, GeocodeBackend, GeocodeHit};

pub use location::{LocationProvider, PermissionStatus};

pub use session::{
    LocationOutcome, MapSession, Notice, SearchOutcome, SessionEvent, SessionSnapshot,
};

pub use tiles::source::{TileSource, UrlTemplateSource};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Location error: {0}")]
    Location(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
