//! Prelude module for common mappin types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mappin::prelude::*;`

pub use crate::core::{
    config::{CoordinatePolicy, GeocoderConfig, SessionConfig, TileConfig},
    geo::{LatLng, TileCoord},
    viewport::Viewport,
};

pub use crate::layers::{
    marker::{Marker, MarkerOrigin},
    route::RouteOverlay,
};

pub use crate::geocoding::{nominatim::NominatimGeocoder, GeocodeBackend, GeocodeHit};

pub use crate::location::{
    DeniedLocationProvider, LocationProvider, PermissionStatus, StaticLocationProvider,
};

pub use crate::session::{
    LocationOutcome, MapSession, Notice, SearchOutcome, SessionEvent, SessionSnapshot,
};

pub use crate::tiles::source::{TileSource, UrlTemplateSource};

pub use crate::runtime::{runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::{Error as MapError, Result};

pub use std::{future::Future, pin::Pin, sync::Arc};
