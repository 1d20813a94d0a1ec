//! Forward geocoding: free text in, coordinates out.

pub mod nominatim;

use crate::core::geo::LatLng;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One candidate place returned by a geocoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeHit {
    pub position: LatLng,
    pub display_name: Option<String>,
}

impl GeocodeHit {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            display_name: None,
        }
    }
}

/// Trait for geocoding backends
#[async_trait]
pub trait GeocodeBackend: Send + Sync {
    /// Resolve `query` to candidate places in the provider's own order.
    /// An empty vector means nothing matched.
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeHit>>;

    fn name(&self) -> &str {
        "geocoder"
    }
}
