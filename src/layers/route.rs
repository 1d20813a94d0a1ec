use crate::core::geo::LatLng;
use crate::layers::marker::Marker;
use serde::{Deserialize, Serialize};

/// Straight segment from the device location to the selected marker.
///
/// Derived from session state on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteOverlay {
    pub from: LatLng,
    pub to: LatLng,
    /// Great-circle length in meters
    pub distance_meters: f64,
}

impl RouteOverlay {
    pub fn between(from: LatLng, to: LatLng) -> Self {
        Self {
            from,
            to,
            distance_meters: from.distance_to(&to),
        }
    }

    /// Present only when both ends are known
    pub fn derive(current_location: Option<LatLng>, selected: Option<&Marker>) -> Option<Self> {
        match (current_location, selected) {
            (Some(from), Some(marker)) => Some(Self::between(from, marker.position())),
            _ => None,
        }
    }

    pub fn as_line(&self) -> geo_types::Line<f64> {
        geo_types::Line::new(
            geo_types::Point::from(self.from),
            geo_types::Point::from(self.to),
        )
    }
}
