use crate::core::{constants::SEARCH_MARKER_DESCRIPTION, geo::LatLng};
use serde::{Deserialize, Serialize};

/// How a marker came to be on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerOrigin {
    Search,
    UserTap,
    CurrentLocation,
}

impl std::fmt::Display for MarkerOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerOrigin::Search => write!(f, "search"),
            MarkerOrigin::UserTap => write!(f, "user_tap"),
            MarkerOrigin::CurrentLocation => write!(f, "current_location"),
        }
    }
}

/// A pin placed on the map. Markers are plain values and never change
/// once placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    position: LatLng,
    label: String,
    description: Option<String>,
    origin: MarkerOrigin,
}

impl Marker {
    pub fn new(position: LatLng, label: impl Into<String>, origin: MarkerOrigin) -> Self {
        Self {
            position,
            label: label.into(),
            description: None,
            origin,
        }
    }

    /// Marker for a geocoded place, titled with the text that found it
    pub fn search_result(position: LatLng, query: &str) -> Self {
        Self::new(position, query, MarkerOrigin::Search)
            .with_description(SEARCH_MARKER_DESCRIPTION)
    }

    /// Marker dropped by the user; `ordinal` is its 1-based position in
    /// the session's user markers
    pub fn user_tap(position: LatLng, ordinal: usize) -> Self {
        Self::new(position, format!("Marker {}", ordinal), MarkerOrigin::UserTap)
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn origin(&self) -> MarkerOrigin {
        self.origin
    }

    /// Same place and same provenance, ignoring display text
    pub fn same_place(&self, other: &Marker) -> bool {
        self.position == other.position && self.origin == other.origin
    }
}

/// Rendering key for the marker at `index` of a list with the given origin.
/// Stable for as long as markers are only ever appended.
pub fn render_key(origin: MarkerOrigin, index: usize) -> String {
    format!("{}-{}", origin, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_marker() {
        let marker = Marker::search_result(LatLng::new(-25.9692, 32.5732), "Maputo");
        assert_eq!(marker.label(), "Maputo");
        assert_eq!(marker.description(), Some("Searched location"));
        assert_eq!(marker.origin(), MarkerOrigin::Search);
    }

    #[test]
    fn test_user_tap_marker() {
        let marker = Marker::user_tap(LatLng::new(1.0, 2.0), 3);
        assert_eq!(marker.label(), "Marker 3");
        assert_eq!(marker.description(), None);
        assert!(marker.same_place(&Marker::new(LatLng::new(1.0, 2.0), "other", MarkerOrigin::UserTap)));
        assert!(!marker.same_place(&Marker::new(LatLng::new(1.0, 2.0), "", MarkerOrigin::Search)));
    }

    #[test]
    fn test_render_key() {
        assert_eq!(render_key(MarkerOrigin::UserTap, 0), "user_tap-0");
        assert_eq!(render_key(MarkerOrigin::CurrentLocation, 0), "current_location-0");
    }

    #[test]
    fn test_marker_serializes_origin_snake_case() {
        let marker = Marker::user_tap(LatLng::new(1.0, 2.0), 1);
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["origin"], "user_tap");
        assert_eq!(json["position"]["lat"], 1.0);
    }
}
