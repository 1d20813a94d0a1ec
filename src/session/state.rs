use crate::core::{constants::CURRENT_LOCATION_LABEL, geo::LatLng, viewport::Viewport};
use crate::layers::{
    marker::{render_key, Marker, MarkerOrigin},
    route::RouteOverlay,
};
use serde::{Deserialize, Serialize};

/// Mutable state owned by a session
#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    pub viewport: Viewport,
    pub current_location: Option<LatLng>,
    pub searched_marker: Option<Marker>,
    pub user_markers: Vec<Marker>,
    pub selected_marker: Option<Marker>,
    pub query: String,
    /// Sequence number of the most recently issued search
    pub search_seq: u64,
}

impl SessionState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            current_location: None,
            searched_marker: None,
            user_markers: Vec::new(),
            selected_marker: None,
            query: String::new(),
            search_seq: 0,
        }
    }

    pub fn route_overlay(&self) -> Option<RouteOverlay> {
        RouteOverlay::derive(self.current_location, self.selected_marker.as_ref())
    }

    pub fn snapshot(&self, attribution: &str) -> SessionSnapshot {
        SessionSnapshot {
            viewport: self.viewport,
            current_location: self.current_location,
            searched_marker: self.searched_marker.clone(),
            user_markers: self.user_markers.clone(),
            selected_marker: self.selected_marker.clone(),
            query: self.query.clone(),
            route: self.route_overlay(),
            attribution: attribution.to_string(),
        }
    }
}

/// Read-only copy of session state for the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub viewport: Viewport,
    pub current_location: Option<LatLng>,
    pub searched_marker: Option<Marker>,
    pub user_markers: Vec<Marker>,
    pub selected_marker: Option<Marker>,
    pub query: String,
    pub route: Option<RouteOverlay>,
    pub attribution: String,
}

impl SessionSnapshot {
    /// The singleton marker at the device location, if known
    pub fn current_location_marker(&self) -> Option<Marker> {
        self.current_location
            .map(|position| Marker::new(position, CURRENT_LOCATION_LABEL, MarkerOrigin::CurrentLocation))
    }

    /// Every marker to draw: current location, searched place, then user
    /// markers in insertion order
    pub fn markers(&self) -> Vec<Marker> {
        self.current_location_marker()
            .into_iter()
            .chain(self.searched_marker.iter().cloned())
            .chain(self.user_markers.iter().cloned())
            .collect()
    }

    /// Markers paired with stable rendering keys
    pub fn keyed_markers(&self) -> Vec<(String, Marker)> {
        let singles = self
            .current_location_marker()
            .into_iter()
            .chain(self.searched_marker.iter().cloned())
            .map(|marker| (render_key(marker.origin(), 0), marker));

        let taps = self
            .user_markers
            .iter()
            .enumerate()
            .map(|(index, marker)| (render_key(MarkerOrigin::UserTap, index), marker.clone()));

        singles.chain(taps).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        SessionState::new(Viewport::new(LatLng::new(0.0, 0.0), 1.0, 1.0).unwrap())
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = state().snapshot("© OpenStreetMap contributors");
        assert!(snapshot.markers().is_empty());
        assert!(snapshot.route.is_none());
        assert_eq!(snapshot.attribution, "© OpenStreetMap contributors");
    }

    #[test]
    fn test_marker_order_and_keys() {
        let mut state = state();
        state.current_location = Some(LatLng::new(1.0, 1.0));
        state.searched_marker = Some(Marker::search_result(LatLng::new(2.0, 2.0), "Beira"));
        state.user_markers.push(Marker::user_tap(LatLng::new(3.0, 3.0), 1));
        state.user_markers.push(Marker::user_tap(LatLng::new(4.0, 4.0), 2));

        let snapshot = state.snapshot("");
        let origins: Vec<MarkerOrigin> = snapshot.markers().iter().map(|m| m.origin()).collect();
        assert_eq!(
            origins,
            vec![
                MarkerOrigin::CurrentLocation,
                MarkerOrigin::Search,
                MarkerOrigin::UserTap,
                MarkerOrigin::UserTap
            ]
        );

        let keys: Vec<String> = snapshot.keyed_markers().into_iter().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            vec!["current_location-0", "search-0", "user_tap-0", "user_tap-1"]
        );
    }

    #[test]
    fn test_route_follows_state() {
        let mut state = state();
        state.selected_marker = Some(Marker::user_tap(LatLng::new(0.5, 0.5), 1));
        assert!(state.route_overlay().is_none());

        state.current_location = Some(LatLng::new(0.0, 0.0));
        let route = state.route_overlay().unwrap();
        assert_eq!(route.to, LatLng::new(0.5, 0.5));
    }
}
