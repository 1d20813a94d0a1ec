use super::events::{LocationOutcome, Notice, SearchOutcome, SessionEvent, Subscribers};
use super::state::{SessionSnapshot, SessionState};
use crate::core::{
    config::{CoordinatePolicy, SessionConfig},
    geo::LatLng,
    viewport::Viewport,
};
use crate::geocoding::{nominatim::NominatimGeocoder, GeocodeBackend};
use crate::layers::{marker::Marker, route::RouteOverlay};
use crate::location::{LocationProvider, PermissionStatus};
use crate::prelude::Arc;
use crate::runtime::{self, AsyncHandle};
use crate::tiles::source::{TileSource, UrlTemplateSource};
use crate::{MapError, Result};
use crossbeam_channel::Receiver;
use std::sync::{Mutex, MutexGuard};

/// Single authority over one interactive map's state.
///
/// Every operation takes `&self`. State sits behind a mutex that is never
/// held across an `.await`, so a host can keep delivering taps and drags
/// while a search or location fix is pending. Only the most recently
/// issued search may change state when it resolves.
pub struct MapSession {
    state: Mutex<SessionState>,
    subscribers: Mutex<Subscribers>,
    geocoder: Arc<dyn GeocodeBackend>,
    locator: Arc<dyn LocationProvider>,
    tiles: UrlTemplateSource,
    policy: CoordinatePolicy,
}

impl MapSession {
    pub fn new(
        config: SessionConfig,
        geocoder: Arc<dyn GeocodeBackend>,
        locator: Arc<dyn LocationProvider>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(SessionState::new(config.initial_viewport)),
            subscribers: Mutex::new(Subscribers::default()),
            geocoder,
            locator,
            tiles: UrlTemplateSource::new(&config.tiles),
            policy: config.coordinate_policy,
        })
    }

    /// Session searching through the configured Nominatim endpoint
    pub fn with_nominatim(config: SessionConfig, locator: Arc<dyn LocationProvider>) -> Result<Self> {
        let geocoder = NominatimGeocoder::new(&config.geocoder)?;
        Self::new(config, Arc::new(geocoder), locator)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: SessionEvent) {
        log::trace!("session event {:?}", event);
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .publish(&event);
    }

    fn notify(&self, notice: Notice) {
        log::info!("notice: {}", notice);
        self.emit(SessionEvent::Notice(notice));
    }

    /// Applies the coordinate policy to externally supplied input
    fn admit(&self, position: LatLng) -> Result<LatLng> {
        match self.policy {
            CoordinatePolicy::Trust => Ok(position),
            CoordinatePolicy::Clamp => Ok(position.clamped()),
            CoordinatePolicy::Reject if position.is_valid() => Ok(position),
            CoordinatePolicy::Reject => Err(MapError::InvalidCoordinates(format!(
                "{} is outside [-90, 90] x [-180, 180]",
                position
            ))),
        }
    }

    /// Receives events published after this call. The receiver buffers a
    /// bounded number of events; drain it regularly or drop it, since a
    /// full receiver misses whatever is published next.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .subscribe()
    }

    /// Asks for location permission and, if granted, one position fix.
    ///
    /// A successful fix becomes the current location and the viewport
    /// recenters on it. Denial or a failed fix only raises a notice.
    pub async fn initialize(&self) -> LocationOutcome {
        if self.locator.request_permission().await == PermissionStatus::Denied {
            log::warn!("location permission denied; continuing without current location");
            self.notify(Notice::PermissionDenied);
            return LocationOutcome::PermissionDenied;
        }

        let fix = match self.locator.current_position().await {
            Ok(position) => self.admit(position),
            Err(e) => Err(e),
        };

        match fix {
            Ok(position) => {
                {
                    let mut state = self.state();
                    state.current_location = Some(position);
                    state.viewport.set_center(position);
                }
                log::info!("current location fixed at {}", position);
                self.emit(SessionEvent::StateChanged);
                LocationOutcome::Located(position)
            }
            Err(e) => {
                log::warn!("location fix failed: {}", e);
                self.notify(Notice::LocationUnavailable);
                LocationOutcome::Unavailable
            }
        }
    }

    pub fn set_query(&self, text: impl Into<String>) {
        self.state().query = text.into();
        self.emit(SessionEvent::StateChanged);
    }

    /// Geocodes the current query and drops a marker on the first hit.
    ///
    /// Empty queries are skipped without a request. Searches may overlap;
    /// a result is applied only if no newer search was issued meanwhile.
    pub async fn submit_search(&self) -> SearchOutcome {
        let (query, seq) = {
            let mut state = self.state();
            if state.query.is_empty() {
                return SearchOutcome::Skipped;
            }
            state.search_seq += 1;
            (state.query.clone(), state.search_seq)
        };

        log::debug!("search #{} issued for {:?} via {}", seq, query, self.geocoder.name());
        let resolved = self
            .geocoder
            .geocode(&query)
            .await
            .and_then(|hits| match hits.into_iter().next() {
                Some(hit) => self.admit(hit.position).map(Some),
                None => Ok(None),
            });

        let outcome = {
            let mut state = self.state();
            if state.search_seq != seq {
                log::debug!("search #{} superseded by #{}", seq, state.search_seq);
                return SearchOutcome::Superseded;
            }

            match resolved {
                Ok(Some(position)) => {
                    let marker = Marker::search_result(position, &query);
                    state.searched_marker = Some(marker.clone());
                    state.viewport.set_center(position);
                    SearchOutcome::Found(marker)
                }
                Ok(None) => SearchOutcome::NotFound,
                Err(e) => SearchOutcome::Failed(e.to_string()),
            }
        };

        match &outcome {
            SearchOutcome::Found(marker) => {
                log::info!("search #{} found {:?} at {}", seq, query, marker.position());
                self.emit(SessionEvent::StateChanged);
                self.emit(SessionEvent::InputFocusReleased);
            }
            SearchOutcome::NotFound => self.notify(Notice::SearchNotFound),
            SearchOutcome::Failed(reason) => {
                log::warn!("search #{} for {:?} failed: {}", seq, query, reason);
                self.notify(Notice::SearchFailed);
            }
            SearchOutcome::Skipped | SearchOutcome::Superseded => {}
        }
        outcome
    }

    /// Drops a marker at the middle of the visible region
    pub fn add_marker_at_viewport_center(&self) -> Marker {
        let marker = {
            let mut state = self.state();
            let marker = Marker::user_tap(state.viewport.center, state.user_markers.len() + 1);
            state.user_markers.push(marker.clone());
            marker
        };
        log::debug!("marker added at viewport center {}", marker.position());
        self.emit(SessionEvent::StateChanged);
        marker
    }

    /// Drops a marker where the user tapped the map
    pub fn add_marker_at_point(&self, position: LatLng) -> Result<Marker> {
        let position = self.admit(position)?;
        let marker = {
            let mut state = self.state();
            let marker = Marker::user_tap(position, state.user_markers.len() + 1);
            state.user_markers.push(marker.clone());
            marker
        };
        log::debug!("marker added at {}", position);
        self.emit(SessionEvent::StateChanged);
        Ok(marker)
    }

    /// Selects a marker and recenters on it; the route overlay appears once
    /// the current location is also known
    pub fn select_marker(&self, marker: Marker) {
        {
            let mut state = self.state();
            state.viewport.set_center(marker.position());
            state.selected_marker = Some(marker);
        }
        self.emit(SessionEvent::StateChanged);
    }

    /// Replaces the viewport after the user panned or zoomed
    pub fn on_viewport_changed(&self, viewport: Viewport) -> Result<()> {
        viewport.check_spans()?;
        let center = self.admit(viewport.center)?;
        self.state().viewport = viewport.recentered(center);
        self.emit(SessionEvent::StateChanged);
        Ok(())
    }

    /// Runs [`initialize`](Self::initialize) on the crate runtime; the
    /// outcome arrives through [`subscribe`](Self::subscribe)
    pub fn spawn_initialize(self: &Arc<Self>) -> Result<Box<dyn AsyncHandle>> {
        let session = Arc::clone(self);
        runtime::spawn(async move {
            session.initialize().await;
        })
    }

    /// Runs [`submit_search`](Self::submit_search) on the crate runtime
    pub fn spawn_search(self: &Arc<Self>) -> Result<Box<dyn AsyncHandle>> {
        let session = Arc::clone(self);
        runtime::spawn(async move {
            session.submit_search().await;
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().snapshot(self.tiles.attribution())
    }

    pub fn viewport(&self) -> Viewport {
        self.state().viewport
    }

    pub fn current_location(&self) -> Option<LatLng> {
        self.state().current_location
    }

    pub fn searched_marker(&self) -> Option<Marker> {
        self.state().searched_marker.clone()
    }

    pub fn user_markers(&self) -> Vec<Marker> {
        self.state().user_markers.clone()
    }

    pub fn selected_marker(&self) -> Option<Marker> {
        self.state().selected_marker.clone()
    }

    pub fn query(&self) -> String {
        self.state().query.clone()
    }

    /// Every marker to draw, in rendering order
    pub fn markers(&self) -> Vec<Marker> {
        self.snapshot().markers()
    }

    pub fn route_overlay(&self) -> Option<RouteOverlay> {
        self.state().route_overlay()
    }

    /// Attribution that must stay on screen while tiles are shown
    pub fn attribution(&self) -> &str {
        self.tiles.attribution()
    }

    /// Tile URLs covering the current viewport
    pub fn visible_tile_urls(&self) -> Vec<String> {
        let viewport = self.viewport();
        let zoom = viewport.approximate_zoom(self.tiles.max_zoom());
        viewport
            .covering_tiles(zoom)
            .into_iter()
            .filter_map(|coord| self.tiles.url(coord))
            .collect()
    }
}

impl std::fmt::Debug for MapSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSession")
            .field("state", &*self.state())
            .field("geocoder", &self.geocoder.name())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::GeocodeHit;
    use crate::location::{DeniedLocationProvider, StaticLocationProvider};
    use async_trait::async_trait;

    struct FixedGeocoder(Vec<GeocodeHit>);

    #[async_trait]
    impl GeocodeBackend for FixedGeocoder {
        async fn geocode(&self, _query: &str) -> Result<Vec<GeocodeHit>> {
            Ok(self.0.clone())
        }
    }

    fn session(policy: CoordinatePolicy, hits: Vec<GeocodeHit>) -> MapSession {
        MapSession::new(
            SessionConfig::default().with_coordinate_policy(policy),
            Arc::new(FixedGeocoder(hits)),
            Arc::new(DeniedLocationProvider),
        )
        .unwrap()
    }

    #[test]
    fn test_reject_policy() {
        let session = session(CoordinatePolicy::Reject, Vec::new());
        assert!(session.add_marker_at_point(LatLng::new(91.0, 0.0)).is_err());
        assert!(session.user_markers().is_empty());
    }

    #[test]
    fn test_clamp_policy() {
        let session = session(CoordinatePolicy::Clamp, Vec::new());
        let marker = session.add_marker_at_point(LatLng::new(91.0, 181.0)).unwrap();
        assert_eq!(marker.position().lat, 90.0);
        assert!(marker.position().is_valid());
    }

    #[test]
    fn test_trust_policy() {
        let session = session(CoordinatePolicy::Trust, Vec::new());
        let marker = session.add_marker_at_point(LatLng::new(91.0, 0.0)).unwrap();
        assert_eq!(marker.position(), LatLng::new(91.0, 0.0));
    }

    #[tokio::test]
    async fn test_out_of_range_geocoder_result_fails_under_reject() {
        let session = session(
            CoordinatePolicy::Reject,
            vec![GeocodeHit::new(LatLng::new(200.0, 0.0))],
        );
        let before = session.viewport();
        session.set_query("nowhere");
        assert!(matches!(session.submit_search().await, SearchOutcome::Failed(_)));
        assert_eq!(session.viewport(), before);
        assert!(session.searched_marker().is_none());
    }

    #[test]
    fn test_viewport_change_validation() {
        let session = session(CoordinatePolicy::Reject, Vec::new());
        let before = session.viewport();
        let bad_span = Viewport {
            center: LatLng::new(0.0, 0.0),
            lat_span: 0.0,
            lng_span: 1.0,
        };
        assert!(session.on_viewport_changed(bad_span).is_err());
        let bad_center = Viewport {
            center: LatLng::new(100.0, 0.0),
            lat_span: 1.0,
            lng_span: 1.0,
        };
        assert!(session.on_viewport_changed(bad_center).is_err());
        assert_eq!(session.viewport(), before);

        let good = Viewport::new(LatLng::new(10.0, 10.0), 2.0, 3.0).unwrap();
        session.on_viewport_changed(good).unwrap();
        assert_eq!(session.viewport(), good);
    }

    #[test]
    fn test_visible_tile_urls() {
        let session = session(CoordinatePolicy::Reject, Vec::new());
        let urls = session.visible_tile_urls();
        assert!(!urls.is_empty());
        assert!(urls
            .iter()
            .all(|url| url.contains("basemaps.cartocdn.com/rastertiles/voyager/12/")));
        assert_eq!(session.attribution(), "© OpenStreetMap contributors");
    }

    #[tokio::test]
    async fn test_static_location_recenters() {
        let session = MapSession::new(
            SessionConfig::default(),
            Arc::new(FixedGeocoder(Vec::new())),
            Arc::new(StaticLocationProvider::new(LatLng::new(-25.95, 32.60))),
        )
        .unwrap();

        let outcome = session.initialize().await;
        assert_eq!(outcome, LocationOutcome::Located(LatLng::new(-25.95, 32.60)));
        assert_eq!(session.viewport().center, LatLng::new(-25.95, 32.60));
        assert_eq!(session.viewport().lat_span, 0.05);
    }

    #[test]
    fn test_deepest_zoom_tile_urls() {
        let mut config = SessionConfig::default();
        config.tiles.max_zoom = 40;
        let rejected = MapSession::new(
            config.clone(),
            Arc::new(FixedGeocoder(Vec::new())),
            Arc::new(DeniedLocationProvider),
        );
        assert!(matches!(rejected, Err(MapError::Config(_))));

        config.tiles.max_zoom = 24;
        let session = MapSession::new(
            config,
            Arc::new(FixedGeocoder(Vec::new())),
            Arc::new(DeniedLocationProvider),
        )
        .unwrap();
        let pinpoint = Viewport::new(LatLng::new(-25.9, 32.5), 1e-8, 1e-8).unwrap();
        session.on_viewport_changed(pinpoint).unwrap();
        let urls = session.visible_tile_urls();
        assert!(!urls.is_empty() && urls.len() <= 4);
        assert!(urls.iter().all(|url| url.contains("/voyager/24/")));
    }

    #[test]
    fn test_tall_narrow_viewport_tile_count() {
        let session = session(CoordinatePolicy::Reject, Vec::new());
        let tall = Viewport::new(LatLng::new(0.0, 0.0), 170.0, 0.0001).unwrap();
        session.on_viewport_changed(tall).unwrap();
        let urls = session.visible_tile_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("/voyager/0/0/0"));
    }

    #[test]
    fn test_clamp_policy_viewport_keeps_spans() {
        let session = session(CoordinatePolicy::Clamp, Vec::new());
        let reported = Viewport::new(LatLng::new(95.0, 190.0), 2.0, 3.0).unwrap();
        session.on_viewport_changed(reported).unwrap();

        let viewport = session.viewport();
        assert_eq!(viewport.center, LatLng::new(90.0, -170.0));
        assert_eq!(viewport.lat_span, 2.0);
        assert_eq!(viewport.lng_span, 3.0);
    }
}
