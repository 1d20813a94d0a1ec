use crate::core::geo::{LatLng, TileCoord};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// The visible map region: a center plus the latitude/longitude extent
/// shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// Visible latitude extent in degrees
    pub lat_span: f64,
    /// Visible longitude extent in degrees
    pub lng_span: f64,
}

impl Viewport {
    /// Creates a viewport, rejecting non-positive or non-finite spans
    pub fn new(center: LatLng, lat_span: f64, lng_span: f64) -> Result<Self> {
        let viewport = Self {
            center,
            lat_span,
            lng_span,
        };
        viewport.check_spans()?;
        Ok(viewport)
    }

    /// Spans must be strictly positive and finite
    pub fn check_spans(&self) -> Result<()> {
        let valid = |span: f64| span.is_finite() && span > 0.0;
        if valid(self.lat_span) && valid(self.lng_span) {
            Ok(())
        } else {
            Err(MapError::InvalidViewport(format!(
                "spans must be positive, got {} x {}",
                self.lat_span, self.lng_span
            )))
        }
    }

    /// Returns a copy of this viewport moved to `center`, keeping spans
    pub fn recentered(&self, center: LatLng) -> Self {
        Self { center, ..*self }
    }

    /// Sets the center of the viewport, keeping the current spans
    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
    }

    /// South-west and north-east corners of the region
    pub fn corners(&self) -> (LatLng, LatLng) {
        let half_lat = self.lat_span / 2.0;
        let half_lng = self.lng_span / 2.0;
        (
            LatLng::new(self.center.lat - half_lat, self.center.lng - half_lng),
            LatLng::new(self.center.lat + half_lat, self.center.lng + half_lng),
        )
    }

    /// Checks whether a coordinate falls inside the visible region
    pub fn contains(&self, point: &LatLng) -> bool {
        let (south_west, north_east) = self.corners();
        point.lat >= south_west.lat
            && point.lat <= north_east.lat
            && point.lng >= south_west.lng
            && point.lng <= north_east.lng
    }

    /// Slippy-map zoom level at which the whole region fits in a couple of
    /// tiles along both axes, capped at `max_zoom`
    pub fn approximate_zoom(&self, max_zoom: u8) -> u8 {
        let (south_west, north_east) = self.corners();
        let tall = mercator_y(south_west.lat) - mercator_y(north_east.lat);
        let ratio = (360.0 / self.lng_span).min(1.0 / tall);
        let zoom = ratio.log2().floor();
        if zoom.is_nan() || zoom < 0.0 {
            0
        } else {
            zoom.min(max_zoom as f64) as u8
        }
    }

    /// Tiles needed to cover the viewport at `zoom`, row by row from the
    /// north-west corner
    pub fn covering_tiles(&self, zoom: u8) -> Vec<TileCoord> {
        let (south_west, north_east) = self.corners();
        let north_west = TileCoord::from_lat_lng(
            &LatLng::new(north_east.lat, south_west.lng.max(-180.0)),
            zoom,
        );
        let south_east = TileCoord::from_lat_lng(
            &LatLng::new(south_west.lat, north_east.lng.min(180.0)),
            zoom,
        );

        let mut tiles = Vec::new();
        for y in north_west.y..=south_east.y {
            for x in north_west.x..=south_east.x {
                tiles.push(TileCoord::new(x, y, zoom));
            }
        }
        tiles
    }
}

/// Web Mercator y as a fraction of the world height, 0 at the north edge
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = LatLng::clamp_mercator_lat(lat).to_radians();
    (1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maputo() -> Viewport {
        Viewport::new(LatLng::new(-25.9655, 32.5892), 0.05, 0.05).unwrap()
    }

    #[test]
    fn test_rejects_bad_spans() {
        let center = LatLng::new(0.0, 0.0);
        assert!(Viewport::new(center, 0.0, 1.0).is_err());
        assert!(Viewport::new(center, 1.0, -1.0).is_err());
        assert!(Viewport::new(center, f64::NAN, 1.0).is_err());
        assert!(Viewport::new(center, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_recentered_keeps_spans() {
        let viewport = maputo();
        let moved = viewport.recentered(LatLng::new(10.0, 20.0));
        assert_eq!(moved.center, LatLng::new(10.0, 20.0));
        assert_eq!(moved.lat_span, viewport.lat_span);
        assert_eq!(moved.lng_span, viewport.lng_span);
    }

    #[test]
    fn test_contains() {
        let viewport = maputo();
        assert!(viewport.contains(&LatLng::new(-25.97, 32.59)));
        assert!(!viewport.contains(&LatLng::new(-25.0, 32.59)));
    }

    #[test]
    fn test_approximate_zoom() {
        let world = Viewport::new(LatLng::default(), 170.0, 360.0).unwrap();
        assert_eq!(world.approximate_zoom(19), 0);
        // 360 / 0.05 = 7200, log2 ~ 12.8
        assert_eq!(maputo().approximate_zoom(19), 12);
        assert_eq!(maputo().approximate_zoom(10), 10);
        let wide = Viewport::new(LatLng::default(), 170.0, 720.0).unwrap();
        assert_eq!(wide.approximate_zoom(19), 0);
    }

    #[test]
    fn test_tall_narrow_viewport_stays_zoomed_out() {
        let tall = Viewport::new(LatLng::default(), 170.0, 0.0001).unwrap();
        assert_eq!(tall.approximate_zoom(19), 0);
        assert_eq!(tall.covering_tiles(tall.approximate_zoom(19)).len(), 1);

        // at the equator 0.05 degrees of latitude is 1/7200 of the world height
        let slim = Viewport::new(LatLng::default(), 0.05, 0.0001).unwrap();
        assert_eq!(slim.approximate_zoom(19), 12);
        assert!(slim.covering_tiles(12).len() <= 4);
    }

    #[test]
    fn test_covering_tiles() {
        let viewport = maputo();
        let zoom = viewport.approximate_zoom(19);
        let tiles = viewport.covering_tiles(zoom);
        assert!(!tiles.is_empty());
        assert!(tiles.len() <= 9);
        assert!(tiles.iter().all(|tile| tile.is_valid() && tile.z == zoom));
        assert!(tiles.contains(&TileCoord::from_lat_lng(&viewport.center, zoom)));
    }
}
