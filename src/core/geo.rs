use geo::HaversineDistance;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator latitude limit used for tile math
const MAX_MERCATOR_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Returns the coordinate forced into the valid range.
    ///
    /// Latitude is clamped, longitude is wrapped around the antimeridian.
    /// Non-finite components collapse to zero.
    pub fn clamped(&self) -> Self {
        let lat = if self.lat.is_finite() {
            self.lat.clamp(-90.0, 90.0)
        } else {
            0.0
        };
        let lng = if self.lng.is_finite() {
            Self::wrap_lng(self.lng)
        } else {
            0.0
        };
        Self::new(lat, lng)
    }

    /// Great-circle distance to another coordinate in meters (Haversine)
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        geo_types::Point::from(*self).haversine_distance(&geo_types::Point::from(*other))
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        let wrapped = lng % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped < -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// Clamps latitude to the range Web Mercator can project
    pub fn clamp_mercator_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

// geo-types points are (x, y) = (lng, lat)
impl From<LatLng> for geo_types::Point<f64> {
    fn from(value: LatLng) -> Self {
        geo_types::Point::new(value.lng, value.lat)
    }
}

impl From<geo_types::Point<f64>> for LatLng {
    fn from(value: geo_types::Point<f64>) -> Self {
        LatLng::new(value.y(), value.x())
    }
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Creates a tile coordinate from a LatLng and zoom level
    pub fn from_lat_lng(lat_lng: &LatLng, zoom: u8) -> Self {
        let lat_rad = LatLng::clamp_mercator_lat(lat_lng.lat).to_radians();
        let n = 2_f64.powi(zoom as i32);
        let max_index = (n as u32).saturating_sub(1);

        let x = ((lat_lng.lng + 180.0) / 360.0 * n).floor().max(0.0) as u32;
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor().max(0.0) as u32;

        Self::new(x.min(max_index), y.min(max_index), zoom)
    }

    /// Converts tile coordinate to LatLng (northwest corner)
    pub fn to_lat_lng(&self) -> LatLng {
        let n = 2_f64.powi(self.z as i32);
        let lng = self.x as f64 / n * 360.0 - 180.0;
        let lat_rad = (PI * (1.0 - 2.0 * self.y as f64 / n)).sinh().atan();
        let lat = lat_rad.to_degrees();

        LatLng::new(lat, lng)
    }

    /// Checks if the tile is valid for the given zoom level
    pub fn is_valid(&self) -> bool {
        match 1_u32.checked_shl(self.z as u32) {
            Some(max_coord) => self.x < max_coord && self.y < max_coord,
            // every u32 index exists past zoom 31
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(-25.9692, 32.5732);
        assert_eq!(coord.lat, -25.9692);
        assert_eq!(coord.lng, 32.5732);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_lat_lng_validity_bounds() {
        assert!(LatLng::new(90.0, 180.0).is_valid());
        assert!(LatLng::new(-90.0, -180.0).is_valid());
        assert!(!LatLng::new(90.5, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -180.1).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_lat_lng_clamped() {
        let clamped = LatLng::new(95.0, 190.0).clamped();
        assert_eq!(clamped.lat, 90.0);
        assert!((clamped.lng - -170.0).abs() < 1e-9);
        assert!(clamped.is_valid());

        let nan = LatLng::new(f64::NAN, f64::INFINITY).clamped();
        assert_eq!(nan, LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_lat_lng_distance() {
        let nyc = LatLng::new(40.7128, -74.0060);
        let la = LatLng::new(34.0522, -118.2437);
        let distance = nyc.distance_to(&la);

        // Distance should be approximately 3944 km
        assert!((distance - 3944000.0).abs() < 10000.0);
    }

    #[test]
    fn test_geo_point_axis_order() {
        let point: geo_types::Point<f64> = LatLng::new(-25.9, 32.5).into();
        assert_eq!(point.x(), 32.5);
        assert_eq!(point.y(), -25.9);
        assert_eq!(LatLng::from(point), LatLng::new(-25.9, 32.5));
    }

    #[test]
    fn test_tile_coord_conversion() {
        let lat_lng = LatLng::new(-25.9655, 32.5892);
        let tile = TileCoord::from_lat_lng(&lat_lng, 10);
        assert!(tile.is_valid());
        let back_to_lat_lng = tile.to_lat_lng();

        // Should be reasonably close (within tile boundaries)
        assert!((back_to_lat_lng.lat - lat_lng.lat).abs() < 1.0);
        assert!((back_to_lat_lng.lng - lat_lng.lng).abs() < 1.0);
    }

    #[test]
    fn test_tile_coord_edge_stays_in_range() {
        let tile = TileCoord::from_lat_lng(&LatLng::new(-90.0, 180.0), 3);
        assert!(tile.is_valid());
        assert_eq!(tile.x, 7);
        assert_eq!(tile.y, 7);
    }

    #[test]
    fn test_tile_coord_validity_at_extreme_zoom() {
        assert!(!TileCoord::new(8, 0, 3).is_valid());
        assert!(!TileCoord::new(u32::MAX, 0, 31).is_valid());
        assert!(TileCoord::new(u32::MAX, u32::MAX, 40).is_valid());
    }
}
