pub mod config;
pub mod constants;
pub mod geo;
pub mod viewport;

pub use self::config::{CoordinatePolicy, GeocoderConfig, SessionConfig, TileConfig};
pub use self::geo::{LatLng, TileCoord};
pub use self::viewport::Viewport;
