//! Session-wide defaults derived from OpenStreetMap service conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default viewport center latitude (Maputo).
pub const DEFAULT_CENTER_LAT: f64 = -25.9655;

/// Default viewport center longitude (Maputo).
pub const DEFAULT_CENTER_LNG: f64 = 32.5892;

/// Default visible extent in degrees, both axes.
pub const DEFAULT_SPAN: f64 = 0.05;

/// Public Nominatim forward-geocoding endpoint.
pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim's usage policy requires an identifying User-Agent.
pub const DEFAULT_USER_AGENT: &str = "mappin/0.1.0 (+https://github.com/mappin-rs/mappin)";

/// CARTO Voyager raster tiles.
pub const DEFAULT_TILE_TEMPLATE: &str =
    "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png";

pub const DEFAULT_TILE_SUBDOMAINS: [&str; 4] = ["a", "b", "c", "d"];

/// Highest zoom level the default tile server renders.
pub const DEFAULT_MAX_TILE_ZOOM: u8 = 19;

/// Deepest zoom a tile configuration may ask for. Tile indices at this
/// level still fit comfortably in `u32`.
pub const MAX_SUPPORTED_TILE_ZOOM: u8 = 24;

/// Required wherever OpenStreetMap-derived tiles are shown.
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Description attached to the marker produced by a place search.
pub const SEARCH_MARKER_DESCRIPTION: &str = "Searched location";

/// Label of the singleton current-location marker.
pub const CURRENT_LOCATION_LABEL: &str = "You are here";

/// Events buffered per subscriber before further ones are dropped for it.
pub const SUBSCRIBER_CAPACITY: usize = 256;
