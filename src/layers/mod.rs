pub mod marker;
pub mod route;

pub use marker::{render_key, Marker, MarkerOrigin};
pub use route::RouteOverlay;
