pub mod source;

pub use source::{TileSource, UrlTemplateSource};
