use crate::core::{config::TileConfig, geo::TileCoord};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`, or `None` past the source's max zoom.
    fn url(&self, coord: TileCoord) -> Option<String>;

    /// Attribution text that must be shown alongside the tiles.
    fn attribution(&self) -> &str;

    fn max_zoom(&self) -> u8;
}

/// Leaflet-style URL template source: expands `{s}`, `{z}`, `{x}`, `{y}`
/// and `{r}` (retina suffix).
#[derive(Debug, Clone)]
pub struct UrlTemplateSource {
    template: String,
    subdomains: Vec<String>,
    max_zoom: u8,
    attribution: String,
    retina: bool,
}

impl UrlTemplateSource {
    pub fn new(config: &TileConfig) -> Self {
        Self {
            template: config.url_template.clone(),
            subdomains: config.subdomains.clone(),
            max_zoom: config.max_zoom,
            attribution: config.attribution.clone(),
            retina: false,
        }
    }

    /// Request `@2x` tiles where the template has an `{r}` slot
    pub fn with_retina(mut self, retina: bool) -> Self {
        self.retina = retina;
        self
    }
}

impl Default for UrlTemplateSource {
    fn default() -> Self {
        Self::new(&TileConfig::default())
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> Option<String> {
        if coord.z > self.max_zoom || !coord.is_valid() {
            return None;
        }

        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
            self.subdomains[idx].as_str()
        };

        Some(
            self.template
                .replace("{s}", subdomain)
                .replace("{z}", &coord.z.to_string())
                .replace("{x}", &coord.x.to_string())
                .replace("{y}", &coord.y.to_string())
                .replace("{r}", if self.retina { "@2x" } else { "" }),
        )
    }

    fn attribution(&self) -> &str {
        &self.attribution
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}
