//! Command-line options and the map configuration derived from them.

use clap::Parser;
use std::path::PathBuf;

use crate::data::{DataSource, NameResolver};

pub const DEFAULT_CENTER: (f64, f64) = (53.233, 57.0);
pub const DEFAULT_PLACEHOLDER: &str = "Без названия";

#[derive(Parser, Debug)]
#[command(name = "region-map")]
#[command(about = "Explore administrative districts in the terminal", long_about = None)]
pub struct Args {
    /// District GeoJSON: a file path or an http(s) URL
    #[arg(long, env = "REGION_MAP_DATA", default_value = "./ur.geojson")]
    pub data: String,

    /// Initial map center as LON,LAT
    #[arg(long, value_parser = parse_lon_lat, default_value = "53.233,57.0", allow_hyphen_values = true)]
    pub center: (f64, f64),

    /// Initial zoom level of the overview map
    #[arg(long, default_value_t = 7.0)]
    pub zoom: f64,

    /// Zoom level the detail map starts from before fitting the district
    #[arg(long, default_value_t = 9.0)]
    pub detail_zoom: f64,

    /// Padding in Braille pixels kept around a fitted district
    #[arg(long, default_value_t = 10)]
    pub padding: usize,

    /// Language suffix for the `name:<lang>` property
    #[arg(long, default_value = "ru")]
    pub lang: String,

    /// Name shown for districts without a name property
    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    pub placeholder: String,

    /// Directory for the log file
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Log file name (cleared on start)
    #[arg(long, default_value = "region-map.log")]
    pub log_file: String,
}

impl Args {
    pub fn map_config(&self) -> MapConfig {
        MapConfig {
            source: DataSource::parse(&self.data),
            center: self.center,
            zoom_level: self.zoom,
            detail_zoom_level: self.detail_zoom,
            fit_padding: self.padding,
            names: NameResolver::new(&self.lang, self.placeholder.clone()),
        }
    }
}

/// Settings shared by the overview map and the detail modal
#[derive(Clone, Debug)]
pub struct MapConfig {
    pub source: DataSource,
    /// (lon, lat)
    pub center: (f64, f64),
    pub zoom_level: f64,
    pub detail_zoom_level: f64,
    pub fit_padding: usize,
    pub names: NameResolver,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            source: DataSource::parse("./ur.geojson"),
            center: DEFAULT_CENTER,
            zoom_level: 7.0,
            detail_zoom_level: 9.0,
            fit_padding: 10,
            names: NameResolver::new("ru", DEFAULT_PLACEHOLDER),
        }
    }
}

fn parse_lon_lat(s: &str) -> Result<(f64, f64), String> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT, got '{s}'"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("invalid latitude '{lat}': {e}"))?;

    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} out of range [-180, 180]"));
    }
    if !(-85.0..=85.0).contains(&lat) {
        return Err(format!("latitude {lat} out of range [-85, 85]"));
    }
    Ok((lon, lat))
}
