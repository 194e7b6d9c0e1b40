mod fetch;
mod region;

pub use region::{NameResolver, Polygon, Region, RegionCollection, Ring};

use crate::error::LoadError;
use crate::map::FeatureId;
use geojson::{GeoJson, Geometry, JsonObject, Value};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn};

/// Where the district GeoJSON comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched, anything else is a file path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::Path(PathBuf::from(location))
        }
    }

    fn read(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            DataSource::Path(path) => fs::read(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            DataSource::Url(url) => fetch::fetch(url),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Read and parse the source into a region collection
pub fn load(source: &DataSource, names: &NameResolver) -> Result<RegionCollection, LoadError> {
    let mut bytes = source.read()?;
    parse_regions(&mut bytes, names)
}

/// Load on a background thread; the receiver yields exactly one result
pub fn spawn_load(source: DataSource, names: NameResolver) -> Receiver<Result<RegionCollection, LoadError>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let started = Instant::now();
        info!(%source, "loading districts");

        let result = load(&source, &names);
        match &result {
            Ok(collection) => info!(
                regions = collection.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "districts loaded"
            ),
            Err(e) => error!(%source, error = %e, "failed to load districts"),
        }

        // The app may have quit before the load finished
        let _ = tx.send(result);
    });

    rx
}

/// Parse GeoJSON bytes (modified in place by simd-json)
pub fn parse_regions(bytes: &mut [u8], names: &NameResolver) -> Result<RegionCollection, LoadError> {
    let geojson: GeoJson = simd_json::serde::from_slice(bytes)?;

    let features: Vec<(Option<JsonObject>, Option<Geometry>)> = match geojson {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .into_iter()
            .map(|f| (f.properties, f.geometry))
            .collect(),
        GeoJson::Feature(f) => vec![(f.properties, f.geometry)],
        GeoJson::Geometry(g) => vec![(None, Some(g))],
    };

    let converted: Vec<Option<Region>> = features
        .into_par_iter()
        .enumerate()
        .map(|(idx, (properties, geometry))| {
            let polygons = geometry.as_ref().map(|g| collect_polygons(&g.value)).unwrap_or_default();
            if polygons.is_empty() {
                warn!(feature = idx, "skipping feature without polygon geometry");
                return None;
            }
            let name = names.resolve(properties.as_ref());
            Some(Region::new(FeatureId(idx), name, properties.unwrap_or_default(), polygons))
        })
        .collect();

    let regions: Vec<Region> = converted.into_iter().flatten().collect();
    if regions.is_empty() {
        return Err(LoadError::Empty);
    }

    Ok(RegionCollection::new(regions))
}

fn collect_polygons(value: &Value) -> Vec<Polygon> {
    match value {
        Value::Polygon(rings) => to_polygon(rings).into_iter().collect(),
        Value::MultiPolygon(polygons) => polygons.iter().filter_map(|rings| to_polygon(rings)).collect(),
        Value::GeometryCollection(geometries) => {
            geometries.iter().flat_map(|g| collect_polygons(&g.value)).collect()
        }
        _ => Vec::new(),
    }
}

/// Convert GeoJSON rings; `None` when the exterior ring is degenerate
fn to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon> {
    let polygon: Polygon = rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter(|c| c.len() >= 2)
                .map(|c| (c[0], c[1]))
                .collect::<Ring>()
        })
        .collect();

    match polygon.first() {
        Some(exterior) if exterior.len() >= 3 => Some(polygon),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Igrinsky", "name:ru": "Игринский район" },
                "geometry": { "type": "Polygon", "coordinates": [[[52.0, 57.0], [53.0, 57.0], [53.0, 58.0], [52.0, 58.0], [52.0, 57.0]]] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Capital" },
                "geometry": { "type": "Point", "coordinates": [53.2, 56.8] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "MultiPolygon", "coordinates": [
                    [[[54.0, 56.0], [55.0, 56.0], [55.0, 57.0], [54.0, 56.0]]],
                    [[[56.0, 56.0], [57.0, 56.0], [57.0, 57.0], [56.0, 56.0]]]
                ] }
            }
        ]
    }"#;

    fn names() -> NameResolver {
        NameResolver::new("ru", "Без названия")
    }

    #[test]
    fn test_parse_collection_skips_non_polygons() {
        let mut bytes = SAMPLE.as_bytes().to_vec();
        let collection = parse_regions(&mut bytes, &names()).unwrap();

        assert_eq!(collection.len(), 2);
        let first = collection.get(FeatureId(0)).unwrap();
        assert_eq!(first.name, "Игринский район");
        assert_eq!(first.polygons.len(), 1);

        let second = collection.get(FeatureId(1)).unwrap();
        assert_eq!(second.id, FeatureId(1));
        assert_eq!(second.name, "Без названия");
        assert_eq!(second.polygons.len(), 2);
        assert_eq!(second.first_coordinate(), Some((54.0, 56.0)));
    }

    #[test]
    fn test_parse_bare_geometry() {
        let mut bytes = br#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#.to_vec();
        let collection = parse_regions(&mut bytes, &names()).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.regions()[0].name, "Без названия");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let mut bytes = b"{ not json".to_vec();
        assert!(matches!(parse_regions(&mut bytes, &names()), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_parse_without_polygons_is_empty() {
        let mut bytes = br#"{"type":"FeatureCollection","features":[]}"#.to_vec();
        assert!(matches!(parse_regions(&mut bytes, &names()), Err(LoadError::Empty)));
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.org/ur.geojson"),
            DataSource::Url("https://example.org/ur.geojson".to_string())
        );
        assert_eq!(DataSource::parse("./ur.geojson"), DataSource::Path(PathBuf::from("./ur.geojson")));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let source = DataSource::Path(PathBuf::from("definitely/not/here.geojson"));
        assert!(matches!(load(&source, &names()), Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_spawn_load_delivers_result() {
        let path = std::env::temp_dir().join(format!("region-map-test-{}.geojson", std::process::id()));
        fs::write(&path, SAMPLE).unwrap();

        let rx = spawn_load(DataSource::Path(path.clone()), names());
        let collection = rx.recv().unwrap().unwrap();
        assert_eq!(collection.len(), 2);

        let _ = fs::remove_file(path);
    }
}
