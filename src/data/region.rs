use crate::geo::Bounds;
use crate::map::{point_in_rings, FeatureId};
use geojson::JsonObject;

/// Closed ring of lon/lat coordinates
pub type Ring = Vec<(f64, f64)>;

/// Exterior ring followed by holes
pub type Polygon = Vec<Ring>;

/// One district of the collection
#[derive(Clone, Debug)]
pub struct Region {
    pub id: FeatureId,
    pub name: String,
    pub properties: JsonObject,
    pub polygons: Vec<Polygon>,
    pub bounds: Bounds,
}

impl Region {
    pub fn new(id: FeatureId, name: String, properties: JsonObject, polygons: Vec<Polygon>) -> Self {
        let mut bounds = Bounds::empty();
        for &(lon, lat) in polygons.iter().flatten().flatten() {
            bounds.extend(lon, lat);
        }
        Self {
            id,
            name,
            properties,
            polygons,
            bounds,
        }
    }

    /// First vertex of the first exterior ring
    pub fn first_coordinate(&self) -> Option<(f64, f64)> {
        self.polygons.first()?.first()?.first().copied()
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.bounds.contains(lon, lat) && self.polygons.iter().any(|p| point_in_rings(p, lon, lat))
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().flatten().map(Vec::len).sum()
    }
}

/// Districts in source order; a region's id is its index
#[derive(Clone, Debug, Default)]
pub struct RegionCollection {
    regions: Vec<Region>,
    bounds: Bounds,
}

impl RegionCollection {
    /// Take ownership of `regions`, renumbering ids by position
    pub fn new(mut regions: Vec<Region>) -> Self {
        let mut bounds = Bounds::empty();
        for (idx, region) in regions.iter_mut().enumerate() {
            region.id = FeatureId(idx);
            bounds = bounds.union(&region.bounds);
        }
        Self { regions, bounds }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: FeatureId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Union of all region bounds
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Picks the display name of a feature from its properties
#[derive(Clone, Debug)]
pub struct NameResolver {
    localized_key: String,
    placeholder: String,
}

impl NameResolver {
    pub fn new(lang: &str, placeholder: impl Into<String>) -> Self {
        Self {
            localized_key: format!("name:{lang}"),
            placeholder: placeholder.into(),
        }
    }

    /// `name:<lang>`, then `name`, then the placeholder; empty strings are skipped
    pub fn resolve(&self, properties: Option<&JsonObject>) -> String {
        properties
            .and_then(|p| {
                [self.localized_key.as_str(), "name"]
                    .into_iter()
                    .filter_map(|key| p.get(key).and_then(|v| v.as_str()))
                    .find(|s| !s.is_empty())
            })
            .unwrap_or(self.placeholder.as_str())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> JsonObject {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), geojson::JsonValue::from(*v)))
            .collect()
    }

    fn square(id: usize, x0: f64, y0: f64, size: f64) -> Region {
        let ring = vec![
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
            (x0, y0),
        ];
        Region::new(FeatureId(id), format!("r{id}"), JsonObject::new(), vec![vec![ring]])
    }

    #[test]
    fn test_resolve_prefers_localized_name() {
        let names = NameResolver::new("ru", "Без названия");
        let p = props(&[("name", "Igra"), ("name:ru", "Игра")]);
        assert_eq!(names.resolve(Some(&p)), "Игра");
    }

    #[test]
    fn test_resolve_falls_back_to_name_then_placeholder() {
        let names = NameResolver::new("ru", "Без названия");
        assert_eq!(names.resolve(Some(&props(&[("name", "Igra")]))), "Igra");
        assert_eq!(names.resolve(Some(&props(&[("name:ru", ""), ("name", "")]))), "Без названия");
        assert_eq!(names.resolve(None), "Без названия");
    }

    #[test]
    fn test_region_bounds_and_first_coordinate() {
        let region = square(0, 52.0, 56.0, 1.0);
        assert_eq!(region.bounds, Bounds::new(52.0, 56.0, 53.0, 57.0));
        assert_eq!(region.first_coordinate(), Some((52.0, 56.0)));
        assert_eq!(region.vertex_count(), 5);
        assert!(region.contains(52.5, 56.5));
        assert!(!region.contains(53.5, 56.5));
    }

    #[test]
    fn test_collection_renumbers_ids() {
        let collection = RegionCollection::new(vec![square(7, 0.0, 0.0, 1.0), square(9, 2.0, 0.0, 1.0)]);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(FeatureId(1)).map(|r| r.name.as_str()), Some("r9"));
        assert_eq!(collection.bounds(), Bounds::new(0.0, 0.0, 3.0, 1.0));
    }
}
