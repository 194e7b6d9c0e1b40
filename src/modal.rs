use crate::config::MapConfig;
use crate::data::{Region, RegionCollection};
use crate::map::{FeatureStateStore, MapLayers, MapRenderer, RegionPaint, Viewport};
use tracing::{debug, info};

/// Detail view of one district with its own, independent map.
///
/// Dropping the modal releases its viewport and renderer.
pub struct DetailModal {
    region: Region,
    viewport: Viewport,
    renderer: MapRenderer,
    states: FeatureStateStore,
    padding: usize,
}

impl DetailModal {
    /// Open a map of `region` on a canvas of `width` x `height` Braille pixels.
    ///
    /// The camera starts on the district's first coordinate at the detail zoom
    /// level, then fits the district's bounds.
    pub fn open(region: Region, width: usize, height: usize, config: &MapConfig) -> Self {
        let (lon, lat) = region.first_coordinate().unwrap_or(config.center);
        let viewport = Viewport::from_zoom_level(lon, lat, config.detail_zoom_level, width, height);
        let renderer = MapRenderer::new(RegionCollection::new(vec![region.clone()]), RegionPaint::detail());

        let mut modal = Self {
            region,
            viewport,
            renderer,
            states: FeatureStateStore::new(),
            padding: config.fit_padding,
        };
        modal.fit();

        info!(
            id = %modal.region.id,
            name = %modal.region.name,
            vertices = modal.region.vertex_count(),
            "opened district detail"
        );
        debug!(id = %modal.region.id, properties = ?modal.region.properties, "district properties");
        modal
    }

    /// Fit the camera to the district bounds
    pub fn fit(&mut self) {
        self.viewport.fit_bounds(&self.region.bounds, self.padding);
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn renderer(&self) -> &MapRenderer {
        &self.renderer
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn render(&self, cols: usize, rows: usize) -> MapLayers {
        self.renderer.render(cols, rows, &self.viewport, &self.states)
    }
}

impl Drop for DetailModal {
    fn drop(&mut self) {
        debug!(id = %self.region.id, "released district detail map");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::FeatureId;
    use geojson::JsonObject;

    fn district() -> Region {
        let outer = vec![(52.0, 57.0), (53.0, 57.0), (53.0, 58.0), (52.0, 58.0), (52.0, 57.0)];
        let island = vec![(54.0, 56.0), (54.5, 56.0), (54.5, 56.5), (54.0, 56.0)];
        Region::new(
            FeatureId(4),
            "Игринский район".to_string(),
            JsonObject::new(),
            vec![vec![outer], vec![island]],
        )
    }

    #[test]
    fn test_open_holds_only_the_feature() {
        let modal = DetailModal::open(district(), 156, 120, &MapConfig::default());
        assert_eq!(modal.region().id, FeatureId(4));
        assert_eq!(modal.renderer().source().len(), 1);
        assert_eq!(modal.renderer().source().regions()[0].polygons, district().polygons);
    }

    #[test]
    fn test_open_fits_all_polygons() {
        let modal = DetailModal::open(district(), 156, 120, &MapConfig::default());
        let vp = modal.viewport();

        for (lon, lat) in [(52.0, 58.0), (54.5, 56.0)] {
            let p = vp.project_f(lon, lat);
            assert!(p.x >= 9.0 && p.x <= 147.0, "x {} out of frame", p.x);
            assert!(p.y >= 9.0 && p.y <= 111.0, "y {} out of frame", p.y);
        }
    }

    #[test]
    fn test_render_draws_district() {
        let modal = DetailModal::open(district(), 80, 40, &MapConfig::default());
        let layers = modal.render(40, 10);
        assert!(layers.fill.count_dots() > 0);
        assert!(layers.outline.count_dots() > 0);
    }

    #[test]
    fn test_fit_restores_camera_after_pan() {
        let mut modal = DetailModal::open(district(), 156, 120, &MapConfig::default());
        let fitted = (modal.viewport().center_lon, modal.viewport().zoom);
        modal.viewport_mut().pan(40, 0);
        modal.viewport_mut().zoom_in();
        modal.fit();
        assert!((modal.viewport().center_lon - fitted.0).abs() < 1e-9);
        assert!((modal.viewport().zoom - fitted.1).abs() < 1e-9);
    }
}
