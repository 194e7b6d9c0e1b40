use crate::config::MapConfig;
use crate::data::{self, Region, RegionCollection};
use crate::error::LoadError;
use crate::layout;
use crate::map::{FeatureId, FeatureState, FeatureStateStore, MapRenderer, RegionPaint, Viewport};
use crate::modal::DetailModal;
use crate::popup::Popup;
use ratatui::layout::Rect;
use std::sync::mpsc::{Receiver, TryRecvError};
use tracing::{debug, info, warn};

/// Progress of the district data load
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Application state
pub struct App {
    pub config: MapConfig,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub feature_state: FeatureStateStore,
    /// District under the pointer; mirrored as `hover = true` in `feature_state`
    pub hovered: Option<FeatureId>,
    pub popup: Option<Popup>,
    /// Open detail modal; `None` means no modal
    pub detail: Option<DetailModal>,
    pub load_status: LoadStatus,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    dragged: bool,
    screen: Rect,
    pending: Option<Receiver<Result<RegionCollection, LoadError>>>,
}

impl App {
    pub fn new(config: MapConfig, width: u16, height: u16) -> Self {
        let screen = Rect::new(0, 0, width, height);
        let (px_w, px_h) = layout::canvas_pixels(layout::screen(screen).map_inner);
        let (lon, lat) = config.center;
        let viewport = Viewport::from_zoom_level(lon, lat, config.zoom_level, px_w, px_h);

        Self {
            config,
            viewport,
            map_renderer: MapRenderer::empty(RegionPaint::primary()),
            feature_state: FeatureStateStore::new(),
            hovered: None,
            popup: None,
            detail: None,
            load_status: LoadStatus::Loading,
            should_quit: false,
            last_mouse: None,
            dragged: false,
            screen,
            pending: None,
        }
    }

    /// Start loading the configured source in the background
    pub fn start_loading(&mut self) {
        self.load_status = LoadStatus::Loading;
        self.pending = Some(data::spawn_load(
            self.config.source.clone(),
            self.config.names.clone(),
        ));
    }

    /// Install the loaded source once the background load has finished
    pub fn poll_load(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(collection)) => {
                self.pending = None;
                self.install_source(collection);
            }
            Ok(Err(e)) => {
                self.pending = None;
                self.load_status = LoadStatus::Failed(e.to_string());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                warn!("district loader exited without a result");
                self.load_status = LoadStatus::Failed("loader stopped".to_string());
            }
        }
    }

    /// Replace the map source and its layers
    pub fn install_source(&mut self, collection: RegionCollection) {
        self.pointer_leave();
        self.feature_state.clear();
        self.map_renderer = MapRenderer::new(collection, RegionPaint::primary());
        self.load_status = LoadStatus::Ready;
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// Character area of the main map canvas
    pub fn map_inner(&self) -> Rect {
        layout::screen(self.screen).map_inner
    }

    /// Character area of the detail map canvas
    pub fn modal_inner(&self) -> Rect {
        layout::modal(self.screen).inner
    }

    /// Update viewport sizes when the terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "terminal resized");
        self.screen = Rect::new(0, 0, width, height);

        let (px_w, px_h) = layout::canvas_pixels(self.map_inner());
        self.viewport.width = px_w;
        self.viewport.height = px_h;

        let (modal_w, modal_h) = layout::canvas_pixels(self.modal_inner());
        if let Some(detail) = &mut self.detail {
            detail.resize(modal_w, modal_h);
        }
    }

    /// Geographic position under a terminal cell of the main map
    fn lng_lat_at(&self, col: u16, row: u16) -> Option<(f64, f64)> {
        layout::cell_to_pixel(self.map_inner(), col, row).map(|(px, py)| self.viewport.unproject(px, py))
    }

    /// Terminal cell of the main map showing a geographic position
    pub fn cell_at(&self, lon: f64, lat: f64) -> Option<(u16, u16)> {
        let (px, py) = self.viewport.project(lon, lat);
        layout::pixel_to_cell(self.map_inner(), px, py)
    }

    /// Pointer moved over the terminal
    pub fn pointer_move(&mut self, col: u16, row: u16) {
        // The modal overlay covers the district layer
        if self.detail.is_some() {
            return;
        }

        let Some((lon, lat)) = self.lng_lat_at(col, row) else {
            self.pointer_leave();
            return;
        };

        match self.map_renderer.feature_at(lon, lat).map(|r| (r.id, r.name.clone())) {
            Some((id, name)) => self.hover(id, &name, lon, lat),
            None => self.pointer_leave(),
        }
    }

    fn hover(&mut self, id: FeatureId, name: &str, lon: f64, lat: f64) {
        if let Some(previous) = self.hovered {
            self.feature_state.set(previous, FeatureState { hover: false });
        }
        if self.hovered != Some(id) {
            debug!(%id, name, "hover");
        }

        self.hovered = Some(id);
        self.feature_state.set(id, FeatureState { hover: true });

        self.popup
            .get_or_insert_with(Popup::new)
            .set_lng_lat(lon, lat)
            .set_text(name);
    }

    /// Pointer left the district layer: drop highlight and popup
    pub fn pointer_leave(&mut self) {
        if let Some(previous) = self.hovered.take() {
            self.feature_state.set(previous, FeatureState { hover: false });
        }
        self.popup = None;
    }

    /// Left click (button released without dragging)
    pub fn click(&mut self, col: u16, row: u16) {
        if self.detail.is_some() {
            if layout::contains(layout::modal(self.screen).close_button, col, row) {
                self.close_modal();
            }
            return;
        }

        let Some((lon, lat)) = self.lng_lat_at(col, row) else {
            return;
        };
        if let Some(region) = self.map_renderer.feature_at(lon, lat).cloned() {
            self.open_detail(region);
        }
    }

    /// Open the detail modal for the hovered district
    pub fn open_hovered(&mut self) {
        if self.detail.is_some() {
            return;
        }
        if let Some(region) = self.hovered.and_then(|id| self.map_renderer.region(id)).cloned() {
            self.open_detail(region);
        }
    }

    fn open_detail(&mut self, region: Region) {
        self.pointer_leave();
        let (width, height) = layout::canvas_pixels(self.modal_inner());
        self.detail = Some(DetailModal::open(region, width, height, &self.config));
    }

    pub fn close_modal(&mut self) {
        if let Some(detail) = self.detail.take() {
            info!(id = %detail.region().id, "closed district detail");
        }
    }

    pub fn has_modal(&self) -> bool {
        self.detail.is_some()
    }

    /// Whichever camera currently receives navigation input
    fn active_viewport(&mut self) -> &mut Viewport {
        match &mut self.detail {
            Some(detail) => detail.viewport_mut(),
            None => &mut self.viewport,
        }
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.active_viewport().pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.active_viewport().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.active_viewport().zoom_out();
    }

    /// Zoom in towards a terminal cell
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        match self.pixel_in_active(col, row) {
            Some((px, py)) => self.active_viewport().zoom_in_at(px, py),
            None => self.zoom_in(),
        }
    }

    /// Zoom out from a terminal cell
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        match self.pixel_in_active(col, row) {
            Some((px, py)) => self.active_viewport().zoom_out_at(px, py),
            None => self.zoom_out(),
        }
    }

    fn pixel_in_active(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let inner = if self.detail.is_some() {
            self.modal_inner()
        } else {
            self.map_inner()
        };
        layout::cell_to_pixel(inner, col, row)
    }

    /// Fit the camera to the whole collection, or to the district in the modal
    pub fn fit(&mut self) {
        match &mut self.detail {
            Some(detail) => detail.fit(),
            None if !self.map_renderer.has_data() => debug!("nothing to fit yet"),
            None => {
                let bounds = self.map_renderer.source().bounds();
                self.viewport.fit_bounds(&bounds, self.config.fit_padding);
            }
        }
    }

    /// Back to the configured center and zoom level
    pub fn reset_view(&mut self) {
        let (lon, lat) = self.config.center;
        self.viewport = Viewport::from_zoom_level(
            lon,
            lat,
            self.config.zoom_level,
            self.viewport.width,
            self.viewport.height,
        );
    }

    pub fn begin_drag(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Drag pans at one Braille cell per terminal cell moved
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = (last_x as i32 - col as i32) * 2;
            let dy = (last_y as i32 - row as i32) * 4;
            if dx != 0 || dy != 0 {
                self.dragged = true;
                self.pan(dx, dy);
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Button released; a release without drag is a click
    pub fn end_drag(&mut self, col: u16, row: u16) {
        let was_click = self.last_mouse.is_some() && !self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        if was_click {
            self.click(col, row);
        }
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn hovered_name(&self) -> Option<&str> {
        self.popup.as_ref().map(Popup::text)
    }

    /// Zoom of the active map as a web zoom level
    pub fn zoom_level(&self) -> String {
        let vp = self.detail.as_ref().map(DetailModal::viewport).unwrap_or(&self.viewport);
        format!("z{:.1}", vp.zoom_level())
    }

    /// Center of the active map
    pub fn center_coords(&self) -> String {
        let vp = self.detail.as_ref().map(DetailModal::viewport).unwrap_or(&self.viewport);
        format!(
            "{:.3}°{}, {:.3}°{}",
            vp.center_lat.abs(),
            if vp.center_lat >= 0.0 { "N" } else { "S" },
            vp.center_lon.abs(),
            if vp.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::JsonObject;

    fn square(x0: f64, y0: f64, w: f64, h: f64, name: &str) -> Region {
        let ring = vec![(x0, y0), (x0 + w, y0), (x0 + w, y0 + h), (x0, y0 + h), (x0, y0)];
        Region::new(FeatureId(0), name.to_string(), JsonObject::new(), vec![vec![ring]])
    }

    fn app() -> App {
        let mut app = App::new(MapConfig::default(), 100, 40);
        app.install_source(RegionCollection::new(vec![
            square(52.5, 56.8, 0.7, 0.4, "West"),
            square(53.4, 56.8, 0.7, 0.4, "East"),
        ]));
        app
    }

    #[test]
    fn test_new_app_is_loading_and_empty() {
        let app = App::new(MapConfig::default(), 100, 40);
        assert_eq!(app.load_status, LoadStatus::Loading);
        assert!(!app.map_renderer.has_data());
        assert_eq!(app.viewport.width, 196);
        assert_eq!(app.viewport.height, 148);
    }

    #[test]
    fn test_poll_load_reports_failure() {
        let mut config = MapConfig::default();
        config.source = data::DataSource::parse("definitely/not/here.geojson");
        let mut app = App::new(config, 100, 40);
        app.start_loading();

        for _ in 0..500 {
            app.poll_load();
            if app.load_status != LoadStatus::Loading {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(matches!(app.load_status, LoadStatus::Failed(_)));
    }

    #[test]
    fn test_pointer_outside_map_is_leave() {
        let mut app = app();
        let (col, row) = app.cell_at(52.85, 57.0).unwrap();
        app.pointer_move(col, row);
        assert!(app.hovered.is_some());

        app.pointer_move(0, 0); // border
        assert!(app.hovered.is_none());
        assert!(app.popup.is_none());
    }

    #[test]
    fn test_drag_pans_and_suppresses_click() {
        let mut app = app();
        let (col, row) = app.cell_at(52.85, 57.0).unwrap();
        let center = app.viewport.center_lon;

        app.begin_drag(col, row);
        app.handle_drag(col + 3, row);
        app.end_drag(col + 3, row);

        assert!(app.viewport.center_lon < center);
        assert!(!app.has_modal());
    }

    #[test]
    fn test_release_without_drag_clicks() {
        let mut app = app();
        let (col, row) = app.cell_at(53.75, 57.0).unwrap();
        app.begin_drag(col, row);
        app.end_drag(col, row);
        assert_eq!(app.detail.as_ref().map(|d| d.region().name.as_str()), Some("East"));
    }

    #[test]
    fn test_navigation_targets_modal_when_open() {
        let mut app = app();
        app.hover(FeatureId(0), "West", 52.85, 57.0);
        app.open_hovered();
        assert!(app.has_modal());

        let main_zoom = app.viewport.zoom;
        let detail_zoom = app.detail.as_ref().unwrap().viewport().zoom;
        app.zoom_in();
        assert_eq!(app.viewport.zoom, main_zoom);
        assert!(app.detail.as_ref().unwrap().viewport().zoom > detail_zoom);
    }

    #[test]
    fn test_fit_without_data_keeps_camera() {
        let mut app = App::new(MapConfig::default(), 100, 40);
        let before = (app.viewport.center_lon, app.viewport.center_lat, app.viewport.zoom);
        app.fit();
        assert_eq!((app.viewport.center_lon, app.viewport.center_lat, app.viewport.zoom), before);
    }

    #[test]
    fn test_fit_and_reset() {
        let mut app = app();
        app.fit();
        let bounds = app.map_renderer.source().bounds();
        assert!(app.cell_at(bounds.min.x, bounds.min.y).is_some());
        assert!(app.cell_at(bounds.max.x, bounds.max.y).is_some());

        app.pan(50, 50);
        app.reset_view();
        assert_eq!(app.viewport.center_lon, 53.233);
        assert_eq!(app.viewport.center_lat, 57.0);
    }

    #[test]
    fn test_resize_updates_both_maps() {
        let mut app = app();
        app.hover(FeatureId(1), "East", 53.75, 57.0);
        app.open_hovered();
        app.resize(60, 20);
        assert_eq!(app.viewport.width, 116);
        let (w, h) = layout::canvas_pixels(app.modal_inner());
        assert_eq!(app.detail.as_ref().unwrap().viewport().width, w);
        assert_eq!(app.detail.as_ref().unwrap().viewport().height, h);
    }
}
