use crate::geo::{from_mercator, to_mercator, Bounds, MAX_LAT};
use glam::DVec2;

/// Braille pixels spanned by the world at zoom level 0.
/// One Braille dot is roughly four screen pixels of a 512px web tile.
pub const WORLD_PIXELS_AT_LEVEL_0: f64 = 128.0;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 100_000.0;
const ZOOM_STEP: f64 = 1.5;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// World widths per canvas width (higher = more zoomed in)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat: center_lat.clamp(-MAX_LAT, MAX_LAT),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    /// Build a viewport from a web-map zoom level (0 = whole world in one tile)
    pub fn from_zoom_level(lon: f64, lat: f64, level: f64, width: usize, height: usize) -> Self {
        let world_pixels = WORLD_PIXELS_AT_LEVEL_0 * 2f64.powf(level);
        let zoom = world_pixels / width.max(1) as f64;
        Self::new(lon, lat, zoom, width, height)
    }

    /// Equivalent web-map zoom level of the current zoom factor
    pub fn zoom_level(&self) -> f64 {
        (self.scale() / WORLD_PIXELS_AT_LEVEL_0).log2()
    }

    /// Pixels per normalized Mercator unit
    #[inline(always)]
    fn scale(&self) -> f64 {
        self.zoom * self.width.max(1) as f64
    }

    #[inline(always)]
    fn half_size(&self) -> DVec2 {
        DVec2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let center = to_mercator(self.center_lon, self.center_lat);
        let moved = center + DVec2::new(dx as f64, dy as f64) / self.scale();
        let (mut lon, lat) = from_mercator(moved);

        if lon > 180.0 {
            lon -= 360.0;
        } else if lon < -180.0 {
            lon += 360.0;
        }

        self.center_lon = lon;
        self.center_lat = lat.clamp(-MAX_LAT, MAX_LAT);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    /// Zoom by factor keeping the point under (px, py) in place
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);

        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Move the camera so `bounds` fills the canvas minus `padding` pixels on every side
    pub fn fit_bounds(&mut self, bounds: &Bounds, padding: usize) {
        if bounds.is_empty() {
            return;
        }

        let nw = to_mercator(bounds.min.x, bounds.max.y);
        let se = to_mercator(bounds.max.x, bounds.min.y);
        let span = (se - nw).abs();

        let (lon, lat) = from_mercator((nw + se) * 0.5);
        self.center_lon = lon;
        self.center_lat = lat.clamp(-MAX_LAT, MAX_LAT);

        if span.x <= 0.0 && span.y <= 0.0 {
            return;
        }

        let avail_w = (self.width as f64 - 2.0 * padding as f64).max(1.0);
        let avail_h = (self.height as f64 - 2.0 * padding as f64).max(1.0);
        let sx = if span.x > 0.0 { avail_w / span.x } else { f64::INFINITY };
        let sy = if span.y > 0.0 { avail_h / span.y } else { f64::INFINITY };
        let scale = sx.min(sy);

        self.zoom = (scale / self.width.max(1) as f64).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let center = to_mercator(self.center_lon, self.center_lat);
        let offset = DVec2::new(px as f64, py as f64) - self.half_size();
        from_mercator(center + offset / self.scale())
    }

    /// Project to fractional pixel coordinates (used by fills)
    pub fn project_f(&self, lon: f64, lat: f64) -> DVec2 {
        let p = to_mercator(lon, lat);
        let center = to_mercator(self.center_lon, self.center_lat);
        (p - center) * self.scale() + self.half_size()
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let p = self.project_f(lon, lat);
        (p.x.floor() as i32, p.y.floor() as i32)
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }

    /// Check if lon/lat bounds overlap the visible canvas
    pub fn bounds_might_be_visible(&self, bounds: &Bounds) -> bool {
        let nw = self.project_f(bounds.min.x, bounds.max.y);
        let se = self.project_f(bounds.max.x, bounds.min.y);
        se.x >= 0.0 && nw.x < self.width as f64 && se.y >= 0.0 && nw.y < self.height as f64
    }
}
