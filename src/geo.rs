use glam::DVec2;
use std::f64::consts::PI;

/// Latitude limit of the Web Mercator projection
pub const MAX_LAT: f64 = 85.0;

/// Project lon/lat to normalized Web Mercator coordinates in [0, 1]
#[inline(always)]
pub fn to_mercator(lon: f64, lat: f64) -> DVec2 {
    let x = (lon + 180.0) / 360.0;
    let lat_rad = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    DVec2::new(x, y)
}

/// Inverse of [`to_mercator`]
#[inline(always)]
pub fn from_mercator(p: DVec2) -> (f64, f64) {
    let lon = p.x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * p.y)).sinh().atan().to_degrees();
    (lon, lat)
}

/// Axis-aligned lon/lat bounding box (x = lon, y = lat)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Empty bounds; extending with any point yields that point
    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min: DVec2::new(min_lon, min_lat),
            max: DVec2::new(max_lon, max_lat),
        }
    }

    pub fn extend(&mut self, lon: f64, lat: f64) {
        let p = DVec2::new(lon, lat);
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min.x && lon <= self.max.x && lat >= self.min.y && lat <= self.max.y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}
