use crate::braille::BrailleCanvas;
use crate::data::{Region, RegionCollection};
use crate::map::feature_state::{FeatureId, FeatureStateStore};
use crate::map::geometry::{draw_line, draw_thick_line, fill_rings};
use crate::map::projection::Viewport;
use crate::map::spatial::RegionIndex;
use glam::DVec2;
use ratatui::style::Color;

/// Fill layer paint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillPaint {
    pub color: Color,
    pub opacity: f64,
    /// Opacity used while the feature state has `hover = true`
    pub hover_opacity: f64,
}

/// Outline layer paint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePaint {
    pub color: Color,
    /// 1 or 2 Braille pixels
    pub width: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionPaint {
    pub fill: FillPaint,
    pub outline: LinePaint,
}

impl RegionPaint {
    /// Teal districts on the overview map
    pub fn primary() -> Self {
        Self {
            fill: FillPaint {
                color: Color::Rgb(0x00, 0x88, 0x88),
                opacity: 0.3,
                hover_opacity: 0.7,
            },
            outline: LinePaint {
                color: Color::White,
                width: 1,
            },
        }
    }

    /// Red single district inside the detail modal
    pub fn detail() -> Self {
        Self {
            fill: FillPaint {
                color: Color::Rgb(0xdd, 0x22, 0x22),
                opacity: 0.5,
                hover_opacity: 0.5,
            },
            outline: LinePaint {
                color: Color::White,
                width: 2,
            },
        }
    }
}

/// Rendered layers, drawn back to front
pub struct MapLayers {
    pub fill: BrailleCanvas,
    pub outline: BrailleCanvas,
}

/// Renderer for one GeoJSON source with a fill and an outline layer
pub struct MapRenderer {
    source: RegionCollection,
    index: RegionIndex,
    pub paint: RegionPaint,
}

impl MapRenderer {
    pub fn new(source: RegionCollection, paint: RegionPaint) -> Self {
        let extent = source.bounds();
        let index = RegionIndex::build(
            source.regions().iter().map(|r| &r.bounds),
            RegionIndex::cell_size_for(&extent),
        );
        Self { source, index, paint }
    }

    /// Renderer with no source installed yet
    pub fn empty(paint: RegionPaint) -> Self {
        Self::new(RegionCollection::default(), paint)
    }

    pub fn source(&self) -> &RegionCollection {
        &self.source
    }

    pub fn has_data(&self) -> bool {
        !self.source.is_empty()
    }

    pub fn region(&self, id: FeatureId) -> Option<&Region> {
        self.source.get(id)
    }

    /// Topmost region under a geographic point
    pub fn feature_at(&self, lon: f64, lat: f64) -> Option<&Region> {
        self.index
            .query_point(lon, lat)
            .iter()
            .rev()
            .filter_map(|&idx| self.source.regions().get(idx))
            .find(|region| region.contains(lon, lat))
    }

    /// Render both layers onto canvases of `cols` x `rows` characters
    pub fn render(&self, cols: usize, rows: usize, viewport: &Viewport, states: &FeatureStateStore) -> MapLayers {
        let mut fill = BrailleCanvas::new(cols, rows);
        let mut outline = BrailleCanvas::new(cols, rows);

        for region in self.source.regions() {
            if !viewport.bounds_might_be_visible(&region.bounds) {
                continue;
            }

            let opacity = if states.get(region.id).hover {
                self.paint.fill.hover_opacity
            } else {
                self.paint.fill.opacity
            };

            for polygon in &region.polygons {
                let rings: Vec<Vec<DVec2>> = polygon
                    .iter()
                    .map(|ring| ring.iter().map(|&(lon, lat)| viewport.project_f(lon, lat)).collect())
                    .collect();
                fill_rings(&mut fill, &rings, opacity);

                for ring in polygon {
                    self.draw_ring(&mut outline, ring, viewport);
                }
            }
        }

        MapLayers { fill, outline }
    }

    /// Draw a ring with viewport culling
    fn draw_ring(&self, canvas: &mut BrailleCanvas, ring: &[(f64, f64)], viewport: &Viewport) {
        if ring.len() < 2 {
            return;
        }

        let mut prev: Option<(i32, i32)> = None;

        for &(lon, lat) in ring {
            let (px, py) = viewport.project(lon, lat);

            if let Some((prev_x, prev_y)) = prev {
                if viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                    if self.paint.outline.width >= 2 {
                        draw_thick_line(canvas, prev_x, prev_y, px, py);
                    } else {
                        draw_line(canvas, prev_x, prev_y, px, py);
                    }
                }
            }

            prev = Some((px, py));
        }
    }
}
