use crate::braille::BrailleCanvas;
use glam::DVec2;

/// Ordered dither thresholds used to turn fill opacity into dot density
const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Two-pixel-wide line for emphasised outlines
pub fn draw_thick_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    draw_line(canvas, x0, y0, x1, y1);
    draw_line(canvas, x0 + 1, y0, x1 + 1, y1);
    draw_line(canvas, x0, y0 + 1, x1, y1 + 1);
}

/// Whether a dot at (x, y) is lit for a fill of the given opacity
#[inline(always)]
pub fn dither_on(x: usize, y: usize, opacity: f64) -> bool {
    (BAYER_4X4[y % 4][x % 4] as f64 + 0.5) / 16.0 < opacity
}

/// Even-odd scanline fill of pixel-space rings, dithered by opacity.
/// Dots are sampled at pixel centers; holes fall out of the even-odd rule.
pub fn fill_rings(canvas: &mut BrailleCanvas, rings: &[Vec<DVec2>], opacity: f64) {
    let width = canvas.pixel_width();
    let height = canvas.pixel_height();
    if opacity <= 0.0 || width == 0 || height == 0 {
        return;
    }

    let (min_y, max_y) = rings
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    if !min_y.is_finite() || max_y < 0.0 || min_y >= height as f64 {
        return;
    }

    let y_start = min_y.floor().max(0.0) as usize;
    let y_end = (max_y.ceil() as usize).min(height - 1);
    let mut crossings: Vec<f64> = Vec::new();

    for y in y_start..=y_end {
        let sy = y as f64 + 0.5;
        crossings.clear();

        for ring in rings {
            let n = ring.len();
            for i in 0..n {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                if (a.y <= sy) != (b.y <= sy) {
                    let t = (sy - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
        }

        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            let x0 = (span[0] - 0.5).ceil().max(0.0);
            let x1 = (span[1] - 0.5).floor().min(width as f64 - 1.0);
            if x1 < x0 {
                continue;
            }
            for x in x0 as usize..=x1 as usize {
                if dither_on(x, y, opacity) {
                    canvas.set_pixel(x, y);
                }
            }
        }
    }
}

/// Even-odd point-in-polygon test over all rings of one polygon
pub fn point_in_rings(rings: &[Vec<(f64, f64)>], x: f64, y: f64) -> bool {
    let mut inside = false;
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = ring[i];
            let (xj, yj) = ring[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}
