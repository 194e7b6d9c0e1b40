/// Braille Unicode canvas for terminal graphics.
/// Each character cell holds a 2x4 dot grid; cell bits map onto U+2800..U+28FF.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<u8>,
}

/// Dot bit for (x % 2, y % 4):
/// ```text
/// (0,0) (1,0)   bits: 0x01 0x08
/// (0,1) (1,1)   bits: 0x02 0x10
/// (0,2) (1,2)   bits: 0x04 0x20
/// (0,3) (1,3)   bits: 0x40 0x80
/// ```
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

impl BrailleCanvas {
    /// Create a canvas with the given character dimensions.
    /// Pixel resolution is width*2 x height*4.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let cx = x / 2;
        let cy = y / 4;
        if cx >= self.width || cy >= self.height {
            return;
        }
        self.cells[cy * self.width + cx] |= DOT_BITS[y % 4][x % 2];
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return false;
        }
        self.cells[cy * self.width + cx] & DOT_BITS[y % 4][x % 2] != 0
    }

    /// Braille glyph at a character cell; `None` when no dot is lit
    pub fn glyph(&self, cx: usize, cy: usize) -> Option<char> {
        if cx >= self.width || cy >= self.height {
            return None;
        }
        match self.cells[cy * self.width + cx] {
            0 => None,
            bits => char::from_u32(0x2800 + bits as u32),
        }
    }

    /// Number of lit dots
    pub fn count_dots(&self) -> usize {
        self.cells.iter().map(|b| b.count_ones() as usize).sum()
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|cy| {
                (0..self.width)
                    .map(|cx| self.glyph(cx, cy).unwrap_or('\u{2800}'))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.to_string(), "⠁");
        assert!(canvas.is_set(0, 0));
        assert!(!canvas.is_set(1, 0));
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(canvas.to_string(), "⣿");
        assert_eq!(canvas.count_dots(), 8);
    }

    #[test]
    fn test_diagonal() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(0, 0);
        canvas.set_pixel(1, 1);
        canvas.set_pixel(2, 2);
        canvas.set_pixel(3, 3);
        assert_eq!(canvas.to_string(), "⠑⢄");
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(4, 0);
        canvas.set_pixel(0, 8);
        canvas.set_pixel_signed(-1, 3);
        assert_eq!(canvas.count_dots(), 0);
        assert_eq!(canvas.glyph(0, 0), None);
        assert_eq!(canvas.glyph(5, 5), None);
    }

    #[test]
    fn test_zero_sized_canvas() {
        let mut canvas = BrailleCanvas::new(0, 0);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.pixel_width(), 0);
        assert_eq!(canvas.count_dots(), 0);
    }
}
