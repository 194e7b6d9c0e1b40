use crate::geo::Bounds;
use std::collections::HashMap;

/// Spatial index for region lookups using conservative approximation.
/// Each region's bounding box is indexed into every cell it overlaps,
/// guaranteeing no false negatives while allowing false positives
/// (eliminated by the exact point-in-polygon test in the renderer).
pub struct RegionIndex {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl RegionIndex {
    /// Target number of cells along the longer side of the collection extent
    const CELLS_PER_EXTENT: f64 = 32.0;

    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Cell size that splits `extent` into a grid of manageable size
    pub fn cell_size_for(extent: &Bounds) -> f64 {
        if extent.is_empty() {
            return 1.0;
        }
        let size = extent.max - extent.min;
        let longest = size.x.max(size.y);
        if longest > 0.0 {
            longest / Self::CELLS_PER_EXTENT
        } else {
            1.0
        }
    }

    /// Build from region bounding boxes; the index of each box is its region index
    pub fn build<'a>(bounds: impl Iterator<Item = &'a Bounds>, cell_size: f64) -> Self {
        let mut index = Self::new(cell_size);
        for (idx, b) in bounds.enumerate() {
            if b.is_empty() {
                continue;
            }
            let min_cell = index.to_cell(b.min.x, b.min.y);
            let max_cell = index.to_cell(b.max.x, b.max.y);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    index.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        index
    }

    /// Candidate region indices whose bounding boxes may contain the point, ascending
    pub fn query_point(&self, lon: f64, lat: f64) -> &[usize] {
        self.cells
            .get(&self.to_cell(lon, lat))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_point_returns_overlapping_boxes() {
        let boxes = [
            Bounds::new(0.0, 0.0, 1.0, 1.0),
            Bounds::new(0.5, 0.5, 2.0, 2.0),
            Bounds::new(5.0, 5.0, 6.0, 6.0),
        ];
        let index = RegionIndex::build(boxes.iter(), 0.25);

        assert_eq!(index.query_point(0.1, 0.1), &[0]);
        assert_eq!(index.query_point(0.8, 0.8), &[0, 1]);
        assert_eq!(index.query_point(5.5, 5.5), &[2]);
        assert!(index.query_point(3.0, 3.0).is_empty());
    }

    #[test]
    fn test_cell_size_for_extent() {
        let extent = Bounds::new(51.0, 55.8, 54.5, 58.6);
        let size = RegionIndex::cell_size_for(&extent);
        assert!((size - 3.5 / 32.0).abs() < 1e-12);
        assert_eq!(RegionIndex::cell_size_for(&Bounds::empty()), 1.0);
    }

    #[test]
    fn test_empty_bounds_not_indexed() {
        let boxes = [Bounds::empty(), Bounds::new(0.0, 0.0, 1.0, 1.0)];
        let index = RegionIndex::build(boxes.iter(), 1.0);
        assert_eq!(index.query_point(0.5, 0.5), &[1]);
    }
}
