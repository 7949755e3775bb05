use image::DynamicImage;
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// First column to the right of the box.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// First row below the box.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the two boxes share any rows.
    pub fn overlaps_vertically(&self, other: &BoundingBox) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }

    pub fn to_rect(&self) -> Rect {
        Rect::at(self.x as i32, self.y as i32).of_size(self.width, self.height)
    }
}

/// Geometric record for one detected panel: the simplified contour polygon
/// plus its minimal axis-aligned bounding box. Immutable once produced;
/// consumed by the isolator and the boundary visualizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDescriptor {
    pub polygon: Vec<Point<i32>>,
    pub bounding_box: BoundingBox,
}

impl PanelDescriptor {
    /// Build a descriptor from a polygon in page coordinates, computing the
    /// minimal bounding box over its points. Returns `None` for polygons
    /// with fewer than three distinct points, which cannot enclose area.
    ///
    /// A trailing point equal to the first (an explicitly closed ring) is
    /// dropped; the closing edge is implicit everywhere downstream.
    pub fn from_polygon(mut polygon: Vec<Point<i32>>) -> Option<Self> {
        if polygon.len() > 1 && polygon.first() == polygon.last() {
            polygon.pop();
        }
        if polygon.len() < 3 {
            return None;
        }

        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for p in &polygon {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        // Contour points come from pixel coordinates, never negative.
        let min_x = min_x.max(0) as u32;
        let min_y = min_y.max(0) as u32;

        Some(Self {
            polygon,
            bounding_box: BoundingBox {
                x: min_x,
                y: min_y,
                width: max_x as u32 - min_x + 1,
                height: max_y as u32 - min_y + 1,
            },
        })
    }

    /// Polygon translated into the bounding box's local coordinate frame.
    pub fn local_polygon(&self) -> Vec<Point<i32>> {
        let (ox, oy) = (self.bounding_box.x as i32, self.bounding_box.y as i32);
        self.polygon
            .iter()
            .map(|p| Point::new(p.x - ox, p.y - oy))
            .collect()
    }

    /// Whether a page-space point falls inside the bounding box.
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        self.bounding_box.contains_point(x, y)
    }
}

/// Ordered result accumulator for one extraction run.
///
/// `frames[i]` is the isolated crop for `panels[i]`; the two vectors are
/// kept index-aligned by every operation, including chop refinement.
#[derive(Default)]
pub struct ComicPageResult {
    pub panels: Vec<PanelDescriptor>,
    pub frames: Vec<DynamicImage>,
}

impl ComicPageResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_rect_converts_coordinates() {
        let bb = BoundingBox { x: 3, y: 4, width: 10, height: 20 };
        let rect = bb.to_rect();
        assert_eq!(rect.left(), 3);
        assert_eq!(rect.top(), 4);
        assert_eq!(rect.width(), 10);
        assert_eq!(rect.height(), 20);
    }

    #[test]
    fn bounding_box_is_minimal_over_polygon() {
        let poly = vec![
            Point::new(10, 5),
            Point::new(40, 5),
            Point::new(40, 25),
            Point::new(10, 25),
        ];
        let panel = PanelDescriptor::from_polygon(poly).unwrap();
        assert_eq!(
            panel.bounding_box,
            BoundingBox { x: 10, y: 5, width: 31, height: 21 }
        );
    }

    #[test]
    fn closed_ring_is_reopened() {
        let poly = vec![
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(4, 4),
            Point::new(0, 0),
        ];
        let panel = PanelDescriptor::from_polygon(poly).unwrap();
        assert_eq!(panel.polygon.len(), 3);
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        assert!(PanelDescriptor::from_polygon(vec![Point::new(1, 1), Point::new(2, 2)]).is_none());
        assert!(PanelDescriptor::from_polygon(Vec::new()).is_none());
    }

    #[test]
    fn local_polygon_subtracts_origin() {
        let poly = vec![Point::new(10, 20), Point::new(30, 20), Point::new(30, 40)];
        let panel = PanelDescriptor::from_polygon(poly).unwrap();
        let local = panel.local_polygon();
        assert_eq!(local[0], Point::new(0, 0));
        assert_eq!(local[2], Point::new(20, 20));
    }
}
