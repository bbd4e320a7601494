use serde::Serialize;

/// Axis-aligned bounding box in pixel coordinates.
///
/// Boxes are plain values: every stage that changes geometry builds a new box
/// instead of mutating one in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a box from inclusive pixel extents (as produced by contour tracing).
    pub fn from_extents(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn intersection_area(&self, other: &BoundingBox) -> u64 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        if x2 <= x1 || y2 <= y1 {
            return 0;
        }
        (x2 - x1) as u64 * (y2 - y1) as u64
    }

    /// Intersection over union, with a small epsilon in the denominator.
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let inter = self.intersection_area(other) as f64;
        let union = self.area() as f64 + other.area() as f64 - inter;
        inter / (union + 1e-5)
    }

    /// Smallest box enclosing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BoundingBox {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// True when `other` lies inside this box; shared edges count as inside.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Grow by `padding` on every side, clamped to a `width` x `height` image.
    pub fn padded(&self, padding: u32, width: u32, height: u32) -> BoundingBox {
        let x1 = self.x.saturating_sub(padding);
        let y1 = self.y.saturating_sub(padding);
        let x2 = (self.right() + padding).min(width);
        let y2 = (self.bottom() + padding).min(height);
        BoundingBox {
            x: x1,
            y: y1,
            width: x2.saturating_sub(x1),
            height: y2.saturating_sub(y1),
        }
    }
}

/// One horizontal line of letters, in reading order once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    top: u32,
    boxes: Vec<BoundingBox>,
}

impl Row {
    pub(crate) fn new(top: u32, boxes: Vec<BoundingBox>) -> Self {
        Self { top, boxes }
    }

    /// Top edge of the box that opened this row.
    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn into_boxes(self) -> Vec<BoundingBox> {
        self.boxes
    }
}
