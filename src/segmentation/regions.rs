use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};

use crate::models::BoundingBox;

/// Bounding boxes of the outermost contours in a binary mask (non-zero = ink).
///
/// Holes, and anything drawn inside a hole, are ignored. Output order follows
/// the raster scan that discovered each contour and carries no other meaning.
pub fn find_boxes(mask: &GrayImage) -> Vec<BoundingBox> {
    // Ink touching the image edge would otherwise be traced as a frame-level
    // hole with every other component nested under it.
    let (width, height) = mask.dimensions();
    let mut framed = GrayImage::new(width + 2, height + 2);
    image::imageops::replace(&mut framed, mask, 1, 1);

    find_contours::<u32>(&framed)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| {
            let first = c.points.first()?;
            let init = (first.x, first.y, first.x, first.y);
            let (min_x, min_y, max_x, max_y) =
                c.points.iter().fold(init, |(min_x, min_y, max_x, max_y), p| {
                    (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
                });
            Some(BoundingBox::from_extents(min_x - 1, min_y - 1, max_x - 1, max_y - 1))
        })
        .collect()
}
