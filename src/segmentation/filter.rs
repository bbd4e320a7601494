use crate::models::BoundingBox;

/// Drop speckle below `min_area`, then drop every box enclosed by another
/// surviving box (shared edges count as enclosed).
///
/// Exact duplicates keep their first occurrence. Output order is the input
/// order of the survivors.
pub fn filter_boxes(boxes: &[BoundingBox], min_area: u64) -> Vec<BoundingBox> {
    let sized: Vec<BoundingBox> = boxes
        .iter()
        .copied()
        .filter(|b| b.area() >= min_area)
        .collect();

    sized
        .iter()
        .enumerate()
        .filter(|&(i, b)| {
            !sized.iter().enumerate().any(|(j, other)| {
                if i == j {
                    false
                } else if other == b {
                    j < i
                } else {
                    other.contains(b)
                }
            })
        })
        .map(|(_, b)| *b)
        .collect()
}
