//! Greedy merging of letter fragments.
//!
//! For each unused seed box, in input order, a forward sweep over the later
//! unused boxes absorbs every box that either overlaps the growing accumulator
//! (IoU above the threshold) or starts near the seed (both top-left coordinates
//! closer than `proximity`). One sweep is not transitively closed: a box passed
//! over before the accumulator grew toward it is not revisited.
//! [`MergePolicy::FixedPoint`] repeats sweeps until nothing merges.

use crate::config::MergePolicy;
use crate::models::BoundingBox;

fn starts_near(seed: &BoundingBox, other: &BoundingBox, proximity: u32) -> bool {
    seed.x.abs_diff(other.x) < proximity && seed.y.abs_diff(other.y) < proximity
}

/// One forward merging sweep. O(n²) in the number of boxes.
pub fn merge_once(boxes: &[BoundingBox], iou_threshold: f64, proximity: u32) -> Vec<BoundingBox> {
    let mut merged = Vec::with_capacity(boxes.len());
    let mut used = vec![false; boxes.len()];

    for i in 0..boxes.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let seed = boxes[i];
        let mut acc = seed;

        for j in (i + 1)..boxes.len() {
            if used[j] {
                continue;
            }
            let candidate = boxes[j];
            if acc.iou(&candidate) > iou_threshold || starts_near(&seed, &candidate, proximity) {
                acc = acc.union(&candidate);
                used[j] = true;
            }
        }
        merged.push(acc);
    }

    merged
}

/// Repeat [`merge_once`] until a sweep merges nothing.
pub fn merge_to_fixed_point(
    boxes: &[BoundingBox],
    iou_threshold: f64,
    proximity: u32,
) -> Vec<BoundingBox> {
    let mut current = merge_once(boxes, iou_threshold, proximity);
    loop {
        let next = merge_once(&current, iou_threshold, proximity);
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

pub fn merge_boxes(
    boxes: &[BoundingBox],
    iou_threshold: f64,
    proximity: u32,
    policy: MergePolicy,
) -> Vec<BoundingBox> {
    match policy {
        MergePolicy::SinglePass => merge_once(boxes, iou_threshold, proximity),
        MergePolicy::FixedPoint => merge_to_fixed_point(boxes, iou_threshold, proximity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IOU: f64 = 0.2;
    const NEAR: u32 = 20;

    #[test]
    fn overlapping_strokes_merge() {
        // IoU ~0.3, top-left corners 54px apart
        let a = BoundingBox::new(0, 0, 100, 100);
        let b = BoundingBox::new(54, 0, 100, 100);
        let merged = merge_once(&[a, b], IOU, NEAR);
        assert_eq!(merged, vec![BoundingBox::new(0, 0, 154, 100)]);
    }

    #[test]
    fn weak_overlap_far_apart_stays_separate() {
        let a = BoundingBox::new(0, 0, 100, 100);
        let b = BoundingBox::new(85, 0, 100, 100);
        assert!(a.iou(&b) < IOU);
        assert_eq!(merge_once(&[a, b], IOU, NEAR).len(), 2);
    }

    #[test]
    fn nearby_top_left_corners_merge_without_overlap() {
        // a dot above a stroke: disjoint, corners 15px apart on both axes
        let dot = BoundingBox::new(100, 100, 5, 5);
        let stroke = BoundingBox::new(110, 115, 8, 30);
        assert_eq!(dot.iou(&stroke), 0.0);
        let merged = merge_once(&[dot, stroke], IOU, NEAR);
        assert_eq!(merged, vec![BoundingBox::new(100, 100, 18, 45)]);
    }

    #[test]
    fn proximity_is_strict() {
        let a = BoundingBox::new(0, 0, 5, 5);
        let b = BoundingBox::new(20, 0, 5, 5);
        assert_eq!(merge_once(&[a, b], IOU, NEAR).len(), 2);
    }

    #[test]
    fn proximity_is_measured_from_the_seed() {
        // b is near a; c is near b but not near a and does not overlap a+b
        let a = BoundingBox::new(0, 0, 5, 5);
        let b = BoundingBox::new(15, 0, 5, 5);
        let c = BoundingBox::new(30, 0, 5, 5);
        let merged = merge_once(&[a, b, c], IOU, NEAR);
        assert_eq!(merged, vec![BoundingBox::new(0, 0, 20, 5), c]);
    }

    /// A is swept before B grows the accumulator toward C.
    fn chain() -> [BoundingBox; 3] {
        let a = BoundingBox::new(0, 0, 40, 40);
        let c = BoundingBox::new(30, 0, 40, 40);
        let b = BoundingBox::new(25, 0, 20, 40);
        [a, c, b]
    }

    #[test]
    fn single_pass_misses_late_chains() {
        let merged = merge_boxes(&chain(), IOU, NEAR, MergePolicy::SinglePass);
        assert_eq!(
            merged,
            vec![BoundingBox::new(0, 0, 45, 40), BoundingBox::new(30, 0, 40, 40)]
        );
    }

    #[test]
    fn fixed_point_closes_chains() {
        let merged = merge_boxes(&chain(), IOU, NEAR, MergePolicy::FixedPoint);
        assert_eq!(merged, vec![BoundingBox::new(0, 0, 70, 40)]);
    }

    #[test]
    fn empty_input() {
        assert!(merge_once(&[], IOU, NEAR).is_empty());
        assert!(merge_to_fixed_point(&[], IOU, NEAR).is_empty());
    }
}
