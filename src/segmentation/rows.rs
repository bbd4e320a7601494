use crate::models::{BoundingBox, Row};

/// Group boxes into text rows, top to bottom, each row right to left.
///
/// Boxes are visited by ascending top edge. Each joins the first row whose
/// opening box has a top edge closer than the candidate's own height, or opens
/// a new row. A box is never reconsidered once placed.
pub fn cluster_rows(boxes: &[BoundingBox]) -> Vec<Row> {
    let mut sorted = boxes.to_vec();
    sorted.sort_by_key(|b| b.y);

    let mut rows: Vec<Vec<BoundingBox>> = Vec::new();
    for b in sorted {
        match rows.iter_mut().find(|row| row[0].y.abs_diff(b.y) < b.height) {
            Some(row) => row.push(b),
            None => rows.push(vec![b]),
        }
    }

    rows.sort_by_key(|row| row[0].y);
    rows.into_iter()
        .map(|mut row| {
            let top = row[0].y;
            // Hebrew reads right to left
            row.sort_by(|a, b| b.x.cmp(&a.x));
            Row::new(top, row)
        })
        .collect()
}

/// Rows concatenated into a single reading-order sequence.
pub fn reading_order(boxes: &[BoundingBox]) -> Vec<BoundingBox> {
    cluster_rows(boxes)
        .into_iter()
        .flat_map(Row::into_boxes)
        .collect()
}
