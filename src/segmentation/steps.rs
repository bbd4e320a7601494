use crate::config::MergePolicy;
use crate::error::HandfontResult;
use crate::pipeline::{PipelineContext, PipelineData, PipelineStep};
use crate::segmentation::{binarize, filter, merge, regions, rows};

/// Otsu binarization followed by dilation and closing
pub struct BinarizeStep {
    pub kernel_radius: u8,
}

impl PipelineStep for BinarizeStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> HandfontResult<PipelineData> {
        let mask = binarize::binarize(&data.original, self.kernel_radius);
        Ok(PipelineData {
            mask: Some(mask),
            ..data
        })
    }

    fn name(&self) -> &str {
        "Binarize"
    }
}

/// Bounding boxes of external contours in the mask
pub struct RegionProposalStep;

impl PipelineStep for RegionProposalStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> HandfontResult<PipelineData> {
        let boxes = match &data.mask {
            Some(mask) => regions::find_boxes(mask),
            None => regions::find_boxes(&binarize::ink_mask(&data.original)),
        };
        Ok(data.with_boxes(boxes))
    }

    fn name(&self) -> &str {
        "Region Proposal"
    }
}

/// Merge fragments of the same letter
pub struct BoxMergeStep {
    pub iou_threshold: f64,
    pub proximity: u32,
    pub policy: MergePolicy,
}

impl PipelineStep for BoxMergeStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> HandfontResult<PipelineData> {
        let merged = merge::merge_boxes(&data.boxes, self.iou_threshold, self.proximity, self.policy);
        Ok(data.with_boxes(merged))
    }

    fn name(&self) -> &str {
        "Box Merge"
    }
}

/// Drop speckle and nested boxes
pub struct ContainmentFilterStep {
    pub min_area: u64,
}

impl PipelineStep for ContainmentFilterStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> HandfontResult<PipelineData> {
        let kept = filter::filter_boxes(&data.boxes, self.min_area);
        Ok(data.with_boxes(kept))
    }

    fn name(&self) -> &str {
        "Containment Filter"
    }
}

/// Sort boxes into reading order (rows top to bottom, right to left)
pub struct ReadingOrderStep;

impl PipelineStep for ReadingOrderStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> HandfontResult<PipelineData> {
        let ordered = rows::reading_order(&data.boxes);
        Ok(data.with_boxes(ordered))
    }

    fn name(&self) -> &str {
        "Reading Order"
    }
}
