mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from handfont for tests
pub use handfont::{
    BoundingBox, LetterAlphabet, SegmentationResult, SegmentationStatus, Segmenter,
    SegmenterConfig,
};
