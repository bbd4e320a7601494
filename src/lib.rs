pub mod alphabet;
pub mod arena;
pub mod config;
pub mod error;
pub mod font;
pub mod models;
pub mod pipeline;
pub mod result;
pub mod segmentation;

pub use alphabet::{Letter, LetterAlphabet};
pub use arena::OutputArena;
pub use config::{FontMetrics, MergePolicy, SegmenterConfig};
pub use error::{ErrorKind, HandfontError, HandfontResult};
pub use font::{FontBuild, FontBuilder, FontCompiler, Glyph, LetterFile, Outline, Tracer};
pub use models::{BoundingBox, Row};
pub use pipeline::{Pipeline, PipelineContext, PipelineData, PipelineStep};
pub use result::{SegmentationResult, SegmentationStatus};
pub use segmentation::{LetterCrop, SegmentOutcome, Segmenter, segment};
