use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, GrayImage, Rgb};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use log::debug;

use crate::error::{HandfontError, HandfontResult};
use crate::models::BoundingBox;

/// Data that flows between segmentation stages.
///
/// The grayscale page is shared read-only by every stage; the box list is owned
/// by whichever stage is currently running and replaced wholesale on output.
#[derive(Clone)]
pub struct PipelineData {
    /// The decoded page, never modified.
    pub original: Arc<GrayImage>,

    /// Binary foreground mask (255 = ink), once the binarizer has run.
    pub mask: Option<GrayImage>,

    /// Candidate letter regions.
    pub boxes: Vec<BoundingBox>,
}

impl PipelineData {
    pub fn from_image(image: GrayImage) -> Self {
        Self {
            original: Arc::new(image),
            mask: None,
            boxes: Vec::new(),
        }
    }

    pub fn with_boxes(self, boxes: Vec<BoundingBox>) -> Self {
        Self { boxes, ..self }
    }

    /// Render the current state for debugging: the mask while no boxes exist,
    /// otherwise the page with every box outlined.
    pub fn visualize(&self) -> DynamicImage {
        if self.boxes.is_empty() {
            if let Some(mask) = &self.mask {
                return DynamicImage::ImageLuma8(mask.clone());
            }
        }

        let mut canvas = DynamicImage::ImageLuma8(self.original.as_ref().clone()).to_rgb8();
        let red = Rgb([255, 0, 0]);
        for b in &self.boxes {
            let rect = Rect::at(b.x as i32, b.y as i32).of_size(b.width, b.height);
            draw_hollow_rect_mut(&mut canvas, rect, red);
        }
        DynamicImage::ImageRgb8(canvas)
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Directory receiving one image per stage
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    fn save_debug(&self, data: &PipelineData, file_name: &str) -> HandfontResult<()> {
        let Some(debug_config) = &self.debug else {
            return Ok(());
        };
        let path = debug_config.output_dir.join(file_name);
        data.visualize()
            .save(&path)
            .map_err(|source| HandfontError::Encode {
                path: path.clone(),
                source,
            })?;
        debug!("debug: saved {}", path.display());
        Ok(())
    }
}

/// One stage of the segmentation pipeline.
pub trait PipelineStep: Send + Sync {
    /// Consume the previous stage's output and produce this stage's output.
    fn process(&self, data: PipelineData, context: &PipelineContext) -> HandfontResult<PipelineData>;

    /// Human-readable name, also used for debug file names.
    fn name(&self) -> &str;
}

/// Ordered list of stages run strictly one after another.
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable debug dumps. The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: impl AsRef<Path>) -> HandfontResult<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        if output_dir.exists() {
            let mut entries = std::fs::read_dir(&output_dir)
                .map_err(|e| HandfontError::io("reading debug directory", &output_dir, e))?;
            if entries.next().is_some() {
                return Err(HandfontError::config(format!(
                    "debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)
                .map_err(|e| HandfontError::io("creating debug directory", &output_dir, e))?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Run every step on a grayscale page.
    pub fn run(&self, input: GrayImage) -> HandfontResult<PipelineData> {
        self.run_partial(input, self.steps.len())
    }

    /// Run only the first `num_steps` steps.
    pub fn run_partial(&self, input: GrayImage, num_steps: usize) -> HandfontResult<PipelineData> {
        let mut data = PipelineData::from_image(input);
        self.context.save_debug(&data, "00_input.png")?;

        for (idx, step) in self.steps.iter().take(num_steps).enumerate() {
            debug!("running step: {} ({} boxes in)", step.name(), data.boxes.len());
            data = step.process(data, &self.context)?;
            debug!("  -> {} boxes", data.boxes.len());

            let file_name = format!(
                "{:02}_{}.png",
                idx + 1,
                step.name().to_lowercase().replace(' ', "_")
            );
            self.context.save_debug(&data, &file_name)?;
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
