//! Letter segmentation: scanned sheet in, one cropped image per letter out.
//!
//! Stages run strictly in order over the shared grayscale page:
//! binarize → region proposal → box merge → containment filter → reading order,
//! after which the ordered boxes are paired with the alphabet and cropped.

pub mod binarize;
pub mod crop;
pub mod filter;
pub mod merge;
pub mod regions;
pub mod rows;
pub mod steps;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{GrayImage, ImageFormat, ImageReader};
use log::{debug, info, warn};

use crate::alphabet::LetterAlphabet;
use crate::config::SegmenterConfig;
use crate::error::{HandfontError, HandfontResult};
use crate::font::LetterFile;
use crate::models::BoundingBox;
use crate::pipeline::Pipeline;
use crate::result::SegmentationResult;

pub use crop::LetterCrop;

/// Letters written by a successful (possibly partial) run.
#[derive(Debug, Clone)]
pub struct SegmentOutcome {
    pub letters: Vec<LetterCrop>,
    pub output_dir: PathBuf,
    /// Regions that survived filtering, before truncation to the alphabet.
    pub region_count: usize,
}

impl SegmentOutcome {
    /// The crops this run wrote, as font builder input.
    pub fn letter_files(&self) -> Vec<LetterFile> {
        self.letters
            .iter()
            .map(|crop| LetterFile {
                index: crop.index,
                letter: crop.letter.clone(),
                path: self.output_dir.join(&crop.file_name),
            })
            .collect()
    }
}

/// Segments one sheet into per-letter crops.
///
/// Holds only immutable configuration, so one instance can serve many calls.
/// Concurrent calls must be given distinct output directories.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
    alphabet: LetterAlphabet,
    debug_dir: Option<PathBuf>,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig, alphabet: LetterAlphabet) -> Self {
        Self {
            config,
            alphabet,
            debug_dir: None,
        }
    }

    /// Dump one visualisation per stage into `dir` (must be empty or absent).
    pub fn with_debug(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    pub fn alphabet(&self) -> &LetterAlphabet {
        &self.alphabet
    }

    /// The box-producing stages, configured from this segmenter.
    pub fn build_pipeline(&self) -> HandfontResult<Pipeline> {
        use steps::*;

        let c = &self.config;
        let pipeline = Pipeline::new()
            .add_step(Arc::new(BinarizeStep {
                kernel_radius: c.kernel_radius,
            }))
            .add_step(Arc::new(RegionProposalStep))
            .add_step(Arc::new(BoxMergeStep {
                iou_threshold: c.iou_threshold,
                proximity: c.proximity,
                policy: c.merge_policy,
            }))
            .add_step(Arc::new(ContainmentFilterStep {
                min_area: c.min_area,
            }))
            .add_step(Arc::new(ReadingOrderStep));

        match &self.debug_dir {
            Some(dir) => pipeline.with_debug(dir),
            None => Ok(pipeline),
        }
    }

    /// Validate the path and decode the page as grayscale.
    pub fn load_page(&self, image_path: &Path) -> HandfontResult<GrayImage> {
        if !image_path.is_file() {
            return Err(HandfontError::invalid_input(format!(
                "image file not found: {}",
                image_path.display()
            )));
        }
        let ext = image_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if !self.config.accepts_extension(ext) {
            return Err(HandfontError::invalid_input(format!(
                "unsupported file type {:?}; expected one of {}",
                ext,
                self.config.allowed_extensions.join(", ")
            )));
        }

        let img = ImageReader::open(image_path)
            .map_err(|e| HandfontError::io("opening image", image_path, e))?
            .with_guessed_format()
            .map_err(|e| HandfontError::io("reading image header", image_path, e))?
            .decode()
            .map_err(|source| HandfontError::Decode {
                path: image_path.to_path_buf(),
                source,
            })?;

        if img.width() == 0 || img.height() == 0 {
            return Err(HandfontError::invalid_input(format!(
                "image has no pixels: {}",
                image_path.display()
            )));
        }
        Ok(binarize::to_grayscale(&img))
    }

    /// Letter regions of a page in reading order, not yet truncated.
    pub fn locate_letters(&self, page: GrayImage) -> HandfontResult<Vec<BoundingBox>> {
        let data = self.build_pipeline()?.run(page)?;
        Ok(data.boxes)
    }

    /// Full run, propagating the first error.
    ///
    /// A failed run leaves no letter files behind. A successful run removes
    /// letter files from earlier runs past the last index it wrote, so the
    /// directory holds exactly the letters of this run.
    pub fn try_segment(&self, image_path: &Path, output_dir: &Path) -> HandfontResult<SegmentOutcome> {
        self.config.validate()?;
        let format = ImageFormat::from_extension(&self.config.output_format)
            .ok_or_else(|| HandfontError::config("unsupported output_format"))?;

        let page = self.load_page(image_path)?;
        let page_size = page.dimensions();
        debug!(
            "loaded {} ({}x{})",
            image_path.display(),
            page_size.0,
            page_size.1
        );

        std::fs::create_dir_all(output_dir)
            .map_err(|e| HandfontError::io("creating output directory", output_dir, e))?;

        let ordered = self.locate_letters(page.clone())?;
        let plan = crop::plan_letters(
            &ordered,
            &self.alphabet,
            self.config.padding,
            page_size,
            &self.config.output_format,
        );
        if ordered.len() > plan.len() {
            debug!(
                "discarding {} regions beyond the alphabet",
                ordered.len() - plan.len()
            );
        }

        let mut written = Vec::with_capacity(plan.len());
        for letter in plan {
            match crop::save_crop(&page, &letter, output_dir, format) {
                Ok(path) => {
                    debug!("wrote {}", path.display());
                    written.push(letter);
                }
                Err(err) => {
                    remove_letters(output_dir, written.iter().map(|l| l.file_name.as_str()));
                    return Err(err);
                }
            }
        }

        let stale: Vec<String> = (written.len()..self.alphabet.len())
            .filter_map(|i| self.alphabet.file_name(i, &self.config.output_format))
            .filter(|name| output_dir.join(name).is_file())
            .collect();
        remove_letters(output_dir, stale.iter().map(String::as_str));

        info!(
            "segmented {} letters from {} regions into {}",
            written.len(),
            ordered.len(),
            output_dir.display()
        );

        Ok(SegmentOutcome {
            letters: written,
            output_dir: output_dir.to_path_buf(),
            region_count: ordered.len(),
        })
    }

    /// Full run folded into a [`SegmentationResult`]; never fails.
    pub fn segment(&self, image_path: &Path, output_dir: &Path) -> SegmentationResult {
        match self.try_segment(image_path, output_dir) {
            Ok(outcome) => {
                let result = SegmentationResult::completed(
                    outcome.letters.len(),
                    self.alphabet.len(),
                    outcome.output_dir,
                );
                if let Some(message) = &result.message {
                    warn!("{message}");
                }
                result
            }
            Err(err) => {
                warn!("segmentation of {} failed: {err}", image_path.display());
                let dir = output_dir.exists().then(|| output_dir.to_path_buf());
                SegmentationResult::failed(&err, dir)
            }
        }
    }
}

/// Best-effort removal of letter files; failures are logged and skipped.
fn remove_letters<'a>(output_dir: &Path, names: impl Iterator<Item = &'a str>) {
    for name in names {
        let path = output_dir.join(name);
        match std::fs::remove_file(&path) {
            Ok(()) => debug!("removed {}", path.display()),
            Err(e) => warn!("could not remove {}: {e}", path.display()),
        }
    }
}

/// Segment with the default configuration and the Hebrew alphabet.
pub fn segment(image_path: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> SegmentationResult {
    Segmenter::default().segment(image_path.as_ref(), output_dir.as_ref())
}
