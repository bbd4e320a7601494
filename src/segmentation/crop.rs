use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat};

use crate::alphabet::{Letter, LetterAlphabet};
use crate::error::{HandfontError, HandfontResult};
use crate::models::BoundingBox;

/// One letter slot: a detected region paired by position with an alphabet entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LetterCrop {
    pub index: usize,
    pub letter: Letter,
    /// Region as detected.
    pub source: BoundingBox,
    /// Region actually cropped: padded and clamped to the page.
    pub region: BoundingBox,
    pub file_name: String,
}

/// Pair the first `alphabet.len()` ordered boxes with the alphabet, in order.
/// Extra boxes are discarded; missing boxes leave the tail of the alphabet unused.
pub fn plan_letters(
    ordered: &[BoundingBox],
    alphabet: &LetterAlphabet,
    padding: u32,
    page_size: (u32, u32),
    extension: &str,
) -> Vec<LetterCrop> {
    let (width, height) = page_size;
    ordered
        .iter()
        .zip(alphabet.iter())
        .enumerate()
        .map(|(index, (source, letter))| LetterCrop {
            index,
            letter: letter.clone(),
            source: *source,
            region: source.padded(padding, width, height),
            file_name: letter.file_name(index, extension),
        })
        .collect()
}

pub fn crop_region(page: &GrayImage, region: &BoundingBox) -> GrayImage {
    image::imageops::crop_imm(page, region.x, region.y, region.width, region.height).to_image()
}

/// Crop one planned letter out of the page and write it into `output_dir`.
pub fn save_crop(
    page: &GrayImage,
    crop: &LetterCrop,
    output_dir: &Path,
    format: ImageFormat,
) -> HandfontResult<PathBuf> {
    let path = output_dir.join(&crop.file_name);
    crop_region(page, &crop.region)
        .save_with_format(&path, format)
        .map_err(|source| HandfontError::Encode {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
