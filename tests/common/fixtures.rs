use std::path::{Path, PathBuf};

use handfont::BoundingBox;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

pub const PAPER: Luma<u8> = Luma([245]);
pub const INK: Luma<u8> = Luma([20]);

/// Blob geometry on a synthetic sheet: (x, y, width, height).
pub type Blob = (u32, u32, u32, u32);

/// Draws filled ink rectangles on a blank sheet.
pub fn draw_sheet(width: u32, height: u32, blobs: &[Blob]) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, PAPER);
    for &(x, y, w, h) in blobs {
        draw_filled_rect_mut(&mut img, Rect::at(x as i32, y as i32).of_size(w, h), INK);
    }
    img
}

/// Saves a sheet as PNG inside `dir` and returns its path.
pub fn save_sheet(dir: &Path, name: &str, img: &GrayImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test sheet");
    path
}

/// `rows` x `cols` grid of 30x40 blobs, 60px apart horizontally and 100px
/// vertically, listed row by row from left to right.
pub fn grid_blobs(rows: u32, cols: u32) -> Vec<Blob> {
    let mut blobs = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            blobs.push((40 + c * 60, 40 + r * 100, 30, 40));
        }
    }
    blobs
}

/// Sheet size that fits a `rows` x `cols` grid with margins.
pub fn grid_size(rows: u32, cols: u32) -> (u32, u32) {
    (40 + cols * 60 + 20, 40 + rows * 100 - 10)
}

/// Bounding box the pipeline reports for a blob: 3x3 dilation grows it by one
/// pixel on every side.
pub fn detected(blob: Blob) -> BoundingBox {
    let (x, y, w, h) = blob;
    BoundingBox::new(x - 1, y - 1, w + 2, h + 2)
}

/// Blobs in the order the letters should come out: rows top to bottom,
/// right to left within a row.
pub fn hebrew_order(rows: u32, cols: u32) -> Vec<Blob> {
    let grid = grid_blobs(rows, cols);
    let mut ordered = Vec::new();
    for r in 0..rows {
        for c in (0..cols).rev() {
            ordered.push(grid[(r * cols + c) as usize]);
        }
    }
    ordered
}

pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to list output directory")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
