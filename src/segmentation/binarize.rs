use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, dilate};

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Otsu threshold, inverted so dark ink becomes foreground (255).
///
/// A page with a single intensity has no ink to separate and yields an empty mask.
pub fn ink_mask(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let (lo, hi) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if width == 0 || height == 0 || lo >= hi {
        return GrayImage::new(width, height);
    }

    let level = otsu_level(gray);
    GrayImage::from_fn(width, height, |x, y| {
        if gray.get_pixel(x, y)[0] <= level {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Full binarizer: inverted Otsu mask, one dilation, then one closing, both with
/// a square kernel of the given radius.
pub fn binarize(gray: &GrayImage, kernel_radius: u8) -> GrayImage {
    let mask = ink_mask(gray);
    if kernel_radius == 0 {
        return mask;
    }
    let dilated = dilate(&mask, Norm::LInf, kernel_radius);
    close(&dilated, Norm::LInf, kernel_radius)
}

/// Black ink on white paper, the polarity bitmap tracers expect.
pub fn ink_on_white(gray: &GrayImage) -> GrayImage {
    let mut bitmap = ink_mask(gray);
    for p in bitmap.pixels_mut() {
        p[0] = 255 - p[0];
    }
    bitmap
}
