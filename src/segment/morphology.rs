//! Binary morphology primitives shared by segmentation and tile validation.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;

/// Foreground value in binary masks.
pub(crate) const FOREGROUND: u8 = 255;

/// Binarize a grayscale image, marking pixels strictly below `threshold` as
/// foreground.
///
/// Tissue stains darker than the glass background, so the tissue population
/// sits below the Otsu split.
pub(crate) fn threshold_below(gray: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] < threshold {
            Luma([FOREGROUND])
        } else {
            Luma([0])
        }
    })
}

/// Dilate a binary mask with a disk-shaped structuring element of the given
/// radius (an L2 ball).
pub(crate) fn dilate_disk(mask: &GrayImage, radius: u8) -> GrayImage {
    dilate(mask, Norm::L2, radius)
}

/// Fill enclosed holes in a binary mask.
///
/// Background connected to the image border is propagated inward by repeated
/// dilation with an all-ones 5x5 structure (a Chebyshev ball of radius 2),
/// constrained to background pixels, until a fixpoint; everything the
/// propagation cannot reach is a hole and becomes foreground.
pub(crate) fn fill_holes(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return mask.clone();
    }

    let is_background = |x: u32, y: u32| mask.get_pixel(x, y).0[0] == 0;

    // Seed with the border background
    let mut reachable = GrayImage::new(width, height);
    for x in 0..width {
        for y in [0, height - 1] {
            if is_background(x, y) {
                reachable.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
    }
    for y in 0..height {
        for x in [0, width - 1] {
            if is_background(x, y) {
                reachable.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
    }

    loop {
        let grown = dilate(&reachable, Norm::LInf, 2);
        let mut changed = false;
        let mut next = GrayImage::new(width, height);
        for (x, y, pixel) in grown.enumerate_pixels() {
            if pixel.0[0] > 0 && is_background(x, y) {
                next.put_pixel(x, y, Luma([FOREGROUND]));
                if reachable.get_pixel(x, y).0[0] == 0 {
                    changed = true;
                }
            }
        }
        reachable = next;
        if !changed {
            break;
        }
    }

    // Holes are background pixels the border propagation never reached
    GrayImage::from_fn(width, height, |x, y| {
        if reachable.get_pixel(x, y).0[0] == 0 {
            Luma([FOREGROUND])
        } else {
            Luma([0])
        }
    })
}

/// Mean of a binary mask as a foreground fraction in `[0, 1]`.
pub(crate) fn mask_mean(mask: &GrayImage) -> f64 {
    let total = (mask.width() as u64 * mask.height() as u64) as f64;
    let foreground = mask.pixels().filter(|p| p.0[0] > 0).count() as f64;
    foreground / total
}
