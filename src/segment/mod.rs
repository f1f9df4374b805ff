//! Tissue segmentation and tile validation.
//!
//! Both operations share one pipeline: Otsu binarization (tissue stains
//! darker than the glass background, so foreground is the population below
//! the split), disk dilation to merge nearby fragments, and hole filling to
//! avoid false splits. [`tissue_box`] runs it over a low-resolution preview
//! of the whole slide to locate the largest tissue component;
//! [`has_enough_tissue`] runs it over a single decoded tile to decide
//! whether the tile is worth keeping.

mod labeling;
mod morphology;

pub use labeling::{largest_region, region_properties, Region};

use image::imageops::grayscale;
use image::RgbImage;
use imageproc::contrast::otsu_level;
use tracing::debug;

use crate::error::SegmentationError;
use crate::geometry::{scale_box, CoordinatePair, Dimensions};
use crate::slide::PyramidReader;

use morphology::{dilate_disk, fill_holes, mask_mean, threshold_below};

// =============================================================================
// Constants
// =============================================================================

/// Longest side of the slide preview used for tissue segmentation.
pub const THUMBNAIL_MAX_SIZE: u32 = 1000;

/// Default minimum fraction of tissue pixels for a tile to be accepted.
pub const DEFAULT_TISSUE_THRESHOLD: f64 = 0.8;

/// Default minimum variance of the segmented tile mask.
///
/// Rejects degenerate masks: an all-foreground tile and an all-background
/// tile both have near-zero variance.
pub const DEFAULT_NEAR_ZERO_VAR_THRESHOLD: f64 = 0.1;

/// Disk radius for dilation of the slide-preview mask.
const PREVIEW_DILATION_RADIUS: u8 = 3;

/// Disk radius for dilation of a tile mask.
const TILE_DILATION_RADIUS: u8 = 5;

/// Mean intensity (in `[0, 1]`) above which a tile may be fast-rejected as
/// blank background.
const WHITE_MEAN_CUTOFF: f64 = 0.9;

/// Intensity standard deviation below which a bright tile counts as
/// near-uniform.
const WHITE_STD_CUTOFF: f64 = 0.09;

// =============================================================================
// Tissue Segmentation
// =============================================================================

/// Locate the tissue-bearing region of a slide.
///
/// Segments a bounded low-resolution preview (longest side
/// [`THUMBNAIL_MAX_SIZE`]) and returns the bounding box of the largest
/// connected tissue component, mapped to **level-0** coordinates.
///
/// The pipeline is fully deterministic for a given preview: grayscale,
/// Otsu threshold, foreground below threshold, disk dilation of radius 3,
/// hole filling, 8-connected component labeling, largest area wins.
///
/// # Errors
///
/// [`SegmentationError::NoTissue`] when labeling finds zero components,
/// i.e. a fully background (or fully foreground) preview. The whole-slide box is
/// never silently substituted; the caller decides how to proceed.
pub fn tissue_box<R: PyramidReader>(reader: &R) -> Result<CoordinatePair, SegmentationError> {
    let preview = reader.thumbnail(THUMBNAIL_MAX_SIZE)?;
    let preview_dims = Dimensions::new(preview.width(), preview.height());
    let level0_dims = reader.dimensions()?;

    let gray = grayscale(&preview);
    let threshold = otsu_level(&gray);
    let mask = threshold_below(&gray, threshold);
    let dilated = dilate_disk(&mask, PREVIEW_DILATION_RADIUS);
    let filled = fill_holes(&dilated);

    let regions = region_properties(&filled);
    debug!(
        preview = %preview_dims,
        threshold,
        components = regions.len(),
        "segmented slide preview"
    );

    let best = largest_region(regions).ok_or(SegmentationError::NoTissue { threshold })?;
    debug!(
        index = best.index,
        area = best.area,
        bbox = %best.bbox,
        "largest tissue component"
    );

    Ok(scale_box(best.bbox, preview_dims, level0_dims)?)
}

// =============================================================================
// Tile Validation
// =============================================================================

/// Decide whether a decoded tile contains enough tissue.
///
/// `threshold` is the minimum fraction of tissue pixels over the tile area
/// (strict `>`); `near_zero_var_threshold` is the minimum variance of the
/// segmented mask. See [`DEFAULT_TISSUE_THRESHOLD`] and
/// [`DEFAULT_NEAR_ZERO_VAR_THRESHOLD`] for the documented defaults.
///
/// Near-uniform white tiles (mean intensity above 0.9 with standard
/// deviation below 0.09) are rejected before the morphology runs, so the
/// common blank-background case does not pay for dilation.
///
/// Pure predicate: no side effects.
pub fn has_enough_tissue(
    image: &RgbImage,
    threshold: f64,
    near_zero_var_threshold: f64,
) -> bool {
    let gray = grayscale(image);
    let pixel_count = (gray.width() as u64 * gray.height() as u64) as f64;
    if pixel_count == 0.0 {
        return false;
    }

    // Intensity statistics in [0, 1]
    let sum: f64 = gray.pixels().map(|p| p.0[0] as f64 / 255.0).sum();
    let mean = sum / pixel_count;
    let sq_sum: f64 = gray
        .pixels()
        .map(|p| {
            let v = p.0[0] as f64 / 255.0 - mean;
            v * v
        })
        .sum();
    let std_dev = (sq_sum / pixel_count).sqrt();

    if mean > WHITE_MEAN_CUTOFF && std_dev < WHITE_STD_CUTOFF {
        return false;
    }

    let otsu = otsu_level(&gray);
    let mask = threshold_below(&gray, otsu);
    let dilated = dilate_disk(&mask, TILE_DILATION_RADIUS);
    let filled = fill_holes(&dilated);

    // Variance of a 0/1 indicator is p * (1 - p)
    let fraction = mask_mean(&filled);
    let variance = fraction * (1.0 - fraction);
    if variance < near_zero_var_threshold {
        return false;
    }

    fraction > threshold
}

// =============================================================================
// Tests
// =============================================================================
