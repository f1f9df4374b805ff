//! PyramidReader trait for format-agnostic slide access.

use image::RgbImage;

use crate::error::ReadError;
use crate::geometry::Dimensions;

/// Interface for reading pixel data from a multi-resolution pyramid image.
///
/// Implementations wrap an opened Whole Slide Image and expose its pyramid
/// structure. Level indices are contiguous starting at 0; level 0 is the
/// highest resolution and dimensions are non-increasing as the index grows.
/// The set of valid levels is fixed for the lifetime of the opened slide.
///
/// All methods are synchronous blocking calls; tile decoding dominates the
/// sampling cost and happens inside [`read_region`](Self::read_region).
/// Implementations are not required to be thread-safe; each concurrent
/// sampler must own its own reader over its own slide handle.
pub trait PyramidReader {
    /// Number of pyramid levels. Always at least 1 for an opened slide.
    fn level_count(&self) -> usize;

    /// Pixel dimensions of a level.
    ///
    /// # Errors
    ///
    /// [`ReadError::InvalidLevel`] if `level >= level_count()`.
    fn level_dimensions(&self, level: usize) -> Result<Dimensions, ReadError>;

    /// Low-resolution preview of the whole slide.
    ///
    /// Aspect ratio is preserved and the longest side is at most `max_size`
    /// pixels. Used by tissue segmentation, which only needs a coarse view.
    fn thumbnail(&self, max_size: u32) -> Result<RgbImage, ReadError>;

    /// Decode a pixel region.
    ///
    /// `location` is the upper-left corner in **level-0** coordinates;
    /// `size` is the region extent in pixels of the requested `level`.
    /// Sources carrying an alpha channel drop it before returning.
    ///
    /// # Errors
    ///
    /// [`ReadError::InvalidLevel`] for an out-of-range level,
    /// [`ReadError::OutOfBounds`] when the region falls outside the level's
    /// extent, [`ReadError::Decode`] when pixel data cannot be decoded.
    fn read_region(
        &self,
        location: (u32, u32),
        level: usize,
        size: (u32, u32),
    ) -> Result<RgbImage, ReadError>;

    /// Dimensions of the full-resolution level.
    fn dimensions(&self) -> Result<Dimensions, ReadError> {
        self.level_dimensions(0)
    }
}
