//! Decoded tile patches.

use std::path::Path;

use image::RgbImage;

use crate::error::ReadError;
use crate::geometry::CoordinatePair;
use crate::segment::{
    has_enough_tissue, DEFAULT_NEAR_ZERO_VAR_THRESHOLD, DEFAULT_TISSUE_THRESHOLD,
};

/// A decoded pixel patch extracted from a Whole Slide Image.
///
/// A tile owns its pixel buffer and is tagged with the pyramid level it was
/// read at and its bounding box in **level-0** coordinates, so a persistence
/// layer can serialize it without re-deriving coordinates. It carries no
/// back-reference to the slide it came from.
#[derive(Debug, Clone)]
pub struct Tile {
    image: RgbImage,
    level: usize,
    coords: CoordinatePair,
}

impl Tile {
    /// Create a tile from a decoded pixel buffer.
    ///
    /// `coords` is the tile's box in level-0 coordinates; `level` is the
    /// pyramid level the pixels were read at.
    pub fn new(image: RgbImage, level: usize, coords: CoordinatePair) -> Self {
        Self {
            image,
            level,
            coords,
        }
    }

    /// The decoded pixel buffer.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// The pyramid level the tile was read at.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The tile's bounding box in level-0 coordinates.
    pub fn coords(&self) -> CoordinatePair {
        self.coords
    }

    /// Consume the tile, returning its pixel buffer.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Whether the tile contains enough tissue to be worth keeping.
    ///
    /// `threshold` is the minimum fraction of tissue pixels (strict `>`)
    /// over the tile area after segmentation; `near_zero_var_threshold` is
    /// the minimum variance of the segmented mask, rejecting degenerate
    /// all-foreground and all-background tiles alike. Both materially change
    /// acceptance rates; the defaults are
    /// [`DEFAULT_TISSUE_THRESHOLD`] (0.8) and
    /// [`DEFAULT_NEAR_ZERO_VAR_THRESHOLD`] (0.1).
    ///
    /// Pure predicate over the tile's pixels.
    pub fn has_enough_tissue(&self, threshold: f64, near_zero_var_threshold: f64) -> bool {
        has_enough_tissue(&self.image, threshold, near_zero_var_threshold)
    }

    /// [`has_enough_tissue`](Self::has_enough_tissue) with the documented
    /// default thresholds.
    pub fn has_enough_tissue_default(&self) -> bool {
        self.has_enough_tissue(DEFAULT_TISSUE_THRESHOLD, DEFAULT_NEAR_ZERO_VAR_THRESHOLD)
    }

    /// Save the tile's pixels to disk.
    ///
    /// The format is inferred from the file extension; a path without an
    /// extension gets `.png` appended. Parent directories are created as
    /// needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReadError> {
        let path = path.as_ref();
        let path = if path.extension().is_none() {
            path.with_extension("png")
        } else {
            path.to_path_buf()
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ReadError::Io(e.to_string()))?;
            }
        }

        self.image
            .save(&path)
            .map_err(|e| ReadError::Io(e.to_string()))
    }

    /// Whether the tile is effectively grayscale.
    ///
    /// Compares the per-channel intensity histograms; identical histograms
    /// across R, G and B indicate a grayscale capture.
    pub fn is_grayscale(&self) -> bool {
        let mut hist = [[0u32; 256]; 3];
        for pixel in self.image.pixels() {
            for (channel, h) in hist.iter_mut().enumerate() {
                h[pixel.0[channel] as usize] += 1;
            }
        }
        hist[0] == hist[1] && hist[0] == hist[2]
    }
}
