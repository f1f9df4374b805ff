//! Test utilities for integration tests.
//!
//! Provides a synthetic in-memory slide implementing `PyramidReader`, with
//! configurable pyramid levels, tissue placement and read tracking.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use image::{Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

use wsi_sampler::error::ReadError;
use wsi_sampler::geometry::{CoordinatePair, Dimensions};
use wsi_sampler::slide::PyramidReader;

static TRACING: Once = Once::new();

/// Initialize a tracing subscriber for test runs.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. Log level is controlled through `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Fraction of dark columns painted into an in-tissue tile.
///
/// Radius-5 dilation grows the dark block by 5 columns, so for a 512-wide
/// tile the mask fraction lands near 0.83, above the 0.8 acceptance
/// threshold with variance comfortably over 0.1.
pub const IN_TISSUE_DARK_FRACTION: f64 = 0.82;

/// A synthetic multi-level slide held in memory.
///
/// Level dimensions are supplied directly; pixel content is generated on
/// demand. The slide optionally carries one rectangular tissue region in
/// level-0 coordinates:
///
/// - the thumbnail paints that region dark on a white background;
/// - `read_region` returns a mostly-dark tile when the requested region's
///   level-0 footprint lies entirely inside the tissue rectangle, and a
///   blank white tile otherwise.
///
/// Without a tissue region the slide is uniformly white.
pub struct SyntheticSlide {
    levels: Vec<Dimensions>,
    tissue: Option<CoordinatePair>,
    read_count: AtomicUsize,
}

impl SyntheticSlide {
    pub fn new(levels: Vec<Dimensions>, tissue: Option<CoordinatePair>) -> Self {
        Self {
            levels,
            tissue,
            read_count: AtomicUsize::new(0),
        }
    }

    /// Single-level slide with a tissue rectangle.
    pub fn with_tissue(dims: Dimensions, tissue: CoordinatePair) -> Self {
        Self::new(vec![dims], Some(tissue))
    }

    /// Single-level slide that is entirely blank glass.
    pub fn blank(dims: Dimensions) -> Self {
        Self::new(vec![dims], None)
    }

    /// Number of `read_region` calls made so far.
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }
}

const BACKGROUND: Rgb<u8> = Rgb([244, 242, 245]);
const TISSUE: Rgb<u8> = Rgb([88, 36, 98]);

impl PyramidReader for SyntheticSlide {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn level_dimensions(&self, level: usize) -> Result<Dimensions, ReadError> {
        self.levels
            .get(level)
            .copied()
            .ok_or(ReadError::InvalidLevel {
                level,
                level_count: self.levels.len(),
            })
    }

    fn thumbnail(&self, max_size: u32) -> Result<RgbImage, ReadError> {
        let level0 = self.levels[0];
        let longest = level0.width.max(level0.height);
        let width = (level0.width as u64 * max_size as u64 / longest as u64) as u32;
        let height = (level0.height as u64 * max_size as u64 / longest as u64) as u32;

        Ok(RgbImage::from_fn(width, height, |x, y| {
            if let Some(tissue) = self.tissue {
                // Map the preview pixel back to level 0
                let x0 = (x as u64 * level0.width as u64 / width as u64) as u32;
                let y0 = (y as u64 * level0.height as u64 / height as u64) as u32;
                if x0 >= tissue.x_ul && x0 < tissue.x_br && y0 >= tissue.y_ul && y0 < tissue.y_br
                {
                    return TISSUE;
                }
            }
            BACKGROUND
        }))
    }

    fn read_region(
        &self,
        location: (u32, u32),
        level: usize,
        size: (u32, u32),
    ) -> Result<RgbImage, ReadError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);

        let level0 = self.levels[0];
        let dims = self.level_dimensions(level)?;

        // Level-0 footprint of the requested region (integer downsample
        // factors in these fixtures)
        let fx = level0.width / dims.width;
        let fy = level0.height / dims.height;
        let footprint_w = size.0 * fx;
        let footprint_h = size.1 * fy;

        if location.0 + footprint_w > level0.width || location.1 + footprint_h > level0.height {
            return Err(ReadError::OutOfBounds {
                x: location.0,
                y: location.1,
                width: size.0,
                height: size.1,
                level,
            });
        }

        let in_tissue = self.tissue.is_some_and(|tissue| {
            location.0 >= tissue.x_ul
                && location.1 >= tissue.y_ul
                && location.0 + footprint_w <= tissue.x_br
                && location.1 + footprint_h <= tissue.y_br
        });

        if in_tissue {
            let dark_columns = (size.0 as f64 * IN_TISSUE_DARK_FRACTION) as u32;
            Ok(RgbImage::from_fn(size.0, size.1, |x, _| {
                if x < dark_columns {
                    TISSUE
                } else {
                    BACKGROUND
                }
            }))
        } else {
            Ok(RgbImage::from_pixel(size.0, size.1, BACKGROUND))
        }
    }
}
