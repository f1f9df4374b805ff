//! Random tile sampling.
//!
//! [`RandomTiler`] orchestrates the rest of the crate: it asks the
//! segmentation layer for the tissue box once, repeatedly draws random
//! candidate boxes inside it, maps them between pyramid levels, reads the
//! pixels through the [`PyramidReader`] collaborator and keeps only tiles
//! that pass the tissue check. The result is a lazy, finite sequence of
//! accepted `(Tile, CoordinatePair)` pairs with two explicit stop
//! conditions: the target tile count, and a hard cap on attempts.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        RandomTiler                           │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                    extract()                           │  │
//! │  │  1. Validate level        4. Draw candidate boxes      │  │
//! │  │  2. Segment tissue box    5. Read + validate tiles     │  │
//! │  │  3. Map to read level     6. Yield until n_tiles or    │  │
//! │  │                              max_iter                  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │         │                  │                  │              │
//! │         ▼                  ▼                  ▼              │
//! │  ┌────────────┐    ┌──────────────┐   ┌───────────────────┐  │
//! │  │  segment   │    │   geometry   │   │  PyramidReader    │  │
//! │  └────────────┘    └──────────────┘   └───────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::{SamplerConfig, TileSize, DEFAULT_MAX_ITER, DEFAULT_SEED};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{ConfigError, GeometryError, SamplerError};
use crate::geometry::{scale_box, CoordinatePair, Dimensions};
use crate::segment::tissue_box;
use crate::slide::{PyramidReader, Tile};

// =============================================================================
// Random Tiler
// =============================================================================

/// Samples fixed-size tiles at random positions inside the tissue region of
/// a Whole Slide Image.
///
/// Construction validates the configuration eagerly; [`extract`](Self::extract)
/// then produces a bounded lazy iterator over accepted tiles. The sampler
/// owns its PRNG and reseeds it at the start of every extraction, so a fixed
/// seed over a fixed slide reproduces the exact accepted sequence no matter
/// how many extractions ran before.
///
/// A sampler holds no slide state and may be reused across slides; running
/// samplers concurrently requires one reader per sampler, since readers are
/// not assumed thread-safe.
///
/// # Example
///
/// ```ignore
/// use wsi_sampler::{RandomTiler, SamplerConfig};
///
/// let tiler = RandomTiler::new(SamplerConfig::new(512u32, 20).with_seed(7))?;
/// for result in tiler.extract(&reader)? {
///     let (tile, coords) = result?;
///     tile.save(format!("tiles/tile_{coords}.png"))?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RandomTiler {
    tile_width: u32,
    tile_height: u32,
    config: SamplerConfig,
}

impl RandomTiler {
    /// Create a sampler, validating the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidTileSize`] for a zero tile dimension,
    /// [`ConfigError::ZeroTileTarget`] for `n_tiles == 0`, and
    /// [`ConfigError::MaxIterTooSmall`] when `max_iter < n_tiles`: with
    /// fewer attempts than requested tiles the target is unreachable, which
    /// is a configuration bug rather than a runtime outcome.
    pub fn new(config: SamplerConfig) -> Result<Self, ConfigError> {
        let (tile_width, tile_height) = config.tile_size.validate()?;
        if config.n_tiles == 0 {
            return Err(ConfigError::ZeroTileTarget);
        }
        if config.max_iter < config.n_tiles {
            return Err(ConfigError::MaxIterTooSmall {
                max_iter: config.max_iter,
                n_tiles: config.n_tiles,
            });
        }
        Ok(Self {
            tile_width,
            tile_height,
            config,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Start an extraction over a slide.
    ///
    /// Performs the per-extraction setup: validates `level` against the
    /// slide's pyramid, computes the sampling box (tissue box, or the full
    /// level-0 extent when tissue checking is off), maps it to the read
    /// level, and seeds a fresh PRNG. Returns the lazy tile iterator.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidLevel`] when the configured level is not in the
    /// slide's pyramid; [`GeometryError::BoxTooSmall`] when the sampling box
    /// cannot fit a tile in some dimension (the random range would be empty,
    /// and clamping would bias samples toward the box edge, so this fails
    /// instead); segmentation and read errors propagate unchanged.
    pub fn extract<'a, R: PyramidReader>(
        &self,
        reader: &'a R,
    ) -> Result<TileIter<'a, R>, SamplerError> {
        let level_count = reader.level_count();
        if self.config.level >= level_count {
            return Err(ConfigError::InvalidLevel {
                level: self.config.level,
                level_count,
            }
            .into());
        }

        let level0_dims = reader.dimensions()?;
        let level_dims = reader.level_dimensions(self.config.level)?;

        let box_wsi = if self.config.check_tissue {
            tissue_box(reader)?
        } else {
            CoordinatePair::full_extent(level0_dims)
        };

        // Draw corners at the read level so candidates align with that
        // level's pixel grid; each candidate is mapped back to level 0 for
        // the read.
        let box_level = if self.config.level != 0 {
            scale_box(box_wsi, level0_dims, level_dims)?
        } else {
            box_wsi
        };

        let x_range = sample_range(
            box_level.x_ul,
            box_level.x_br,
            self.tile_width,
            || GeometryError::BoxTooSmall {
                box_width: box_level.width(),
                box_height: box_level.height(),
                tile_width: self.tile_width,
                tile_height: self.tile_height,
            },
        )?;
        let y_range = sample_range(
            box_level.y_ul,
            box_level.y_br,
            self.tile_height,
            || GeometryError::BoxTooSmall {
                box_width: box_level.width(),
                box_height: box_level.height(),
                tile_width: self.tile_width,
                tile_height: self.tile_height,
            },
        )?;

        debug!(
            sampling_box = %box_level,
            level = self.config.level,
            check_tissue = self.config.check_tissue,
            seed = self.config.seed,
            "starting extraction"
        );

        Ok(TileIter {
            reader,
            rng: StdRng::seed_from_u64(self.config.seed),
            level0_dims,
            level_dims,
            x_range,
            y_range,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            level: self.config.level,
            check_tissue: self.config.check_tissue,
            n_tiles: self.config.n_tiles,
            max_iter: self.config.max_iter,
            attempts: 0,
            accepted: 0,
            stopped: false,
        })
    }

    /// Run an extraction to completion and collect the results.
    pub fn extract_all<R: PyramidReader>(
        &self,
        reader: &R,
    ) -> Result<SampleReport, SamplerError> {
        let mut iter = self.extract(reader)?;
        let mut tiles = Vec::with_capacity(self.config.n_tiles);
        for result in &mut iter {
            tiles.push(result?);
        }
        Ok(SampleReport {
            tiles,
            attempts: iter.attempts(),
            requested: self.config.n_tiles,
            complete: iter.is_complete(),
        })
    }
}

/// Upper-left sampling range `[lo, hi)` along one axis.
///
/// The upper bound leaves a one-pixel guard below `box_end - tile_extent`,
/// so a drawn corner plus the tile extent never overruns the box.
fn sample_range(
    box_start: u32,
    box_end: u32,
    tile_extent: u32,
    too_small: impl Fn() -> GeometryError,
) -> Result<(u32, u32), GeometryError> {
    let hi = box_end
        .checked_sub(tile_extent)
        .and_then(|v| v.checked_sub(1))
        .filter(|&hi| hi > box_start)
        .ok_or_else(&too_small)?;
    Ok((box_start, hi))
}

// =============================================================================
// Tile Iterator
// =============================================================================

/// Lazy, finite, non-restartable sequence of accepted tiles.
///
/// Each item is an accepted `(Tile, CoordinatePair)` pair, the box in
/// level-0 coordinates. The iterator stops when the accepted count reaches
/// the target (`is_complete()` is then true) or the attempt count reaches
/// the cap. The latter is a reported outcome, not an error, observable via
/// [`accepted`](Self::accepted) and [`attempts`](Self::attempts) after
/// exhaustion. A read error ends the iteration after yielding it.
///
/// Restarting requires a fresh [`RandomTiler::extract`] call, which reseeds
/// the PRNG.
pub struct TileIter<'a, R: PyramidReader> {
    reader: &'a R,
    rng: StdRng,
    level0_dims: Dimensions,
    level_dims: Dimensions,
    x_range: (u32, u32),
    y_range: (u32, u32),
    tile_width: u32,
    tile_height: u32,
    level: usize,
    check_tissue: bool,
    n_tiles: usize,
    max_iter: usize,
    attempts: usize,
    accepted: usize,
    stopped: bool,
}

impl<R: PyramidReader> TileIter<'_, R> {
    /// Sampling attempts made so far (accepted and rejected).
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Tiles accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Whether the accepted count reached the configured target.
    pub fn is_complete(&self) -> bool {
        self.accepted >= self.n_tiles
    }

    fn finish(&mut self) {
        self.stopped = true;
        if self.is_complete() {
            info!(
                accepted = self.accepted,
                attempts = self.attempts,
                "extraction complete"
            );
        } else {
            info!(
                accepted = self.accepted,
                requested = self.n_tiles,
                attempts = self.attempts,
                "extraction stopped at attempt cap"
            );
        }
    }
}

impl<R: PyramidReader> Iterator for TileIter<'_, R> {
    type Item = Result<(Tile, CoordinatePair), SamplerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped {
            return None;
        }

        loop {
            if self.accepted >= self.n_tiles || self.attempts >= self.max_iter {
                self.finish();
                return None;
            }
            self.attempts += 1;

            let x_ul = self.rng.gen_range(self.x_range.0..self.x_range.1);
            let y_ul = self.rng.gen_range(self.y_range.0..self.y_range.1);
            let candidate_level = CoordinatePair {
                x_ul,
                y_ul,
                x_br: x_ul + self.tile_width,
                y_br: y_ul + self.tile_height,
            };

            let candidate_wsi = if self.level != 0 {
                match scale_box(candidate_level, self.level_dims, self.level0_dims) {
                    Ok(scaled) => scaled,
                    Err(e) => {
                        self.stopped = true;
                        return Some(Err(e.into()));
                    }
                }
            } else {
                candidate_level
            };

            let pixels = match self.reader.read_region(
                (candidate_wsi.x_ul, candidate_wsi.y_ul),
                self.level,
                (self.tile_width, self.tile_height),
            ) {
                Ok(pixels) => pixels,
                Err(e) => {
                    self.stopped = true;
                    return Some(Err(e.into()));
                }
            };

            let tile = Tile::new(pixels, self.level, candidate_wsi);

            if !self.check_tissue || tile.has_enough_tissue_default() {
                self.accepted += 1;
                debug!(
                    attempt = self.attempts,
                    accepted = self.accepted,
                    coords = %candidate_wsi,
                    "tile accepted"
                );
                return Some(Ok((tile, candidate_wsi)));
            }
            debug!(attempt = self.attempts, coords = %candidate_wsi, "tile rejected");
        }
    }
}

// =============================================================================
// Sample Report
// =============================================================================

/// Collected result of one full extraction.
#[derive(Debug)]
pub struct SampleReport {
    /// Accepted tiles with their level-0 boxes, in acceptance order
    pub tiles: Vec<(Tile, CoordinatePair)>,

    /// Total sampling attempts made
    pub attempts: usize,

    /// The configured tile target
    pub requested: usize,

    /// Whether the target was reached before the attempt cap
    pub complete: bool,
}

impl SampleReport {
    /// Number of accepted tiles.
    pub fn accepted(&self) -> usize {
        self.tiles.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
