//! Sampler configuration types.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default PRNG seed.
pub const DEFAULT_SEED: u64 = 7;

/// Default cap on sampling attempts.
pub const DEFAULT_MAX_ITER: usize = 10_000;

// =============================================================================
// Tile Size
// =============================================================================

/// Requested tile extent.
///
/// Explicit sum type instead of an int-or-pair parameter: a square tile and
/// a rectangular tile are both normalized once, at construction, into a
/// `(width, height)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileSize {
    /// Square tile with the given side length
    Square(u32),

    /// Rectangular tile as `(width, height)`
    Rectangle(u32, u32),
}

impl TileSize {
    /// Normalize into a `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            TileSize::Square(side) => (side, side),
            TileSize::Rectangle(width, height) => (width, height),
        }
    }

    /// Validate that both dimensions are positive.
    pub fn validate(&self) -> Result<(u32, u32), ConfigError> {
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidTileSize { width, height });
        }
        Ok((width, height))
    }
}

impl From<u32> for TileSize {
    fn from(side: u32) -> Self {
        TileSize::Square(side)
    }
}

impl From<(u32, u32)> for TileSize {
    fn from(pair: (u32, u32)) -> Self {
        TileSize::Rectangle(pair.0, pair.1)
    }
}

// =============================================================================
// Sampler Configuration
// =============================================================================

/// Configuration for a [`RandomTiler`](crate::sampler::RandomTiler).
///
/// Validation happens when the sampler is constructed, not here: this is a
/// plain value type that can be persisted and passed around by batch
/// orchestrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Tile extent at the read level
    pub tile_size: TileSize,

    /// Target number of accepted tiles (must be at least 1)
    pub n_tiles: usize,

    /// Pyramid level to read tiles at (0 = full resolution)
    pub level: usize,

    /// PRNG seed; a fixed seed over a fixed slide reproduces the exact
    /// accepted-tile sequence
    pub seed: u64,

    /// Whether to restrict sampling to the tissue region and reject tiles
    /// without enough tissue
    pub check_tissue: bool,

    /// Hard cap on sampling attempts (must be at least `n_tiles`)
    pub max_iter: usize,
}

impl SamplerConfig {
    /// Configuration with the default level (0), seed ([`DEFAULT_SEED`]),
    /// tissue checking enabled, and attempt cap ([`DEFAULT_MAX_ITER`]).
    pub fn new(tile_size: impl Into<TileSize>, n_tiles: usize) -> Self {
        Self {
            tile_size: tile_size.into(),
            n_tiles,
            level: 0,
            seed: DEFAULT_SEED,
            check_tissue: true,
            max_iter: DEFAULT_MAX_ITER,
        }
    }

    /// Set the pyramid level to read tiles at.
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Set the PRNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable tissue filtering.
    ///
    /// With filtering disabled the sampling universe is the whole level-0
    /// extent and every drawn tile is accepted.
    pub fn with_check_tissue(mut self, check_tissue: bool) -> Self {
        self.check_tissue = check_tissue;
        self
    }

    /// Set the attempt cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}
