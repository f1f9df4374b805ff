//! # WSI Sampler
//!
//! Random tissue-tile extraction from Whole Slide Images (WSI).
//!
//! A WSI is a gigapixel microscopy image stored as a multi-resolution
//! pyramid, and most of it is blank glass. This library locates the
//! tissue-bearing region of a slide, then rejection-samples fixed-size
//! tiles from it: candidates are drawn at random inside the tissue box and
//! tiles without enough tissue are discarded, under a hard cap on attempts.
//! Accepted tiles come back as owned pixel buffers tagged with their
//! level-0 coordinates, ready for an ML preprocessing pipeline to persist.
//!
//! ## Features
//!
//! - **Tissue segmentation**: Otsu thresholding, disk dilation, hole
//!   filling and connected-component labeling over a slide preview
//! - **Tissue-content validation**: per-tile foreground-fraction predicate
//!   with a cheap fast-reject for blank background
//! - **Bounded rejection sampling**: lazy iterator with two explicit stop
//!   conditions (tile target, attempt cap) and observable partial results
//! - **Reproducibility**: instance-owned seeded PRNG; a fixed seed over a
//!   fixed slide reproduces the exact accepted sequence
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`geometry`] - Boxes, dimensions and level-to-level coordinate scaling
//! - [`slide`] - The `PyramidReader` collaborator trait and the `Tile` type
//! - [`segment`] - Tissue segmentation and the tile-validity predicate
//! - [`sampler`] - The random tiler and its configuration
//! - [`error`] - Error taxonomy
//!
//! ## Example
//!
//! ```ignore
//! use wsi_sampler::{RandomTiler, SamplerConfig};
//!
//! // `reader` is any PyramidReader implementation over an opened slide
//! let tiler = RandomTiler::new(
//!     SamplerConfig::new(512u32, 20).with_level(1).with_seed(7),
//! )?;
//!
//! let report = tiler.extract_all(&reader)?;
//! println!(
//!     "accepted {} of {} tiles in {} attempts",
//!     report.accepted(),
//!     report.requested,
//!     report.attempts,
//! );
//! for (tile, coords) in &report.tiles {
//!     tile.save(format!("tiles/tile_{}_{}.png", coords.x_ul, coords.y_ul))?;
//! }
//! ```

pub mod error;
pub mod geometry;
pub mod sampler;
pub mod segment;
pub mod slide;

// Re-export commonly used types
pub use error::{ConfigError, GeometryError, ReadError, SamplerError, SegmentationError};
pub use geometry::{scale_box, CoordinatePair, Dimensions};
pub use sampler::{
    RandomTiler, SampleReport, SamplerConfig, TileIter, TileSize, DEFAULT_MAX_ITER, DEFAULT_SEED,
};
pub use segment::{
    has_enough_tissue, tissue_box, Region, DEFAULT_NEAR_ZERO_VAR_THRESHOLD,
    DEFAULT_TISSUE_THRESHOLD, THUMBNAIL_MAX_SIZE,
};
pub use slide::{PyramidReader, Tile};
