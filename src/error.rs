use thiserror::Error;

/// Configuration errors raised when constructing a sampler.
///
/// These are all fail-fast conditions: an invalid configuration is a caller
/// bug, surfaced immediately and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A tile dimension is zero
    #[error("Invalid tile size: {width}x{height} (both dimensions must be positive)")]
    InvalidTileSize { width: u32, height: u32 },

    /// The requested tile count is zero
    #[error("Invalid tile target: n_tiles must be at least 1")]
    ZeroTileTarget,

    /// The attempt cap cannot possibly reach the tile target
    #[error("max_iter ({max_iter}) must be at least n_tiles ({n_tiles}): the target is unreachable")]
    MaxIterTooSmall { max_iter: usize, n_tiles: usize },

    /// The requested pyramid level does not exist in the target slide
    #[error("Invalid level {level}: slide has {level_count} levels (valid range 0..{level_count})")]
    InvalidLevel { level: usize, level_count: usize },
}

/// Geometry errors from coordinate scaling and box construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Box corners do not describe a non-empty rectangle
    #[error("Invalid box: ({x_ul}, {y_ul})-({x_br}, {y_br}) (upper-left must be strictly above and left of bottom-right)")]
    InvalidBox {
        x_ul: u32,
        y_ul: u32,
        x_br: u32,
        y_br: u32,
    },

    /// A dimension pair has a zero component
    #[error("Degenerate dimensions: {width}x{height} (both components must be positive)")]
    DegenerateDimensions { width: u32, height: u32 },

    /// The sampling box cannot fit a single tile
    ///
    /// Clamping would bias the sample toward the box edge, so this is a hard
    /// failure instead.
    #[error("Sampling box ({box_width}x{box_height}) is too small for {tile_width}x{tile_height} tiles")]
    BoxTooSmall {
        box_width: u32,
        box_height: u32,
        tile_width: u32,
        tile_height: u32,
    },
}

/// Errors from tissue segmentation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentationError {
    /// No tissue component was found in the slide preview
    ///
    /// The preview is fully background or fully foreground. Substituting the
    /// whole-slide box here would defeat tissue filtering, so this surfaces
    /// as a distinct condition.
    #[error("No tissue region found in slide preview (Otsu threshold {threshold})")]
    NoTissue { threshold: u8 },

    /// The preview could not be read
    #[error("Preview read failed: {0}")]
    Read(#[from] ReadError),

    /// Scaling the tissue box to level 0 failed
    #[error("Tissue box scaling failed: {0}")]
    Geometry(#[from] GeometryError),
}

/// Errors reported by a [`PyramidReader`](crate::slide::PyramidReader).
///
/// The sampler propagates these unchanged and never retries: an out-of-bounds
/// read is a geometry bug, not a transient fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadError {
    /// Requested level is outside the pyramid
    #[error("Invalid level {level}: slide has {level_count} levels")]
    InvalidLevel { level: usize, level_count: usize },

    /// Requested region falls outside the level's extent
    #[error("Region out of bounds: ({x}, {y}) size {width}x{height} at level {level}")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        level: usize,
    },

    /// Pixel data could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),
}

/// Umbrella error for tile extraction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    /// Invalid sampler configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Coordinate geometry failure
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Tissue segmentation failure
    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),

    /// Slide read failure
    #[error("Read error: {0}")]
    Read(#[from] ReadError),
}
