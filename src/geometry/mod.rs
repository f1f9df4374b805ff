//! Coordinate geometry for pyramid images.
//!
//! A Whole Slide Image stores the same section at multiple resolution
//! levels, so every rectangle must be tagged with the level it refers to and
//! mapped between levels without drift. This module provides the two value
//! types used throughout the crate ([`CoordinatePair`], [`Dimensions`]) and
//! the level-to-level mapping function [`scale_box`].
//!
//! # Scaling policy
//!
//! [`scale_box`] floors every scaled coordinate. Flooring guarantees the
//! mapped box never exceeds the target level's extent; the price is that
//! mapping level A -> B -> A is not exactly invertible. Callers that
//! round-trip through a level must tolerate that loss.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

// =============================================================================
// CoordinatePair
// =============================================================================

/// An axis-aligned rectangle in pixel coordinates of a stated pyramid level.
///
/// `(x_ul, y_ul)` is the upper-left corner, `(x_br, y_br)` the bottom-right
/// (exclusive). Invariant: `x_ul < x_br` and `y_ul < y_br`, enforced by
/// [`CoordinatePair::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinatePair {
    /// X coordinate of the upper-left corner
    pub x_ul: u32,

    /// Y coordinate of the upper-left corner
    pub y_ul: u32,

    /// X coordinate of the bottom-right corner (exclusive)
    pub x_br: u32,

    /// Y coordinate of the bottom-right corner (exclusive)
    pub y_br: u32,
}

impl CoordinatePair {
    /// Create a box, validating that it describes a non-empty rectangle.
    pub fn new(x_ul: u32, y_ul: u32, x_br: u32, y_br: u32) -> Result<Self, GeometryError> {
        if x_ul >= x_br || y_ul >= y_br {
            return Err(GeometryError::InvalidBox {
                x_ul,
                y_ul,
                x_br,
                y_br,
            });
        }
        Ok(Self {
            x_ul,
            y_ul,
            x_br,
            y_br,
        })
    }

    /// Box covering an entire level of the given dimensions.
    pub fn full_extent(dimensions: Dimensions) -> Self {
        Self {
            x_ul: 0,
            y_ul: 0,
            x_br: dimensions.width,
            y_br: dimensions.height,
        }
    }

    /// Width of the box in pixels.
    pub fn width(&self) -> u32 {
        self.x_br - self.x_ul
    }

    /// Height of the box in pixels.
    pub fn height(&self) -> u32 {
        self.y_br - self.y_ul
    }

    /// Whether `other` lies entirely within this box.
    pub fn contains(&self, other: &CoordinatePair) -> bool {
        self.x_ul <= other.x_ul
            && self.y_ul <= other.y_ul
            && other.x_br <= self.x_br
            && other.y_br <= self.y_br
    }
}

impl std::fmt::Display for CoordinatePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {})-({}, {})",
            self.x_ul, self.y_ul, self.x_br, self.y_br
        )
    }
}

// =============================================================================
// Dimensions
// =============================================================================

/// Pixel extent of one pyramid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    /// Create a dimension pair.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either component is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from(pair: (u32, u32)) -> Self {
        Self::new(pair.0, pair.1)
    }
}

// =============================================================================
// Coordinate Mapping
// =============================================================================

/// Map a box between two pyramid levels.
///
/// Each coordinate is scaled as `floor(c * to[axis] / from[axis])`, where the
/// axis is width for x coordinates and height for y coordinates. The
/// intermediate product is computed in `u64`, so gigapixel extents cannot
/// overflow.
///
/// Pure function: no side effects, deterministic.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateDimensions`] if either dimension pair
/// has a zero component, and [`GeometryError::InvalidBox`] if flooring
/// collapses the box to zero width or height in the target level (possible
/// when the target level is much smaller than the source).
pub fn scale_box(
    boxed: CoordinatePair,
    from: Dimensions,
    to: Dimensions,
) -> Result<CoordinatePair, GeometryError> {
    if from.is_degenerate() {
        return Err(GeometryError::DegenerateDimensions {
            width: from.width,
            height: from.height,
        });
    }
    if to.is_degenerate() {
        return Err(GeometryError::DegenerateDimensions {
            width: to.width,
            height: to.height,
        });
    }

    let scale = |c: u32, from_extent: u32, to_extent: u32| -> u32 {
        ((c as u64 * to_extent as u64) / from_extent as u64) as u32
    };

    CoordinatePair::new(
        scale(boxed.x_ul, from.width, to.width),
        scale(boxed.y_ul, from.height, to.height),
        scale(boxed.x_br, from.width, to.width),
        scale(boxed.y_br, from.height, to.height),
    )
}

// =============================================================================
// Tests
// =============================================================================
