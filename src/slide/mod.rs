//! Slide abstraction layer.
//!
//! The sampling core never touches file formats or decoders directly; it
//! consumes a [`PyramidReader`], the external collaborator that opens a
//! Whole Slide Image, reports per-level pixel dimensions and decodes pixel
//! regions. Decoded patches are handed back as owned [`Tile`] values.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             RandomTiler                 │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          PyramidReader trait            │
//! │  (levels, dimensions, thumbnail,        │
//! │   read_region)                          │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//!        format-specific reader (external)
//! ```

mod reader;
mod tile;

pub use reader::PyramidReader;
pub use tile::Tile;
