//! Connected-component labeling and region properties.

use std::collections::BTreeMap;

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::geometry::CoordinatePair;

/// Properties of one connected foreground component.
///
/// Transient: produced and consumed within a single segmentation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Component label index (1-based, as assigned by labeling)
    pub index: u32,

    /// Number of foreground pixels in the component
    pub area: u64,

    /// Bounding box in mask coordinates (bottom-right exclusive)
    pub bbox: CoordinatePair,

    /// Centroid `(x, y)` in mask coordinates
    pub centroid: (f64, f64),
}

struct Accumulator {
    area: u64,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    sum_x: u64,
    sum_y: u64,
}

/// Label the 8-connected foreground components of a binary mask and compute
/// their properties.
///
/// Returns one [`Region`] per component, ordered by label index. An empty
/// mask yields an empty vector.
pub fn region_properties(mask: &GrayImage) -> Vec<Region> {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut stats: BTreeMap<u32, Accumulator> = BTreeMap::new();
    for (x, y, pixel) in labels.enumerate_pixels() {
        let label = pixel.0[0];
        if label == 0 {
            continue;
        }
        let acc = stats.entry(label).or_insert(Accumulator {
            area: 0,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            sum_x: 0,
            sum_y: 0,
        });
        acc.area += 1;
        acc.min_x = acc.min_x.min(x);
        acc.min_y = acc.min_y.min(y);
        acc.max_x = acc.max_x.max(x);
        acc.max_y = acc.max_y.max(y);
        acc.sum_x += x as u64;
        acc.sum_y += y as u64;
    }

    stats
        .into_iter()
        .map(|(index, acc)| Region {
            index,
            area: acc.area,
            bbox: CoordinatePair {
                x_ul: acc.min_x,
                y_ul: acc.min_y,
                x_br: acc.max_x + 1,
                y_br: acc.max_y + 1,
            },
            centroid: (
                acc.sum_x as f64 / acc.area as f64,
                acc.sum_y as f64 / acc.area as f64,
            ),
        })
        .collect()
}

/// The component with the largest pixel area, if any.
pub fn largest_region(regions: Vec<Region>) -> Option<Region> {
    regions.into_iter().max_by_key(|r| r.area)
}
