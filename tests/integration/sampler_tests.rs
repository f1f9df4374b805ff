//! End-to-end random sampling behavior.

use wsi_sampler::error::{ConfigError, SamplerError};
use wsi_sampler::geometry::{CoordinatePair, Dimensions};
use wsi_sampler::sampler::{RandomTiler, SamplerConfig};
use wsi_sampler::segment::tissue_box;

use super::test_utils::{init_tracing, SyntheticSlide};

fn standard_slide() -> SyntheticSlide {
    SyntheticSlide::with_tissue(
        Dimensions::new(10_000, 8_000),
        CoordinatePair::new(1_000, 1_000, 9_000, 7_000).unwrap(),
    )
}

#[test]
fn test_end_to_end_extraction() {
    init_tracing();
    // 10000x8000 slide, tissue box around (1000,1000)-(9000,7000),
    // 512x512 tiles, 5 requested, seed 7, generous attempt cap
    let slide = standard_slide();
    let tiler = RandomTiler::new(
        SamplerConfig::new(512u32, 5)
            .with_seed(7)
            .with_max_iter(10_000),
    )
    .unwrap();

    let report = tiler.extract_all(&slide).unwrap();
    assert!(report.complete);
    assert_eq!(report.accepted(), 5);

    let sampling_box = tissue_box(&slide).unwrap();
    for (tile, coords) in &report.tiles {
        assert_eq!(coords.width(), 512);
        assert_eq!(coords.height(), 512);
        assert!(
            sampling_box.contains(coords),
            "tile {coords} escaped sampling box {sampling_box}"
        );
        assert_eq!(tile.level(), 0);
        assert_eq!(tile.image().dimensions(), (512, 512));
    }
}

#[test]
fn test_fixed_seed_reproduces_accepted_sequence() {
    init_tracing();
    let slide = standard_slide();
    let tiler = RandomTiler::new(SamplerConfig::new(512u32, 5).with_seed(7)).unwrap();

    let first: Vec<CoordinatePair> = tiler
        .extract_all(&slide)
        .unwrap()
        .tiles
        .into_iter()
        .map(|(_, coords)| coords)
        .collect();
    let second: Vec<CoordinatePair> = tiler
        .extract_all(&slide)
        .unwrap()
        .tiles
        .into_iter()
        .map(|(_, coords)| coords)
        .collect();

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

#[test]
fn test_unchecked_sampling_accepts_blank_tiles() {
    init_tracing();
    // A blank slide yields pure-white tiles that the validator would
    // always reject; with check_tissue off every draw is accepted, so the
    // validator cannot have been consulted
    let slide = SyntheticSlide::blank(Dimensions::new(10_000, 8_000));
    let tiler = RandomTiler::new(
        SamplerConfig::new(512u32, 10).with_check_tissue(false),
    )
    .unwrap();

    let report = tiler.extract_all(&slide).unwrap();
    assert_eq!(report.accepted(), 10);
    assert_eq!(report.attempts, 10);
    assert_eq!(slide.read_count(), 10);

    // The sampling universe is the whole level-0 extent
    let extent = CoordinatePair::new(0, 0, 10_000, 8_000).unwrap();
    for (_, coords) in &report.tiles {
        assert!(extent.contains(coords));
    }
}

#[test]
fn test_attempt_cap_yields_partial_result() {
    init_tracing();
    // Tissue region exists but is barely larger than a tile, so most
    // draws straddle its border and return blank tiles; a small cap
    // forces a partial outcome
    let slide = SyntheticSlide::with_tissue(
        Dimensions::new(10_000, 8_000),
        CoordinatePair::new(4_000, 4_000, 4_600, 4_600).unwrap(),
    );
    let tiler = RandomTiler::new(
        SamplerConfig::new(512u32, 50).with_max_iter(60),
    )
    .unwrap();

    let report = tiler.extract_all(&slide).unwrap();
    assert!(!report.complete);
    assert!(report.accepted() < 50);
    assert_eq!(report.attempts, 60);
}

#[test]
fn test_level1_tiles_map_back_to_level0() {
    init_tracing();
    // Two-level pyramid with 2x downsample: a 512 tile read at level 1
    // covers a 1024x1024 level-0 footprint aligned to even coordinates
    let slide = SyntheticSlide::new(
        vec![Dimensions::new(10_000, 8_000), Dimensions::new(5_000, 4_000)],
        Some(CoordinatePair::new(1_000, 1_000, 9_000, 7_000).unwrap()),
    );
    let tiler = RandomTiler::new(
        SamplerConfig::new(512u32, 3).with_level(1).with_seed(11),
    )
    .unwrap();

    let report = tiler.extract_all(&slide).unwrap();
    assert!(report.complete);
    for (tile, coords) in &report.tiles {
        assert_eq!(tile.level(), 1);
        assert_eq!(coords.width(), 1_024);
        assert_eq!(coords.height(), 1_024);
        assert_eq!(coords.x_ul % 2, 0);
        assert_eq!(coords.y_ul % 2, 0);
        assert_eq!(tile.image().dimensions(), (512, 512));
    }
}

#[test]
fn test_construction_fails_when_cap_below_target() {
    init_tracing();
    let result = RandomTiler::new(SamplerConfig::new(512u32, 5).with_max_iter(3));
    assert_eq!(
        result.err(),
        Some(ConfigError::MaxIterTooSmall {
            max_iter: 3,
            n_tiles: 5
        })
    );
}

#[test]
fn test_invalid_level_fails_before_any_read() {
    init_tracing();
    let slide = standard_slide();
    let tiler = RandomTiler::new(SamplerConfig::new(512u32, 5).with_level(7)).unwrap();

    let result = tiler.extract(&slide);
    assert!(matches!(
        result,
        Err(SamplerError::Config(ConfigError::InvalidLevel {
            level: 7,
            level_count: 1
        }))
    ));
    assert_eq!(slide.read_count(), 0);
}

#[test]
fn test_tissue_box_too_small_for_tile_fails_fast() {
    init_tracing();
    // Tissue segments to roughly a 300x300 level-0 box: no 512 tile fits,
    // and the sampler must refuse rather than clamp toward the edge
    let slide = SyntheticSlide::with_tissue(
        Dimensions::new(10_000, 8_000),
        CoordinatePair::new(4_000, 4_000, 4_300, 4_300).unwrap(),
    );
    let tiler = RandomTiler::new(SamplerConfig::new(512u32, 1)).unwrap();

    let result = tiler.extract(&slide);
    assert!(matches!(result, Err(SamplerError::Geometry(_))));
    assert_eq!(slide.read_count(), 0);
}

#[test]
fn test_lazy_iteration_reads_on_demand() {
    init_tracing();
    let slide = standard_slide();
    let tiler = RandomTiler::new(SamplerConfig::new(512u32, 5).with_seed(7)).unwrap();

    let mut iter = tiler.extract(&slide).unwrap();
    let reads_after_setup = slide.read_count();

    iter.next().unwrap().unwrap();
    let reads_after_one = slide.read_count();
    assert!(reads_after_one > reads_after_setup);

    // Draining performs the remaining reads
    let rest: Vec<_> = iter.by_ref().collect();
    assert!(rest.iter().all(|r| r.is_ok()));
    assert!(iter.is_complete());
}
