//! Tests for weight maps and metering statistics

use super::*;
use crate::models::MeteringMode;

fn assert_normalized(map: &WeightMap) {
    let sum = map.sum();
    assert!(
        (sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE,
        "weight map sums to {}",
        sum
    );
    assert!(map.as_slice().iter().all(|&w| w >= 0.0));
}

#[test]
fn test_generated_weight_maps_are_normalized() {
    let modes = [
        MeteringMode::Matrix,
        MeteringMode::CenterWeighted { sigma: 0.25 },
        MeteringMode::CenterWeighted { sigma: 2.0 },
        MeteringMode::Spot {
            center_x: 0.5,
            center_y: 0.5,
            radius: 0.05,
        },
        MeteringMode::Spot {
            center_x: 0.1,
            center_y: 0.9,
            radius: 0.2,
        },
    ];

    for mode in &modes {
        let map = generate_weight_map(mode, 64, 48);
        assert_eq!(map.len(), 64 * 48);
        assert_normalized(&map);
    }
}

#[test]
fn test_center_weighted_favors_center() {
    let map = center_weighted(41, 41, 0.2);
    let w = map.as_slice();
    let center = w[20 * 41 + 20];
    let corner = w[0];
    assert!(center > corner * 10.0, "center {} corner {}", center, corner);
}

#[test]
fn test_zero_radius_spot_keeps_center_pixel() {
    let map = spot(10, 10, 0.55, 0.55, 0.0);
    assert_normalized(&map);
    let nonzero: Vec<usize> = map
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, &w)| w > 0.0)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(nonzero, vec![5 * 10 + 5]);
}

#[test]
fn test_subject_mask_weights() {
    let mut mask = vec![0.0f32; 16];
    mask[5] = 1.0;
    mask[6] = 1.0;

    let map = subject_mask(4, 4, &mask, 0.0).unwrap();
    assert_normalized(&map);
    assert!((map.as_slice()[5] - 0.5).abs() < 1e-6);
    assert_eq!(map.as_slice()[0], 0.0);

    let with_background = subject_mask(4, 4, &mask, 0.5).unwrap();
    assert_normalized(&with_background);
    assert!(with_background.as_slice()[5] > with_background.as_slice()[0]);
    assert!(with_background.as_slice()[0] > 0.0);
}

#[test]
fn test_empty_subject_mask_is_degenerate() {
    let map = subject_mask(3, 3, &[0.0; 9], 0.0).unwrap();
    assert!(map.is_degenerate());
    assert_eq!(map.sum(), 0.0);

    let fallback = map.or_uniform();
    assert!(!fallback.is_degenerate());
    assert_normalized(&fallback);
}

#[test]
fn test_weight_map_length_mismatch() {
    assert!(WeightMap::from_raw(4, 4, vec![1.0; 15]).is_err());
    assert!(subject_mask(4, 4, &[1.0; 3], 0.0).is_err());
}

#[test]
fn test_from_raw_drops_negative_and_nan() {
    let map = WeightMap::from_raw(2, 2, vec![1.0, -3.0, f32::NAN, 3.0]).unwrap();
    assert_normalized(&map);
    assert_eq!(map.as_slice()[1], 0.0);
    assert_eq!(map.as_slice()[2], 0.0);
    assert!((map.as_slice()[3] - 0.75).abs() < 1e-6);
}

#[test]
fn test_luminance_from_rgba() {
    let rgba = vec![1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.3, 1.0, 0.0, 0.0, 1.0];
    let weights = WeightMap::uniform(3, 1);
    let lum = weighted_luminance(&rgba, &weights).unwrap();

    assert_eq!(lum.len(), 3);
    assert!((lum[0] - 1.0).abs() < 1e-6);
    assert_eq!(lum[1], 0.0);
    assert!((lum[2] - 0.2126).abs() < 1e-6);
}

#[test]
fn test_luminance_rejects_mismatched_weights() {
    let rgba = vec![0.5; 4 * 6];
    assert!(weighted_luminance(&rgba, &WeightMap::uniform(5, 1)).is_err());
    assert!(weighted_luminance(&rgba[..7], &WeightMap::uniform(6, 1)).is_err());
}

#[test]
fn test_flat_buffer_percentiles() {
    let lum = vec![0.3f32; 100];
    let weights = WeightMap::uniform(10, 10);
    let hist = weighted_histogram(&lum, weights.as_slice());

    assert_eq!(hist.min, hist.max);
    let values = percentiles(&hist.cdf, &[0.05, 0.5, 0.95], hist.min, hist.max);
    assert!(values.iter().all(|&v| v == 0.3));
}

#[test]
fn test_cdf_is_monotone_and_normalized() {
    let lum: Vec<f32> = (0..500).map(|i| ((i * 37) % 500) as f32 / 250.0).collect();
    let weights = center_weighted(25, 20, 0.3);
    let hist = weighted_histogram(&lum, weights.as_slice());

    assert_eq!(hist.cdf.len(), HISTOGRAM_BINS);
    assert!(hist.cdf.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*hist.cdf.last().unwrap(), 1.0);
    assert!(hist.cdf[0] >= 0.0);
}

#[test]
fn test_uniform_ramp_median() {
    let lum: Vec<f32> = (0..1000).map(|i| i as f32 / 999.0).collect();
    let weights = WeightMap::uniform(1000, 1);
    let median = weighted_median(&lum, weights.as_slice());

    assert!((median - 0.5).abs() < 0.01, "median {}", median);
}

#[test]
fn test_weights_shift_median() {
    let mut lum = vec![0.1f32; 50];
    lum.extend(vec![0.9f32; 50]);

    let mut raw = vec![3.0f32; 50];
    raw.extend(vec![1.0f32; 50]);
    let dark_heavy = WeightMap::from_raw(100, 1, raw.clone()).unwrap();
    let median = weighted_median(&lum, dark_heavy.as_slice());
    assert!(median < 0.2, "median {}", median);

    raw.reverse();
    let bright_heavy = WeightMap::from_raw(100, 1, raw).unwrap();
    let median = weighted_median(&lum, bright_heavy.as_slice());
    assert!(median > 0.8, "median {}", median);
}

#[test]
fn test_clipping_fractions() {
    let lum = vec![0.0f32, 0.005, 0.5, 1.0, 1.5];
    let weights = WeightMap::uniform(5, 1);
    let clip = clipping(&lum, weights.as_slice(), 0.01);

    assert!((clip.highlight_clip - 0.4).abs() < 1e-6);
    assert!((clip.shadow_clip - 0.4).abs() < 1e-6);
}

#[test]
fn test_clipping_ignores_unweighted_pixels() {
    let lum = vec![0.0f32, 2.0, 0.5, 2.0, 0.0];
    let weights = WeightMap::from_raw(5, 1, vec![0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
    let clip = clipping(&lum, weights.as_slice(), 0.01);

    assert_eq!(clip.highlight_clip, 0.0);
    assert_eq!(clip.shadow_clip, 0.0);
}

#[test]
fn test_scale_luminance_saturates() {
    let scaled = scale_luminance(&[0.1, 0.4, 0.8], 2.0);
    assert!((scaled[0] - 0.2).abs() < 1e-6);
    assert!((scaled[1] - 0.8).abs() < 1e-6);
    assert_eq!(scaled[2], SATURATION);
}

#[test]
fn test_meter_telemetry() {
    let lum: Vec<f32> = (0..1000).map(|i| 0.01 + i as f32 / 1000.0).collect();
    let weights = WeightMap::uniform(1000, 1);
    let stats = meter(&lum, weights.as_slice(), 0.02);

    assert!((stats.mean - 0.5095).abs() < 1e-3, "mean {}", stats.mean);
    assert!(stats.p05 < stats.median && stats.median < stats.p95);
    assert!((stats.min - 0.01).abs() < 1e-6);
    assert!(stats.dynamic_range_stops > 3.0);
    assert!(stats.shadow_clip > 0.0 && stats.shadow_clip < 0.02);
    assert!(stats.highlight_clip > 0.0);
}

#[test]
fn test_statistics_independent_of_call_order() {
    let lum: Vec<f32> = (0..300).map(|i| (i % 17) as f32 / 10.0).collect();
    let weights = center_weighted(20, 15, 0.3);

    let clip_first = clipping(&lum, weights.as_slice(), 0.05);
    let hist_second = weighted_histogram(&lum, weights.as_slice());

    let hist_first = weighted_histogram(&lum, weights.as_slice());
    let clip_second = clipping(&lum, weights.as_slice(), 0.05);

    assert_eq!(clip_first, clip_second);
    assert_eq!(hist_first, hist_second);
}
