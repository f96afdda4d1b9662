//! Weighted metering statistics: luminance, CDF, percentiles and clipping.
//!
//! Every function here is a pure function of its inputs. Weighting is applied
//! when the distribution is accumulated, never baked into luminance values.

use serde::{Deserialize, Serialize};

use super::WeightMap;
use crate::parallel::paired_chunk_fold;

/// Number of bins in the weighted histogram.
pub const HISTOGRAM_BINS: usize = 1024;

/// Luminance at or above which a pixel is saturated.
pub const SATURATION: f32 = 1.0;

/// Rec.709 luma coefficients for linear RGB.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Cumulative distribution of weight mass over the observed luminance range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedHistogram {
    /// Cumulative weight fraction through the end of each bin, non-decreasing,
    /// last entry exactly 1.0 (all zero when there was no weight)
    pub cdf: Vec<f64>,
    pub min: f32,
    pub max: f32,
}

/// Weight fractions at the two ends of the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipStats {
    /// Weight fraction at or above saturation
    pub highlight_clip: f64,
    /// Weight fraction at or below the shadow threshold
    pub shadow_clip: f64,
}

/// Aggregate telemetry for one metering pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeteringStats {
    pub mean: f64,
    pub median: f64,
    pub p05: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
    pub highlight_clip: f64,
    pub shadow_clip: f64,
    /// log2(p95 / p05); zero when the low percentile is black
    pub dynamic_range_stops: f64,
}

/// Rec.709 luma of one linear RGB triple.
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Luminance of an interleaved linear RGBA buffer.
///
/// Values are left unweighted; the weight map only has to describe the same
/// number of pixels.
pub fn weighted_luminance(rgba: &[f32], weights: &WeightMap) -> Result<Vec<f32>, String> {
    if rgba.len() % 4 != 0 {
        return Err(format!(
            "RGBA buffer length {} is not a multiple of 4",
            rgba.len()
        ));
    }

    let pixel_count = rgba.len() / 4;
    if pixel_count != weights.len() {
        return Err(format!(
            "Image has {} pixels but the weight map has {}",
            pixel_count,
            weights.len()
        ));
    }

    Ok(rgba
        .chunks_exact(4)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect())
}

/// Multiply every luminance by `gain`, saturating at [`SATURATION`].
pub fn scale_luminance(luminance: &[f32], gain: f32) -> Vec<f32> {
    luminance
        .iter()
        .map(|&v| (v * gain).clamp(0.0, SATURATION))
        .collect()
}

/// Build the weighted CDF of `luminance`.
///
/// The range spans the finite values of pixels that carry weight. A range of
/// zero width yields a flat CDF whose percentiles all equal that value.
pub fn weighted_histogram(luminance: &[f32], weights: &[f32]) -> WeightedHistogram {
    let (min, max) = weighted_range(luminance, weights);
    let range = max - min;

    if range <= 0.0 {
        return WeightedHistogram {
            cdf: vec![1.0; HISTOGRAM_BINS],
            min,
            max,
        };
    }

    let scale = HISTOGRAM_BINS as f32 / range;
    let bins = paired_chunk_fold(
        luminance,
        weights,
        || vec![0.0f64; HISTOGRAM_BINS],
        |mut bins, v, w| {
            if v.is_finite() && w > 0.0 {
                let idx = (((v - min) * scale).max(0.0) as usize).min(HISTOGRAM_BINS - 1);
                bins[idx] += w as f64;
            }
            bins
        },
        |mut a, b| {
            for (x, y) in a.iter_mut().zip(b) {
                *x += y;
            }
            a
        },
    );

    let total: f64 = bins.iter().sum();
    let mut cdf = Vec::with_capacity(HISTOGRAM_BINS);
    let mut running = 0.0f64;
    for mass in bins {
        running += mass;
        cdf.push(if total > 0.0 { running / total } else { 0.0 });
    }
    if total > 0.0 {
        if let Some(last) = cdf.last_mut() {
            *last = 1.0;
        }
    }

    WeightedHistogram { cdf, min, max }
}

fn weighted_range(luminance: &[f32], weights: &[f32]) -> (f32, f32) {
    let (min, max) = paired_chunk_fold(
        luminance,
        weights,
        || (f32::INFINITY, f32::NEG_INFINITY),
        |(lo, hi), v, w| {
            if v.is_finite() && w > 0.0 {
                (lo.min(v), hi.max(v))
            } else {
                (lo, hi)
            }
        },
        |a, b| (a.0.min(b.0), a.1.max(b.1)),
    );

    if min <= max {
        (min, max)
    } else {
        (0.0, 0.0)
    }
}

/// Invert the CDF at each probability in `probabilities` (0.0-1.0).
///
/// Bin `i` covers `[min + i*w, min + (i+1)*w)`; its CDF sample sits on the
/// bin's upper edge and the CDF is taken as 0 at `min`. The result linearly
/// interpolates between the two samples bracketing each probability.
pub fn percentiles(cdf: &[f64], probabilities: &[f64], min: f32, max: f32) -> Vec<f32> {
    let range = max - min;
    if cdf.is_empty() || range <= 0.0 {
        return vec![min; probabilities.len()];
    }

    let width = range as f64 / cdf.len() as f64;
    probabilities
        .iter()
        .map(|&p| {
            let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.5 };
            match cdf.iter().position(|&c| c >= p) {
                Some(i) => {
                    let lower = if i == 0 { 0.0 } else { cdf[i - 1] };
                    let upper = cdf[i];
                    let frac = if upper > lower {
                        ((p - lower) / (upper - lower)).clamp(0.0, 1.0)
                    } else {
                        0.0
                    };
                    (min as f64 + (i as f64 + frac) * width) as f32
                }
                None => max,
            }
        })
        .collect()
}

/// Weighted median via the CDF.
pub fn weighted_median(luminance: &[f32], weights: &[f32]) -> f32 {
    let hist = weighted_histogram(luminance, weights);
    percentiles(&hist.cdf, &[0.5], hist.min, hist.max)[0]
}

/// Weight fractions at or above saturation and at or below `shadow_epsilon`.
pub fn clipping(luminance: &[f32], weights: &[f32], shadow_epsilon: f64) -> ClipStats {
    let eps = shadow_epsilon as f32;
    let (total, high, low) = paired_chunk_fold(
        luminance,
        weights,
        || (0.0f64, 0.0f64, 0.0f64),
        |(total, high, low), v, w| {
            if w <= 0.0 {
                return (total, high, low);
            }
            let w = w as f64;
            let high = if v >= SATURATION { high + w } else { high };
            let low = if v <= eps { low + w } else { low };
            (total + w, high, low)
        },
        |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2),
    );

    if total <= 0.0 {
        return ClipStats {
            highlight_clip: 0.0,
            shadow_clip: 0.0,
        };
    }

    ClipStats {
        highlight_clip: (high / total).min(1.0),
        shadow_clip: (low / total).min(1.0),
    }
}

/// Full telemetry for one metering pass.
pub fn meter(luminance: &[f32], weights: &[f32], shadow_epsilon: f64) -> MeteringStats {
    let hist = weighted_histogram(luminance, weights);
    let pct = percentiles(&hist.cdf, &[0.05, 0.5, 0.95], hist.min, hist.max);
    let clip = clipping(luminance, weights, shadow_epsilon);

    let (mass, sum) = paired_chunk_fold(
        luminance,
        weights,
        || (0.0f64, 0.0f64),
        |(mass, sum), v, w| {
            if v.is_finite() && w > 0.0 {
                (mass + w as f64, sum + v as f64 * w as f64)
            } else {
                (mass, sum)
            }
        },
        |a, b| (a.0 + b.0, a.1 + b.1),
    );

    let p05 = pct[0] as f64;
    let p95 = pct[2] as f64;
    let dynamic_range_stops = if p05 > 0.0 && p95 > p05 {
        (p95 / p05).log2()
    } else {
        0.0
    };

    MeteringStats {
        mean: if mass > 0.0 { sum / mass } else { 0.0 },
        median: pct[1] as f64,
        p05,
        p95,
        min: hist.min as f64,
        max: hist.max as f64,
        highlight_clip: clip.highlight_clip,
        shadow_clip: clip.shadow_clip,
        dynamic_range_stops,
    }
}
