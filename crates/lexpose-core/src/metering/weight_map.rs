//! Spatial weight maps for metering.

use serde::{Deserialize, Serialize};

use crate::models::MeteringMode;

/// Tolerance on the normalized sum of a weight map.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-4;

/// Per-pixel non-negative weights summing to 1.
///
/// A map whose raw weights summed to zero stays all-zero and reports itself
/// degenerate; callers substitute [`WeightMap::uniform`] before metering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightMap {
    width: usize,
    height: usize,
    weights: Vec<f32>,
}

impl WeightMap {
    /// Every pixel weighted 1/N.
    pub fn uniform(width: usize, height: usize) -> Self {
        let count = width * height;
        let weight = if count > 0 { 1.0 / count as f32 } else { 0.0 };
        Self {
            width,
            height,
            weights: vec![weight; count],
        }
    }

    /// Normalize raw non-negative weights. Negative and non-finite entries
    /// are treated as zero.
    pub fn from_raw(width: usize, height: usize, raw: Vec<f32>) -> Result<Self, String> {
        if raw.len() != width * height {
            return Err(format!(
                "Weight map has {} values but the frame is {}x{} ({} pixels)",
                raw.len(),
                width,
                height,
                width * height
            ));
        }
        Ok(Self::normalized(width, height, raw))
    }

    fn normalized(width: usize, height: usize, mut weights: Vec<f32>) -> Self {
        for w in weights.iter_mut() {
            if !w.is_finite() || *w < 0.0 {
                *w = 0.0;
            }
        }

        let sum: f64 = weights.iter().map(|&w| w as f64).sum();
        if sum > 0.0 {
            for w in weights.iter_mut() {
                *w = (*w as f64 / sum) as f32;
            }
        }

        Self {
            width,
            height,
            weights,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().map(|&w| w as f64).sum()
    }

    /// True when no pixel carries weight.
    pub fn is_degenerate(&self) -> bool {
        self.weights.iter().all(|&w| w <= 0.0)
    }

    /// This map, or the uniform map when this one is degenerate.
    pub fn or_uniform(self) -> Self {
        if self.is_degenerate() {
            crate::verbose_println!(
                "[lexpose] Weight map {}x{} carries no weight; metering full frame",
                self.width,
                self.height
            );
            Self::uniform(self.width, self.height)
        } else {
            self
        }
    }
}

/// Build a weight map for `mode` over a `width` x `height` frame.
pub fn generate_weight_map(mode: &MeteringMode, width: usize, height: usize) -> WeightMap {
    match *mode {
        MeteringMode::Matrix => WeightMap::uniform(width, height),
        MeteringMode::CenterWeighted { sigma } => center_weighted(width, height, sigma),
        MeteringMode::Spot {
            center_x,
            center_y,
            radius,
        } => spot(width, height, center_x, center_y, radius),
    }
}

/// Gaussian falloff from the frame center; `sigma` is a fraction of the
/// short image side.
pub fn center_weighted(width: usize, height: usize, sigma: f64) -> WeightMap {
    let short_side = width.min(height).max(1) as f64;
    let sigma_px = (sigma.abs() * short_side).max(1e-3);
    let two_sigma_sq = 2.0 * sigma_px * sigma_px;
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;

    let mut raw = Vec::with_capacity(width * height);
    for y in 0..height {
        let dy = y as f64 + 0.5 - cy;
        for x in 0..width {
            let dx = x as f64 + 0.5 - cx;
            raw.push((-(dx * dx + dy * dy) / two_sigma_sq).exp() as f32);
        }
    }

    WeightMap::normalized(width, height, raw)
}

/// Hard disc around a normalized center. The pixel containing the center is
/// always metered so tiny spots never come out empty.
pub fn spot(width: usize, height: usize, center_x: f64, center_y: f64, radius: f64) -> WeightMap {
    if width == 0 || height == 0 {
        return WeightMap::uniform(width, height);
    }

    let short_side = width.min(height) as f64;
    let radius_px = radius.abs() * short_side;
    let radius_sq = radius_px * radius_px;
    let cx = center_x.clamp(0.0, 1.0) * width as f64;
    let cy = center_y.clamp(0.0, 1.0) * height as f64;

    let mut raw = Vec::with_capacity(width * height);
    for y in 0..height {
        let dy = y as f64 + 0.5 - cy;
        for x in 0..width {
            let dx = x as f64 + 0.5 - cx;
            raw.push(if dx * dx + dy * dy <= radius_sq { 1.0 } else { 0.0 });
        }
    }

    let center_px = (cx as usize).min(width - 1);
    let center_py = (cy as usize).min(height - 1);
    raw[center_py * width + center_px] = 1.0;

    WeightMap::normalized(width, height, raw)
}

/// Weight driven by a subject mask in [0, 1]; pixels outside the subject keep
/// `background` of their weight.
///
/// An all-zero mask with zero background yields a degenerate map.
pub fn subject_mask(
    width: usize,
    height: usize,
    mask: &[f32],
    background: f32,
) -> Result<WeightMap, String> {
    if mask.len() != width * height {
        return Err(format!(
            "Subject mask has {} values but the frame is {}x{}",
            mask.len(),
            width,
            height
        ));
    }

    let background = background.clamp(0.0, 1.0);
    let raw = mask
        .iter()
        .map(|&m| {
            let m = if m.is_finite() { m.clamp(0.0, 1.0) } else { 0.0 };
            m + background * (1.0 - m)
        })
        .collect();

    Ok(WeightMap::normalized(width, height, raw))
}
