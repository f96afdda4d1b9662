//! Scene metering
//!
//! Turns a linear scene buffer and a spatial weighting into the weighted
//! statistics the exposure selector works from.

mod statistics;
mod weight_map;

#[cfg(test)]
mod tests;

pub use statistics::{
    clipping, luma, meter, percentiles, scale_luminance, weighted_histogram, weighted_luminance,
    weighted_median, ClipStats, MeteringStats, WeightedHistogram, HISTOGRAM_BINS, SATURATION,
};
pub use weight_map::{
    center_weighted, generate_weight_map, spot, subject_mask, WeightMap, WEIGHT_SUM_TOLERANCE,
};
