//! Ten-bin histogram of prediction probabilities.

use serde::{Deserialize, Serialize};

pub const HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Label such as `"0.3-0.4"`.
    pub range: String,
    pub count: usize,
    pub midpoint: f64,
}

/// Bin index for a probability. Values at or above 1.0 fall into the last bin.
fn bin_index(value: f64) -> Option<usize> {
    if value.is_nan() || value < 0.0 {
        return None;
    }
    // Scale rather than divide by the bin width: 0.7 / 0.1 is 6.999...
    let raw = (value * HISTOGRAM_BINS as f64).floor();
    Some((raw as usize).min(HISTOGRAM_BINS - 1))
}

/// Count probabilities into ten equal-width bins over `[0, 1]`.
///
/// A value goes to bin `floor(v * 10)`, clamped to 9, so it always lands in
/// the bin whose label contains it. This differs from `floor(v / 0.1)`, which
/// puts 0.3, 0.6 and 0.7 one bin lower through rounding. NaN and negative
/// values are skipped.
pub fn probability_histogram(values: &[f64]) -> Vec<HistogramBin> {
    let width = 1.0 / HISTOGRAM_BINS as f64;
    let mut counts = [0usize; HISTOGRAM_BINS];
    for idx in values.iter().filter_map(|&v| bin_index(v)) {
        counts[idx] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let lo = i as f64 * width;
            let hi = (i + 1) as f64 * width;
            HistogramBin {
                range: format!("{lo:.1}-{hi:.1}"),
                count,
                midpoint: lo + width / 2.0,
            }
        })
        .collect()
}
