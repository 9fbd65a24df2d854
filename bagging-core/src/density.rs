//! Gaussian kernel density estimate over prediction probabilities.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed kernel bandwidth.
pub const BANDWIDTH: f64 = 0.08;

/// Number of evaluation points over `[0, 1]`, both ends included.
pub const GRID_POINTS: usize = 101;

/// One point of the density curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub y: f64,
}

/// Estimate the density of `values` on an evenly spaced grid over `[0, 1]`.
///
/// Non-finite values are ignored. Returns an empty curve when nothing is left
/// to estimate from.
pub fn density_curve(values: &[f64]) -> Vec<DensityPoint> {
    let samples: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if samples.is_empty() {
        return Vec::new();
    }

    let n = samples.len() as f64;
    let norm = 1.0 / (n * BANDWIDTH * (2.0 * std::f64::consts::PI).sqrt());
    let steps = (GRID_POINTS - 1) as f64;

    (0..GRID_POINTS)
        .map(|i| {
            let x = i as f64 / steps;
            let sum: f64 = samples
                .iter()
                .map(|v| {
                    let d = (x - v) / BANDWIDTH;
                    (-0.5 * d * d).exp()
                })
                .sum();
            DensityPoint { x, y: norm * sum }
        })
        .collect()
}

/// Same as [`density_curve`] for an untyped payload.
///
/// Anything that is not a JSON array yields an empty curve; non-numeric
/// elements are skipped.
pub fn density_from_json(values: &Value) -> Vec<DensityPoint> {
    match values.as_array() {
        Some(items) => {
            let numbers: Vec<f64> = items.iter().filter_map(Value::as_f64).collect();
            density_curve(&numbers)
        }
        None => Vec::new(),
    }
}

/// Trapezoidal integral of a curve over its own grid.
pub fn trapezoid_area(points: &[DensityPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| (pair[1].x - pair[0].x) * (pair[0].y + pair[1].y) / 2.0)
        .sum()
}

/// The grid point with the highest density.
pub fn mode(points: &[DensityPoint]) -> Option<DensityPoint> {
    points
        .iter()
        .copied()
        .max_by(|a, b| a.y.total_cmp(&b.y))
}
