//! Accuracy bar and scatter series.

use crate::types::EnsembleScores;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SINGLE_MODEL: &str = "Single Model";
pub const BAGGED_MODEL: &str = "Bagged Model";

/// One bar of the model-comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyBar {
    pub name: String,
    pub value: f64,
}

/// One point of the accuracy-vs-model scatter view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Accuracy.
    pub x: f64,
    /// Model index in source order.
    pub y: usize,
    pub name: String,
}

fn numeric_or_zero(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

/// Bars in the insertion order of `scores`; non-numeric scores become 0.
pub fn accuracy_bars(scores: &EnsembleScores) -> Vec<AccuracyBar> {
    scores
        .iter()
        .map(|(name, value)| AccuracyBar {
            name: name.clone(),
            value: numeric_or_zero(value),
        })
        .collect()
}

pub fn accuracy_scatter(scores: &EnsembleScores) -> Vec<ScatterPoint> {
    scores
        .iter()
        .enumerate()
        .map(|(idx, (name, value))| ScatterPoint {
            x: numeric_or_zero(value),
            y: idx,
            name: name.clone(),
        })
        .collect()
}

/// How much bagging improved on the single base model.
///
/// `None` unless both the single and bagged scores are numeric.
pub fn bagging_improvement(scores: &EnsembleScores) -> Option<f64> {
    let single = scores.get(SINGLE_MODEL)?.as_f64()?;
    let bagged = scores.get(BAGGED_MODEL)?.as_f64()?;
    Some(bagged - single)
}

/// The highest-scoring model. Earlier entries win ties.
pub fn best_model(scores: &EnsembleScores) -> Option<AccuracyBar> {
    accuracy_bars(scores)
        .into_iter()
        .fold(None, |best: Option<AccuracyBar>, bar| match best {
            Some(b) if b.value >= bar.value => Some(b),
            _ => Some(bar),
        })
}
