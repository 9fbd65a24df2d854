//! Shared result types exchanged with the training backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Ensemble scores keyed by model display name, in backend order.
///
/// Values are kept as raw JSON so that a malformed score degrades to 0 at
/// chart time instead of failing the whole response.
pub type EnsembleScores = Map<String, Value>;

/// Where a [`TrainingResult`] came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Returned by the external training backend.
    #[default]
    Backend,
    /// Generated locally because the backend was unavailable.
    Synthetic,
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultSource::Backend => write!(f, "backend"),
            ResultSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Results of one training request. Replaced wholesale on the next request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    #[serde(default)]
    pub ensemble_results: EnsembleScores,
    /// Rows are true classes, columns are predicted classes.
    #[serde(
        default,
        deserialize_with = "lenient_matrix",
        skip_serializing_if = "Option::is_none"
    )]
    pub confusion_matrix: Option<Vec<Vec<u64>>>,
    #[serde(default, deserialize_with = "lenient_numbers")]
    pub probability_data: Vec<f64>,
    #[serde(default, deserialize_with = "lenient_numbers")]
    pub feature_importance: Vec<f64>,
    #[serde(default, deserialize_with = "lenient_numbers")]
    pub training_progress: Vec<f64>,
    #[serde(default)]
    pub source: ResultSource,
}

/// A count written as `45` or `45.0`.
fn as_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// Any malformed cell drops the whole matrix.
fn lenient_matrix<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Vec<u64>>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_array().and_then(|rows| {
        rows.iter()
            .map(|row| -> Option<Vec<u64>> { row.as_array()?.iter().map(as_count).collect() })
            .collect()
    }))
}

/// Non-numeric elements are dropped; a non-array reads as empty.
fn lenient_numbers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default())
}

impl TrainingResult {
    /// Numeric score for a model, if present and numeric.
    pub fn score(&self, model: &str) -> Option<f64> {
        self.ensemble_results.get(model).and_then(Value::as_f64)
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == ResultSource::Synthetic
    }
}
