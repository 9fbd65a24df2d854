//! # Chart Transforms
//!
//! Pure transformations from a [`TrainingResult`](crate::types::TrainingResult)
//! into chart-ready series. Missing or malformed inputs produce empty series
//! (or `None`) so a renderer can simply draw nothing.

pub mod accuracy;
pub mod confusion;
pub mod histogram;

pub use accuracy::{
    AccuracyBar, ScatterPoint, accuracy_bars, accuracy_scatter, bagging_improvement, best_model,
};
pub use confusion::{CellKind, ConfusionCell, ConfusionSummary};
pub use histogram::{HISTOGRAM_BINS, HistogramBin, probability_histogram};
