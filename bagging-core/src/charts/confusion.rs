//! Confusion matrix summary with row-normalized cells.

use crate::types::TrainingResult;
use serde::{Deserialize, Serialize};

/// Whether a cell counts correct predictions (diagonal) or errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Correct,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionCell {
    pub count: u64,
    pub kind: CellKind,
    /// `count / row_sum`, or 0 for an empty row.
    pub row_share: f64,
}

impl ConfusionCell {
    /// Row share as a whole percentage.
    pub fn percent(&self) -> u32 {
        (self.row_share * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionSummary {
    pub total: u64,
    pub correct: u64,
    /// `correct / total`, or 0 when the matrix holds no predictions.
    pub accuracy: f64,
    /// `cells[true_class][predicted_class]`.
    pub cells: Vec<Vec<ConfusionCell>>,
}

impl ConfusionSummary {
    /// Summarize a square count matrix. Empty or non-square input gives `None`.
    pub fn from_matrix(matrix: &[Vec<u64>]) -> Option<Self> {
        let n = matrix.len();
        if n == 0 || matrix.iter().any(|row| row.len() != n) {
            return None;
        }

        let total: u64 = matrix.iter().flatten().sum();
        let correct: u64 = matrix.iter().enumerate().map(|(i, row)| row[i]).sum();
        let accuracy = if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        };

        let cells = matrix
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let row_sum: u64 = row.iter().sum();
                row.iter()
                    .enumerate()
                    .map(|(j, &count)| ConfusionCell {
                        count,
                        kind: if i == j {
                            CellKind::Correct
                        } else {
                            CellKind::Error
                        },
                        row_share: if row_sum > 0 {
                            count as f64 / row_sum as f64
                        } else {
                            0.0
                        },
                    })
                    .collect()
            })
            .collect();

        Some(Self {
            total,
            correct,
            accuracy,
            cells,
        })
    }

    pub fn from_result(result: &TrainingResult) -> Option<Self> {
        result
            .confusion_matrix
            .as_deref()
            .and_then(Self::from_matrix)
    }

    pub fn classes(&self) -> usize {
        self.cells.len()
    }

    pub fn errors(&self) -> u64 {
        self.total - self.correct
    }

    /// Recall for each true class (diagonal share of its row).
    pub fn per_class_recall(&self) -> Vec<f64> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, row)| row[i].row_share)
            .collect()
    }
}
