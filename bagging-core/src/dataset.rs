//! Datasets shown in the walkthrough.
//!
//! Built-in datasets are placeholders of random numbers with the right shape;
//! uploaded CSV files are parsed into the same representation, so every
//! dataset carries numeric feature rows plus a parallel integer `target`.

use crate::error::{DatasetError, SidebarError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Header names that mark the label column in an uploaded CSV.
const TARGET_COLUMN_NAMES: [&str; 4] = ["target", "label", "class", "y"];

/// Dataset choices offered in the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetOption {
    Cancer,
    Wine,
    #[default]
    Iris,
    /// User-uploaded CSV file.
    Csv,
}

impl DatasetOption {
    pub const ALL: [DatasetOption; 4] = [
        DatasetOption::Cancer,
        DatasetOption::Wine,
        DatasetOption::Iris,
        DatasetOption::Csv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetOption::Cancer => "cancer",
            DatasetOption::Wine => "wine",
            DatasetOption::Iris => "iris",
            DatasetOption::Csv => "csv",
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, DatasetOption::Csv)
    }
}

impl std::fmt::Display for DatasetOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetOption {
    type Err = SidebarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cancer" => Ok(DatasetOption::Cancer),
            "wine" => Ok(DatasetOption::Wine),
            "iris" | "flower" => Ok(DatasetOption::Iris),
            "csv" => Ok(DatasetOption::Csv),
            _ => Err(SidebarError::UnknownDatasetOption {
                name: s.to_string(),
            }),
        }
    }
}

/// Feature table with class labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub target: Vec<u32>,
    #[serde(default)]
    pub target_names: Vec<String>,
    #[serde(default)]
    pub description: String,
}

struct BuiltinShape {
    name: &'static str,
    samples: usize,
    headers: fn() -> Vec<String>,
    target_names: &'static [&'static str],
    description: &'static str,
}

fn builtin_shape(option: DatasetOption) -> Option<BuiltinShape> {
    match option {
        DatasetOption::Iris => Some(BuiltinShape {
            name: "Flower Dataset",
            samples: 150,
            headers: || {
                ["Sepal Length", "Sepal Width", "Petal Length", "Petal Width"]
                    .iter()
                    .map(|h| h.to_string())
                    .collect()
            },
            target_names: &["Setosa", "Versicolor", "Virginica"],
            description: "Classic 3-class classification with 4 features",
        }),
        DatasetOption::Wine => Some(BuiltinShape {
            name: "Wine Recognition Dataset",
            samples: 178,
            headers: || (1..=13).map(|i| format!("Chemical {i}")).collect(),
            target_names: &["Class 0", "Class 1", "Class 2"],
            description: "13 chemical analysis features, 3 wine classes",
        }),
        DatasetOption::Cancer => Some(BuiltinShape {
            name: "Breast Cancer Diagnostic Dataset",
            samples: 569,
            headers: || (1..=30).map(|i| format!("Feature {i}")).collect(),
            target_names: &["Malignant", "Benign"],
            description: "30 features, binary classification (malignant/benign)",
        }),
        DatasetOption::Csv => None,
    }
}

impl Dataset {
    /// Fabricate a built-in dataset of the right shape filled with random values.
    ///
    /// Feature cells are uniform in `[0, 1)` and labels uniform over the
    /// classes. These are placeholders, not the real datasets.
    pub fn placeholder<R: Rng>(
        option: DatasetOption,
        rng: &mut R,
    ) -> Result<Self, DatasetError> {
        let shape = builtin_shape(option).ok_or(DatasetError::UploadRequired)?;
        let headers = (shape.headers)();
        let classes = shape.target_names.len() as u32;

        let rows: Vec<Vec<f64>> = (0..shape.samples)
            .map(|_| headers.iter().map(|_| rng.gen_range(0.0..1.0)).collect())
            .collect();
        let target: Vec<u32> = (0..shape.samples)
            .map(|_| rng.gen_range(0..classes))
            .collect();

        Ok(Self {
            name: shape.name.to_string(),
            headers,
            rows,
            target,
            target_names: shape.target_names.iter().map(|n| n.to_string()).collect(),
            description: shape.description.to_string(),
        })
    }

    /// Parse a CSV file with a header row.
    pub fn from_csv_path(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|e| DatasetError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_csv_reader(&name, file)
    }

    /// Parse CSV text with a header row into a dataset.
    ///
    /// The label column is the one named `target`, `label`, `class` or `y`
    /// (any case), otherwise the last column. Non-negative integer labels are
    /// kept as-is; any other labels are encoded in order of first appearance.
    /// Every other column must be numeric.
    pub fn from_csv_reader<R: Read>(name: &str, reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if columns.len() < 2 {
            return Err(DatasetError::TooFewColumns {
                found: columns.len(),
            });
        }

        let target_idx = columns
            .iter()
            .position(|c| TARGET_COLUMN_NAMES.contains(&c.to_ascii_lowercase().as_str()))
            .unwrap_or(columns.len() - 1);

        let mut rows = Vec::new();
        let mut raw_labels = Vec::new();
        for (idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row_no = idx + 1;
            if record.iter().all(str::is_empty) {
                continue;
            }
            if record.len() != columns.len() {
                return Err(DatasetError::RaggedRow {
                    row: row_no,
                    expected: columns.len(),
                    found: record.len(),
                });
            }

            let mut features = Vec::with_capacity(columns.len() - 1);
            for (col, cell) in record.iter().enumerate() {
                if col == target_idx {
                    raw_labels.push(cell.to_string());
                    continue;
                }
                let value = cell
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DatasetError::NonNumeric {
                        row: row_no,
                        column: columns[col].clone(),
                        value: cell.to_string(),
                    })?;
                features.push(value);
            }
            rows.push(features);
        }

        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }

        let (target, target_names) = encode_labels(&raw_labels);
        let headers: Vec<String> = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target_idx)
            .map(|(_, c)| c.clone())
            .collect();

        let description = format!(
            "{} samples, {} features, {} classes (uploaded)",
            rows.len(),
            headers.len(),
            target_names.len()
        );
        debug!(
            name,
            rows = rows.len(),
            target_column = columns[target_idx].as_str(),
            "Parsed CSV dataset"
        );

        let dataset = Self {
            name: name.to_string(),
            headers,
            rows,
            target,
            target_names,
            description,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Check the shape invariants shared by all datasets.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.rows.len() != self.target.len() {
            return Err(DatasetError::RowCountMismatch {
                rows: self.rows.len(),
                targets: self.target.len(),
            });
        }
        if let Some((row, r)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != self.headers.len())
        {
            return Err(DatasetError::RowWidthMismatch {
                row,
                expected: self.headers.len(),
                found: r.len(),
            });
        }
        if !self.target_names.is_empty() {
            let classes = self.target_names.len();
            if let Some((row, &label)) = self
                .target
                .iter()
                .enumerate()
                .find(|(_, l)| **l as usize >= classes)
            {
                return Err(DatasetError::UnknownClass {
                    row,
                    label,
                    classes,
                });
            }
        }
        Ok(())
    }

    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.headers.len()
    }

    /// First `n` rows paired with their labels.
    pub fn preview(&self, n: usize) -> Vec<(&[f64], u32)> {
        self.rows
            .iter()
            .zip(&self.target)
            .take(n)
            .map(|(r, &t)| (r.as_slice(), t))
            .collect()
    }

    /// Samples per class label, in label order.
    ///
    /// Every named class is listed, even when empty; unnamed labels are listed
    /// only when they occur.
    pub fn class_counts(&self) -> Vec<(u32, usize)> {
        let mut counts: BTreeMap<u32, usize> =
            (0..self.target_names.len() as u32).map(|l| (l, 0)).collect();
        for &label in &self.target {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Display name for a class label.
    pub fn class_name(&self, label: u32) -> String {
        self.target_names
            .get(label as usize)
            .cloned()
            .unwrap_or_else(|| format!("Class {label}"))
    }
}

/// Turn raw label strings into integer classes plus their names.
fn encode_labels(raw: &[String]) -> (Vec<u32>, Vec<String>) {
    let numeric: Option<Vec<u32>> = raw
        .iter()
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
                .map(|v| v as u32)
        })
        .collect();

    // Integer labels are kept only when they already form 0..k.
    if let Some(labels) = numeric {
        let distinct: BTreeSet<u32> = labels.iter().copied().collect();
        let classes = distinct.len();
        let dense = classes <= raw.len()
            && distinct.last().is_none_or(|&max| max as usize + 1 == classes);
        if dense {
            let names = (0..classes).map(|i| format!("Class {i}")).collect();
            return (labels, names);
        }
    }

    let mut names: Vec<String> = Vec::new();
    let labels = raw
        .iter()
        .map(|s| match names.iter().position(|n| n == s) {
            Some(i) => i as u32,
            None => {
                names.push(s.clone());
                (names.len() - 1) as u32
            }
        })
        .collect();
    (labels, names)
}
