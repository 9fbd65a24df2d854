//! Error types for the Bagging Explorer core.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering the training backend, dataset loading, sidebar input, and configuration.

use std::path::PathBuf;

/// Top-level error type for the Bagging Explorer core library.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Sidebar error: {0}")]
    Sidebar(#[from] SidebarError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from talking to the external training backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend connection failed: {message}")]
    Connection { message: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Backend error: {status}")]
    Status { status: u16, body: String },

    #[error("Invalid backend response: {message}")]
    InvalidResponse { message: String },
}

/// Errors from building or validating a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("CSV file contains no data rows")]
    Empty,

    #[error("CSV file needs at least two columns (features and a target), found {found}")]
    TooFewColumns { found: usize },

    #[error("Non-numeric value '{value}' in column '{column}' at row {row}")]
    NonNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Dataset has {rows} rows but {targets} target labels")]
    RowCountMismatch { rows: usize, targets: usize },

    #[error("Row {row} has {found} features, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Target label {label} at row {row} has no class name ({classes} classes)")]
    UnknownClass {
        row: usize,
        label: u32,
        classes: usize,
    },

    #[error("The csv option needs an uploaded file")]
    UploadRequired,

    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors from strict sidebar input validation.
#[derive(Debug, thiserror::Error)]
pub enum SidebarError {
    #[error("Ensemble size {value} is outside {min}..={max}")]
    EnsembleSizeOutOfRange { value: i64, min: u32, max: u32 },

    #[error("Unknown base model: {name}")]
    UnknownBaseModel { name: String },

    #[error("Unknown comparison model: {name}")]
    UnknownComparisonModel { name: String },

    #[error("Unknown dataset option: {name}")]
    UnknownDatasetOption { name: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `ExplorerError`.
pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_backend() {
        let err = ExplorerError::Backend(BackendError::Connection {
            message: "connection refused".into(),
        });
        assert_eq!(
            err.to_string(),
            "Backend error: Backend connection failed: connection refused"
        );
    }

    #[test]
    fn test_error_display_status() {
        let err = BackendError::Status {
            status: 503,
            body: "down".into(),
        };
        assert_eq!(err.to_string(), "Backend error: 503");
    }

    #[test]
    fn test_error_display_dataset() {
        let err = ExplorerError::Dataset(DatasetError::NonNumeric {
            row: 4,
            column: "petal".into(),
            value: "n/a".into(),
        });
        assert_eq!(
            err.to_string(),
            "Dataset error: Non-numeric value 'n/a' in column 'petal' at row 4"
        );
    }

    #[test]
    fn test_error_display_sidebar() {
        let err = SidebarError::EnsembleSizeOutOfRange {
            value: 51,
            min: 1,
            max: 50,
        };
        assert_eq!(err.to_string(), "Ensemble size 51 is outside 1..=50");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExplorerError = io_err.into();
        assert!(matches!(err, ExplorerError::Io(_)));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ExplorerError = serde_err.into();
        assert!(matches!(err, ExplorerError::Serialization(_)));
    }
}
