//! # Bagging Explorer Core
//!
//! Core library for Bagging Explorer, an educational walkthrough of
//! bootstrap-aggregated ensemble learning. Provides the chart transforms,
//! kernel density estimator, sidebar and wizard state, dataset loading,
//! synthetic demo results, the training-backend client and the proxy server.

pub mod backend;
pub mod charts;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod density;
pub mod error;
pub mod proxy;
pub mod sidebar;
pub mod synthetic;
pub mod types;
pub mod wizard;

// Re-export commonly used types at the crate root.
pub use backend::{BackendClient, TrainingBackend};
pub use config::{BackendConfig, DemoConfig, ExplorerConfig, ServerConfig, load_config};
pub use controller::Explorer;
pub use dataset::{Dataset, DatasetOption};
pub use density::{DensityPoint, density_curve};
pub use error::{BackendError, ConfigError, DatasetError, ExplorerError, Result, SidebarError};
pub use proxy::{ProxyState, SharedProxy, proxy_router, run_proxy};
pub use sidebar::{BaseModel, ComparisonModel, EnsembleSize, SidebarAction, SidebarState};
pub use synthetic::synthetic_result;
pub use types::{EnsembleScores, ResultSource, TrainingResult};
pub use wizard::{Action, Command, ExplorerState, Step, reduce};
