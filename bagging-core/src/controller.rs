//! Async driver for the walkthrough.
//!
//! [`Explorer`] feeds actions through the wizard reducer and executes the
//! commands it returns. Training failures never reach the caller: they are
//! logged and replaced with a synthetic result so the results step always
//! has something to show.

use crate::backend::TrainingBackend;
use crate::config::DemoConfig;
use crate::dataset::{Dataset, DatasetOption};
use crate::error::Result;
use crate::sidebar::SidebarState;
use crate::synthetic::synthetic_result;
use crate::types::TrainingResult;
use crate::wizard::{Action, Command, ExplorerState, reduce};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use std::path::Path;
use tracing::{info, warn};

/// Owns the session state, a training backend and the demo RNG.
pub struct Explorer<B: TrainingBackend> {
    state: ExplorerState,
    backend: B,
    rng: StdRng,
    remote_datasets: bool,
}

impl<B: TrainingBackend> std::fmt::Debug for Explorer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("step", &self.state.step)
            .field("loading", &self.state.loading)
            .field("remote_datasets", &self.remote_datasets)
            .finish()
    }
}

impl<B: TrainingBackend> Explorer<B> {
    pub fn new(backend: B, demo: &DemoConfig) -> Self {
        let rng = match demo.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: ExplorerState::default(),
            backend,
            rng,
            remote_datasets: demo.remote_datasets,
        }
    }

    pub fn state(&self) -> &ExplorerState {
        &self.state
    }

    pub fn results(&self) -> Option<&TrainingResult> {
        self.state.results.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Apply an action and run every command it causes, in order.
    pub async fn dispatch(&mut self, action: Action) -> Result<()> {
        let mut pending: VecDeque<Action> = VecDeque::from([action]);
        while let Some(action) = pending.pop_front() {
            for command in reduce(&mut self.state, action) {
                pending.push_back(self.execute(command).await?);
            }
        }
        Ok(())
    }

    /// Parse a CSV upload and make it the active dataset.
    pub async fn upload_csv(&mut self, path: &Path) -> Result<()> {
        let dataset = Dataset::from_csv_path(path)?;
        info!(
            path = %path.display(),
            rows = dataset.n_samples(),
            features = dataset.n_features(),
            "CSV dataset uploaded"
        );
        self.dispatch(Action::SelectDataset(DatasetOption::Csv)).await?;
        self.dispatch(Action::DatasetLoaded(dataset)).await
    }

    async fn execute(&mut self, command: Command) -> Result<Action> {
        match command {
            Command::LoadDataset(option) => {
                let dataset = self.load_dataset(option).await?;
                Ok(Action::DatasetLoaded(dataset))
            }
            Command::Train(config) => Ok(Action::TrainingCompleted(self.train(&config).await)),
        }
    }

    async fn load_dataset(&mut self, option: DatasetOption) -> Result<Dataset> {
        if self.remote_datasets {
            match self.backend.load_dataset(option).await {
                Ok(dataset) => return Ok(dataset),
                Err(e) => {
                    warn!(error = %e, dataset = %option, "Backend dataset unavailable, using placeholder");
                }
            }
        }
        Ok(Dataset::placeholder(option, &mut self.rng)?)
    }

    async fn train(&mut self, config: &SidebarState) -> TrainingResult {
        match self.backend.train(config).await {
            Ok(result) => {
                info!(models = result.ensemble_results.len(), "Training results received");
                result
            }
            Err(e) => {
                warn!(error = %e, "Training backend unavailable, using demo data");
                synthetic_result(config, &mut self.rng)
            }
        }
    }
}
