//! The six-step guided walkthrough.
//!
//! Session state lives in [`ExplorerState`] and is only changed by [`reduce`],
//! which is pure: anything that needs I/O (generating or fetching a dataset,
//! calling the training backend) is returned as a [`Command`] for the caller
//! to execute. The results of those commands come back in as actions.

use crate::dataset::{Dataset, DatasetOption};
use crate::sidebar::{SidebarAction, SidebarState};
use crate::types::TrainingResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Walkthrough steps, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Welcome,
    Dataset,
    BaseModel,
    EnsembleSize,
    CompareMethods,
    Results,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Welcome,
        Step::Dataset,
        Step::BaseModel,
        Step::EnsembleSize,
        Step::CompareMethods,
        Step::Results,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    /// The following step; the last step stays put.
    pub fn next(self) -> Step {
        Self::from_index(self.index() + 1).unwrap_or(self)
    }

    /// The preceding step; the first step stays put.
    pub fn prev(self) -> Step {
        self.index()
            .checked_sub(1)
            .and_then(Self::from_index)
            .unwrap_or(self)
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Welcome => "Welcome",
            Step::Dataset => "Choose Dataset",
            Step::BaseModel => "Select Base Model",
            Step::EnsembleSize => "Ensemble Size",
            Step::CompareMethods => "Compare Methods",
            Step::Results => "Results",
        }
    }

    /// Fraction of the walkthrough reached, in `(0, 1]`.
    pub fn progress(self) -> f64 {
        (self.index() + 1) as f64 / Self::COUNT as f64
    }

    pub fn is_first(self) -> bool {
        self == Step::Welcome
    }

    pub fn is_last(self) -> bool {
        self == Step::Results
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Everything the walkthrough remembers. Memory only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorerState {
    pub step: Step,
    pub sidebar: SidebarState,
    pub dataset: Option<Dataset>,
    pub results: Option<TrainingResult>,
    /// A training request is in flight.
    pub loading: bool,
}

impl ExplorerState {
    /// Whether the train control is enabled.
    pub fn can_train(&self) -> bool {
        self.dataset.is_some() && !self.loading
    }
}

/// User intents and command completions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Next,
    Back,
    GoTo(Step),
    Sidebar(SidebarAction),
    SelectDataset(DatasetOption),
    DatasetLoaded(Dataset),
    Train,
    TrainingCompleted(TrainingResult),
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadDataset(DatasetOption),
    Train(SidebarState),
}

/// Apply one action to the session state.
pub fn reduce(state: &mut ExplorerState, action: Action) -> Vec<Command> {
    match action {
        Action::Next => state.step = state.step.next(),
        Action::Back => state.step = state.step.prev(),
        Action::GoTo(step) => state.step = step,
        Action::Sidebar(edit) => state.sidebar.apply(edit),
        Action::SelectDataset(option) => {
            state.sidebar.apply(SidebarAction::SetDataOption(option));
            if option.is_builtin() {
                return vec![Command::LoadDataset(option)];
            }
            // csv: wait for the upload to arrive as DatasetLoaded
        }
        Action::DatasetLoaded(dataset) => {
            debug!(name = dataset.name.as_str(), rows = dataset.n_samples(), "Dataset loaded");
            state.dataset = Some(dataset);
            state.step = Step::BaseModel;
        }
        Action::Train => {
            if !state.can_train() {
                debug!(loading = state.loading, "Ignoring train request");
                return Vec::new();
            }
            state.step = Step::Results;
            state.loading = true;
            return vec![Command::Train(state.sidebar.clone())];
        }
        Action::TrainingCompleted(result) => {
            state.results = Some(result);
            state.loading = false;
        }
    }
    Vec::new()
}
