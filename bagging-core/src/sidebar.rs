//! Sidebar configuration: dataset choice, base model, ensemble size, and the
//! ensemble methods to compare against.
//!
//! The wire format uses the camelCase keys the training backend expects
//! (`dataOption`, `baseModel`, `nEstimators`, `testSize`, `maxDepth`,
//! `compareWith`). All mutation goes through [`SidebarState::apply`].

use crate::dataset::DatasetOption;
use crate::error::SidebarError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// How much a base model's predictions vary with its training sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    High,
    Medium,
    Low,
}

impl Variance {
    /// How much bagging is expected to help a model with this profile.
    pub fn bagging_benefit(&self) -> &'static str {
        match self {
            Variance::High => "large",
            Variance::Medium => "moderate",
            Variance::Low => "limited",
        }
    }
}

/// Algorithm that gets bagged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseModel {
    #[default]
    #[serde(rename = "Decision Tree")]
    DecisionTree,
    #[serde(rename = "Logistic Regression")]
    LogisticRegression,
    #[serde(rename = "K-Nearest Neighbors")]
    KNearestNeighbors,
    #[serde(rename = "Support Vector Machine")]
    SupportVectorMachine,
    #[serde(rename = "Naive Bayes")]
    NaiveBayes,
    #[serde(rename = "Neural Network")]
    NeuralNetwork,
}

impl BaseModel {
    pub const ALL: [BaseModel; 6] = [
        BaseModel::DecisionTree,
        BaseModel::LogisticRegression,
        BaseModel::KNearestNeighbors,
        BaseModel::SupportVectorMachine,
        BaseModel::NaiveBayes,
        BaseModel::NeuralNetwork,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BaseModel::DecisionTree => "Decision Tree",
            BaseModel::LogisticRegression => "Logistic Regression",
            BaseModel::KNearestNeighbors => "K-Nearest Neighbors",
            BaseModel::SupportVectorMachine => "Support Vector Machine",
            BaseModel::NaiveBayes => "Naive Bayes",
            BaseModel::NeuralNetwork => "Neural Network",
        }
    }

    pub fn variance(&self) -> Variance {
        match self {
            BaseModel::DecisionTree | BaseModel::NeuralNetwork => Variance::High,
            BaseModel::KNearestNeighbors | BaseModel::SupportVectorMachine => Variance::Medium,
            BaseModel::LogisticRegression | BaseModel::NaiveBayes => Variance::Low,
        }
    }
}

impl std::fmt::Display for BaseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalize a model name so "Decision Tree", "decision-tree" and
/// "decision_tree" compare equal.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for BaseModel {
    type Err = SidebarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        BaseModel::ALL
            .into_iter()
            .find(|m| normalize(m.name()) == wanted)
            .ok_or_else(|| SidebarError::UnknownBaseModel {
                name: s.to_string(),
            })
    }
}

/// How an ensemble method combines its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnsembleStyle {
    /// Independent members trained in parallel on resampled data.
    Parallel,
    /// Members trained one after another on the previous members' mistakes.
    Sequential,
}

impl std::fmt::Display for EnsembleStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnsembleStyle::Parallel => f.write_str("parallel"),
            EnsembleStyle::Sequential => f.write_str("sequential"),
        }
    }
}

/// Ensemble method shown next to plain bagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonModel {
    #[serde(rename = "Random Forest")]
    RandomForest,
    #[serde(rename = "AdaBoost")]
    AdaBoost,
    #[serde(rename = "Gradient Boosting")]
    GradientBoosting,
    #[serde(rename = "Extra Trees")]
    ExtraTrees,
    #[serde(rename = "XGBoost")]
    XgBoost,
    #[serde(rename = "LightGBM")]
    LightGbm,
}

impl ComparisonModel {
    pub const ALL: [ComparisonModel; 6] = [
        ComparisonModel::RandomForest,
        ComparisonModel::AdaBoost,
        ComparisonModel::GradientBoosting,
        ComparisonModel::ExtraTrees,
        ComparisonModel::XgBoost,
        ComparisonModel::LightGbm,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ComparisonModel::RandomForest => "Random Forest",
            ComparisonModel::AdaBoost => "AdaBoost",
            ComparisonModel::GradientBoosting => "Gradient Boosting",
            ComparisonModel::ExtraTrees => "Extra Trees",
            ComparisonModel::XgBoost => "XGBoost",
            ComparisonModel::LightGbm => "LightGBM",
        }
    }

    pub fn style(&self) -> EnsembleStyle {
        match self {
            ComparisonModel::RandomForest | ComparisonModel::ExtraTrees => EnsembleStyle::Parallel,
            _ => EnsembleStyle::Sequential,
        }
    }
}

impl std::fmt::Display for ComparisonModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComparisonModel {
    type Err = SidebarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        ComparisonModel::ALL
            .into_iter()
            .find(|m| normalize(m.name()) == wanted)
            .ok_or_else(|| SidebarError::UnknownComparisonModel {
                name: s.to_string(),
            })
    }
}

/// Number of models in the ensemble, always within `1..=50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct EnsembleSize(u32);

impl EnsembleSize {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 50;

    /// Strict constructor: out-of-range values are rejected.
    pub fn new(value: i64) -> Result<Self, SidebarError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(SidebarError::EnsembleSizeOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Slider semantics: out-of-range values snap to the nearest bound.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u32)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for EnsembleSize {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<i64> for EnsembleSize {
    type Error = SidebarError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EnsembleSize> for u32 {
    fn from(size: EnsembleSize) -> Self {
        size.0
    }
}

impl std::fmt::Display for EnsembleSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const TEST_SIZE_RANGE: (u32, u32) = (5, 50);
pub const MAX_DEPTH_RANGE: (u32, u32) = (1, 20);

fn clamp_to(value: i64, (lo, hi): (u32, u32)) -> u32 {
    value.clamp(lo as i64, hi as i64) as u32
}

fn default_test_size() -> u32 {
    30
}

fn default_max_depth() -> u32 {
    3
}

fn default_compare_with() -> Vec<ComparisonModel> {
    vec![ComparisonModel::RandomForest, ComparisonModel::AdaBoost]
}

/// User-selected training configuration, sent verbatim as the training payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarState {
    #[serde(default)]
    pub data_option: DatasetOption,
    #[serde(default)]
    pub base_model: BaseModel,
    #[serde(rename = "nEstimators", default)]
    pub ensemble_size: EnsembleSize,
    /// Held-out share in percent.
    #[serde(default = "default_test_size")]
    pub test_size: u32,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Selected comparison methods, in the order they were ticked.
    #[serde(default = "default_compare_with")]
    pub compare_with: Vec<ComparisonModel>,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self {
            data_option: DatasetOption::default(),
            base_model: BaseModel::default(),
            ensemble_size: EnsembleSize::default(),
            test_size: default_test_size(),
            max_depth: default_max_depth(),
            compare_with: default_compare_with(),
        }
    }
}

/// A single user edit in the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarAction {
    SetDataOption(DatasetOption),
    SetBaseModel(BaseModel),
    SetEnsembleSize(i64),
    SetTestSize(i64),
    SetMaxDepth(i64),
    ToggleComparison { model: ComparisonModel, enabled: bool },
}

impl SidebarState {
    /// Apply one edit. Numeric inputs are clamped to their control bounds.
    pub fn apply(&mut self, action: SidebarAction) {
        match action {
            SidebarAction::SetDataOption(option) => self.data_option = option,
            SidebarAction::SetBaseModel(model) => self.base_model = model,
            SidebarAction::SetEnsembleSize(n) => self.ensemble_size = EnsembleSize::clamped(n),
            SidebarAction::SetTestSize(n) => self.test_size = clamp_to(n, TEST_SIZE_RANGE),
            SidebarAction::SetMaxDepth(n) => self.max_depth = clamp_to(n, MAX_DEPTH_RANGE),
            SidebarAction::ToggleComparison { model, enabled } => {
                if enabled {
                    if !self.compare_with.contains(&model) {
                        self.compare_with.push(model);
                    }
                } else {
                    self.compare_with.retain(|m| *m != model);
                }
            }
        }
    }

    pub fn compares(&self, model: ComparisonModel) -> bool {
        self.compare_with.contains(&model)
    }

    /// Read an untyped request body, falling back to defaults field by field.
    ///
    /// Unknown names are dropped and numbers are clamped, so any JSON value
    /// yields a usable configuration.
    pub fn from_payload(payload: &Value) -> Self {
        let mut state = Self::default();
        let Some(obj) = payload.as_object() else {
            return state;
        };

        if let Some(option) = obj
            .get("dataOption")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
        {
            state.data_option = option;
        }
        if let Some(model) = obj
            .get("baseModel")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
        {
            state.base_model = model;
        }
        if let Some(n) = obj.get("nEstimators").and_then(as_integer) {
            state.apply(SidebarAction::SetEnsembleSize(n));
        }
        if let Some(n) = obj.get("testSize").and_then(as_integer) {
            state.apply(SidebarAction::SetTestSize(n));
        }
        if let Some(n) = obj.get("maxDepth").and_then(as_integer) {
            state.apply(SidebarAction::SetMaxDepth(n));
        }
        if let Some(items) = obj.get("compareWith").and_then(Value::as_array) {
            state.compare_with.clear();
            for model in items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|s| s.parse::<ComparisonModel>().ok())
            {
                state.apply(SidebarAction::ToggleComparison {
                    model,
                    enabled: true,
                });
            }
        }
        state
    }
}

/// Integers, or floats truncated toward zero (sliders may send `12.0`).
fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_state() {
        let state = SidebarState::default();
        assert_eq!(state.data_option, DatasetOption::Iris);
        assert_eq!(state.base_model, BaseModel::DecisionTree);
        assert_eq!(state.ensemble_size.get(), 10);
        assert_eq!(state.test_size, 30);
        assert_eq!(state.max_depth, 3);
        assert_eq!(
            state.compare_with,
            vec![ComparisonModel::RandomForest, ComparisonModel::AdaBoost]
        );
    }

    #[test]
    fn test_wire_format_matches_backend_keys() {
        let value = serde_json::to_value(SidebarState::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "dataOption": "iris",
                "baseModel": "Decision Tree",
                "nEstimators": 10,
                "testSize": 30,
                "maxDepth": 3,
                "compareWith": ["Random Forest", "AdaBoost"]
            })
        );
    }

    #[test]
    fn test_ensemble_size_strict_rejects_out_of_range() {
        assert!(EnsembleSize::new(0).is_err());
        assert!(EnsembleSize::new(51).is_err());
        assert!(EnsembleSize::new(-3).is_err());
        assert_eq!(EnsembleSize::new(1).unwrap().get(), 1);
        assert_eq!(EnsembleSize::new(50).unwrap().get(), 50);
    }

    #[test]
    fn test_ensemble_size_slider_clamps() {
        let mut state = SidebarState::default();
        state.apply(SidebarAction::SetEnsembleSize(500));
        assert_eq!(state.ensemble_size.get(), 50);
        state.apply(SidebarAction::SetEnsembleSize(0));
        assert_eq!(state.ensemble_size.get(), 1);
        state.apply(SidebarAction::SetEnsembleSize(25));
        assert_eq!(state.ensemble_size.get(), 25);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_estimators() {
        let err = serde_json::from_value::<SidebarState>(json!({"nEstimators": 80}));
        assert!(err.is_err());
    }

    #[test]
    fn test_toggle_comparison_is_idempotent_and_ordered() {
        let mut state = SidebarState::default();
        state.apply(SidebarAction::ToggleComparison {
            model: ComparisonModel::LightGbm,
            enabled: true,
        });
        state.apply(SidebarAction::ToggleComparison {
            model: ComparisonModel::LightGbm,
            enabled: true,
        });
        state.apply(SidebarAction::ToggleComparison {
            model: ComparisonModel::RandomForest,
            enabled: false,
        });
        assert_eq!(
            state.compare_with,
            vec![ComparisonModel::AdaBoost, ComparisonModel::LightGbm]
        );
        assert!(!state.compares(ComparisonModel::RandomForest));
    }

    #[test]
    fn test_other_numeric_fields_clamp() {
        let mut state = SidebarState::default();
        state.apply(SidebarAction::SetTestSize(99));
        state.apply(SidebarAction::SetMaxDepth(0));
        assert_eq!(state.test_size, 50);
        assert_eq!(state.max_depth, 1);
    }

    #[test]
    fn test_model_names_parse_loosely() {
        assert_eq!(
            "decision-tree".parse::<BaseModel>().unwrap(),
            BaseModel::DecisionTree
        );
        assert_eq!(
            "K-Nearest Neighbors".parse::<BaseModel>().unwrap(),
            BaseModel::KNearestNeighbors
        );
        assert_eq!(
            "xgboost".parse::<ComparisonModel>().unwrap(),
            ComparisonModel::XgBoost
        );
        assert!("perceptron".parse::<BaseModel>().is_err());
    }

    #[test]
    fn test_from_payload_is_lenient() {
        let state = SidebarState::from_payload(&json!({
            "dataOption": "wine",
            "baseModel": "Naive Bayes",
            "nEstimators": 400,
            "testSize": "20",
            "compareWith": ["Gradient Boosting", "Bogus", "Gradient Boosting"]
        }));
        assert_eq!(state.data_option, DatasetOption::Wine);
        assert_eq!(state.base_model, BaseModel::NaiveBayes);
        assert_eq!(state.ensemble_size.get(), 50);
        assert_eq!(state.test_size, 20);
        assert_eq!(state.max_depth, 3);
        assert_eq!(state.compare_with, vec![ComparisonModel::GradientBoosting]);
    }

    #[test]
    fn test_from_payload_non_object_gives_defaults() {
        assert_eq!(
            SidebarState::from_payload(&json!(null)),
            SidebarState::default()
        );
        assert_eq!(
            SidebarState::from_payload(&json!([1, 2])),
            SidebarState::default()
        );
    }

    #[test]
    fn test_variance_profiles() {
        assert_eq!(BaseModel::DecisionTree.variance(), Variance::High);
        assert_eq!(BaseModel::NaiveBayes.variance(), Variance::Low);
        assert_eq!(Variance::High.bagging_benefit(), "large");
        assert_eq!(ComparisonModel::ExtraTrees.style(), EnsembleStyle::Parallel);
        assert_eq!(ComparisonModel::AdaBoost.style(), EnsembleStyle::Sequential);
        assert_eq!(ComparisonModel::LightGbm.style().to_string(), "sequential");
        assert_eq!(
            serde_json::to_value(EnsembleStyle::Parallel).unwrap(),
            serde_json::json!("parallel")
        );
    }
}
