//! Synthetic training results used when the backend cannot be reached.
//!
//! The numbers are plausible rather than meaningful: the bagged model beats
//! the single model by an amount that grows with the ensemble size, and the
//! selected comparison methods land near the bagged score.

use crate::charts::accuracy::{BAGGED_MODEL, SINGLE_MODEL};
use crate::sidebar::{ComparisonModel, SidebarState};
use crate::types::{EnsembleScores, ResultSource, TrainingResult};
use rand::Rng;
use serde_json::Value;

/// Largest accuracy gain attributed to bagging.
pub const MAX_BAGGING_BOOST: f64 = 0.15;

pub const DEMO_FEATURE_IMPORTANCE: [f64; 4] = [0.25, 0.35, 0.20, 0.20];
pub const DEMO_TRAINING_PROGRESS: [f64; 5] = [0.6, 0.72, 0.81, 0.87, 0.92];

const PROBABILITY_SAMPLES: usize = 15;

/// Accuracy gain for an ensemble of `n` models: `min(0.15, n / 50 * 0.12)`.
pub fn bagging_boost(n_estimators: u32) -> f64 {
    (n_estimators as f64 / 50.0 * 0.12).min(MAX_BAGGING_BOOST)
}

fn score(value: f64) -> Value {
    Value::from(value.clamp(0.0, 1.0))
}

fn comparison_score<R: Rng>(model: ComparisonModel, base: f64, boost: f64, rng: &mut R) -> f64 {
    match model {
        ComparisonModel::RandomForest => base + boost + 0.02 - rng.gen_range(0.0..0.03),
        ComparisonModel::AdaBoost => base + 0.08 + rng.gen_range(0.0..0.04),
        ComparisonModel::GradientBoosting => base + boost + 0.01 + rng.gen_range(0.0..0.02),
        ComparisonModel::ExtraTrees => base + boost + 0.01 - rng.gen_range(0.0..0.03),
        ComparisonModel::XgBoost => base + boost + 0.015 + rng.gen_range(0.0..0.02),
        ComparisonModel::LightGbm => base + boost + 0.01 + rng.gen_range(0.0..0.02),
    }
}

/// 3×3 confusion matrix with a dominant diagonal.
fn demo_confusion<R: Rng>(rng: &mut R) -> Vec<Vec<u64>> {
    (0..3)
        .map(|i: usize| {
            (0..3)
                .map(|j: usize| match i.abs_diff(j) {
                    0 => rng.gen_range(35..=44),
                    1 => rng.gen_range(1..=5),
                    _ => rng.gen_range(0..=2),
                })
                .collect()
        })
        .collect()
}

/// Build a demo result for the given sidebar configuration.
pub fn synthetic_result<R: Rng>(config: &SidebarState, rng: &mut R) -> TrainingResult {
    let base = 0.75 + rng.gen_range(0.0..0.15);
    let boost = bagging_boost(config.ensemble_size.get());

    let mut scores = EnsembleScores::new();
    scores.insert(SINGLE_MODEL.to_string(), score(base));
    scores.insert(BAGGED_MODEL.to_string(), score(base + boost));
    for &model in &config.compare_with {
        let value = comparison_score(model, base, boost, rng);
        scores.insert(model.name().to_string(), score(value));
    }

    TrainingResult {
        ensemble_results: scores,
        confusion_matrix: Some(demo_confusion(rng)),
        probability_data: (0..PROBABILITY_SAMPLES)
            .map(|_| 0.7 + rng.gen_range(0.0..0.3))
            .collect(),
        feature_importance: DEMO_FEATURE_IMPORTANCE.to_vec(),
        training_progress: DEMO_TRAINING_PROGRESS.to_vec(),
        source: ResultSource::Synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ConfusionSummary;
    use crate::sidebar::SidebarAction;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_boost_grows_with_ensemble_and_caps() {
        assert!((bagging_boost(10) - 0.024).abs() < 1e-12);
        assert!((bagging_boost(50) - 0.12).abs() < 1e-12);
        assert!(bagging_boost(1) < bagging_boost(25));
        assert!(bagging_boost(1000) <= MAX_BAGGING_BOOST);
    }

    #[test]
    fn test_always_has_single_and_bagged() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut config = SidebarState::default();
        config.compare_with.clear();
        let result = synthetic_result(&config, &mut rng);
        assert_eq!(result.ensemble_results.len(), 2);
        let single = result.score(SINGLE_MODEL).unwrap();
        let bagged = result.score(BAGGED_MODEL).unwrap();
        assert!((0.75..0.90).contains(&single));
        assert!(bagged > single);
        assert!(result.is_synthetic());
    }

    #[test]
    fn test_selected_comparisons_are_included_in_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut config = SidebarState::default();
        for model in ComparisonModel::ALL {
            config.apply(SidebarAction::ToggleComparison {
                model,
                enabled: true,
            });
        }
        let result = synthetic_result(&config, &mut rng);
        let names: Vec<&str> = result.ensemble_results.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "Single Model",
                "Bagged Model",
                "Random Forest",
                "AdaBoost",
                "Gradient Boosting",
                "Extra Trees",
                "XGBoost",
                "LightGBM"
            ]
        );
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let mut config = SidebarState::default();
        config.apply(SidebarAction::SetEnsembleSize(50));
        for model in ComparisonModel::ALL {
            config.apply(SidebarAction::ToggleComparison {
                model,
                enabled: true,
            });
        }
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = synthetic_result(&config, &mut rng);
            for value in result.ensemble_results.values() {
                let v = value.as_f64().unwrap();
                assert!((0.0..=1.0).contains(&v), "score {v} out of range");
            }
        }
    }

    #[test]
    fn test_fixed_shape_payload() {
        let mut rng = StdRng::seed_from_u64(9);
        let result = synthetic_result(&SidebarState::default(), &mut rng);
        assert_eq!(result.probability_data.len(), 15);
        assert!(result.probability_data.iter().all(|p| (0.7..1.0).contains(p)));
        assert_eq!(result.feature_importance, DEMO_FEATURE_IMPORTANCE.to_vec());
        assert_eq!(result.training_progress, DEMO_TRAINING_PROGRESS.to_vec());

        let summary = ConfusionSummary::from_result(&result).unwrap();
        assert_eq!(summary.classes(), 3);
        assert!(summary.accuracy > 0.8);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = SidebarState::default();
        let a = synthetic_result(&config, &mut StdRng::seed_from_u64(11));
        let b = synthetic_result(&config, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
