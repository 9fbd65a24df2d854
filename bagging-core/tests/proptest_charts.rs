//! Property-based tests for the chart transforms using proptest.

use proptest::prelude::*;

use bagging_core::charts::{ConfusionSummary, HISTOGRAM_BINS, accuracy_bars, probability_histogram};
use bagging_core::density::{density_curve, trapezoid_area};
use bagging_core::sidebar::{EnsembleSize, SidebarAction, SidebarState};
use serde_json::{Map, Value};

// --- Density properties ---

proptest! {
    #[test]
    fn density_has_fixed_grid(values in prop::collection::vec(0.0f64..=1.0, 1..60)) {
        let curve = density_curve(&values);
        prop_assert_eq!(curve.len(), 101);
        prop_assert!(curve.iter().all(|p| p.y >= 0.0 && p.y.is_finite()));
        prop_assert!((curve[100].x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn density_area_never_exceeds_one(values in prop::collection::vec(0.0f64..=1.0, 1..60)) {
        let area = trapezoid_area(&density_curve(&values));
        prop_assert!(area > 0.0);
        prop_assert!(area <= 1.0 + 1e-3);
    }
}

// --- Histogram properties ---

proptest! {
    #[test]
    fn histogram_counts_every_valid_value(values in prop::collection::vec(0.0f64..=1.0, 0..200)) {
        let bins = probability_histogram(&values);
        prop_assert_eq!(bins.len(), HISTOGRAM_BINS);
        prop_assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
    }
}

// --- Confusion matrix properties ---

fn square_matrix() -> impl Strategy<Value = Vec<Vec<u64>>> {
    (1usize..6).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0u64..500, n), n)
    })
}

proptest! {
    #[test]
    fn confusion_accuracy_is_a_fraction(matrix in square_matrix()) {
        let summary = ConfusionSummary::from_matrix(&matrix).unwrap();
        let total: u64 = matrix.iter().flatten().sum();
        prop_assert_eq!(summary.total, total);
        prop_assert!(summary.correct <= summary.total);
        prop_assert!((0.0..=1.0).contains(&summary.accuracy));
        if total == 0 {
            prop_assert_eq!(summary.accuracy, 0.0);
        }
    }

    #[test]
    fn confusion_rows_share_sums_to_one(matrix in square_matrix()) {
        let summary = ConfusionSummary::from_matrix(&matrix).unwrap();
        for (row, cells) in matrix.iter().zip(&summary.cells) {
            let share: f64 = cells.iter().map(|c| c.row_share).sum();
            if row.iter().sum::<u64>() == 0 {
                prop_assert_eq!(share, 0.0);
            } else {
                prop_assert!((share - 1.0).abs() < 1e-9);
            }
        }
    }
}

// --- Accuracy bars and sidebar clamping ---

proptest! {
    #[test]
    fn accuracy_bars_keep_order_and_length(scores in prop::collection::vec(0.0f64..=1.0, 0..10)) {
        let mut map = Map::new();
        for (i, s) in scores.iter().enumerate() {
            map.insert(format!("Model {i}"), Value::from(*s));
        }
        let bars = accuracy_bars(&map);
        prop_assert_eq!(bars.len(), scores.len());
        for (i, bar) in bars.iter().enumerate() {
            prop_assert_eq!(&bar.name, &format!("Model {i}"));
        }
    }

    #[test]
    fn ensemble_size_always_in_range(n in any::<i64>()) {
        let mut state = SidebarState::default();
        state.apply(SidebarAction::SetEnsembleSize(n));
        let size = state.ensemble_size.get();
        prop_assert!((EnsembleSize::MIN..=EnsembleSize::MAX).contains(&size));
        prop_assert_eq!(EnsembleSize::new(n).is_ok(), (1..=50).contains(&n));
    }
}
