//! Plain-text chart rendering for the terminal.

use bagging_core::charts::{
    ConfusionSummary, accuracy_bars, bagging_improvement, best_model, probability_histogram,
};
use bagging_core::density::{density_curve, mode};
use bagging_core::{Dataset, EnsembleScores, TrainingResult};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;
const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    "█".repeat(filled)
}

/// Horizontal accuracy bars, one per model.
pub fn render_bars(scores: &EnsembleScores) -> String {
    let bars = accuracy_bars(scores);
    let label_width = bars.iter().map(|b| b.name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for b in &bars {
        let _ = writeln!(
            out,
            "  {:<label_width$}  {:<BAR_WIDTH$}  {:5.1}%",
            b.name,
            bar(b.value, BAR_WIDTH),
            b.value * 100.0
        );
    }
    out
}

pub fn render_histogram(values: &[f64]) -> String {
    let bins = probability_histogram(values);
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let mut out = String::new();
    for b in &bins {
        let _ = writeln!(
            out,
            "  {}  {:<BAR_WIDTH$}  {}",
            b.range,
            bar(b.count as f64 / max as f64, BAR_WIDTH),
            b.count
        );
    }
    out
}

/// One-line sparkline of the density curve plus its peak.
pub fn render_density(values: &[f64]) -> Option<String> {
    let curve = density_curve(values);
    let peak = mode(&curve)?;
    let max = peak.y.max(f64::MIN_POSITIVE);
    let line: String = curve
        .iter()
        .step_by(2)
        .map(|p| {
            let level = ((p.y / max) * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[level.min(SPARK.len() - 1)]
        })
        .collect();
    Some(format!(
        "  0.0 {line} 1.0\n  peak density {:.2} at p = {:.2}\n",
        peak.y, peak.x
    ))
}

/// Count table with row shares, then totals and per-class recall.
pub fn render_confusion(summary: &ConfusionSummary) -> String {
    const LABEL: usize = 9;
    const CELL: usize = 12;
    let mut out = String::new();
    let _ = write!(out, "  {:>LABEL$}", "true\\pred");
    for j in 0..summary.classes() {
        let _ = write!(out, " {:>CELL$}", j);
    }
    out.push('\n');
    for (i, row) in summary.cells.iter().enumerate() {
        let _ = write!(out, "  {:>LABEL$}", i);
        for cell in row {
            let _ = write!(out, " {:>5} ({:>3}%)", cell.count, cell.percent());
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "  {} of {} correct, accuracy {:.1}%, {} misclassified",
        summary.correct,
        summary.total,
        summary.accuracy * 100.0,
        summary.errors()
    );
    let recall: Vec<String> = summary
        .per_class_recall()
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{i}: {:.1}%", r * 100.0))
        .collect();
    let _ = writeln!(out, "  Recall by class: {}", recall.join(", "));
    out
}

/// Every chart for one training result.
pub fn render_results(result: &TrainingResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Results (source: {})", result.source);
    if result.is_synthetic() {
        let _ = writeln!(out, "  Backend unavailable, showing demo data.");
    }

    let _ = writeln!(out, "\nModel accuracy");
    if result.ensemble_results.is_empty() {
        let _ = writeln!(out, "  (no scores)");
    } else {
        out.push_str(&render_bars(&result.ensemble_results));
    }

    if let Some(gain) = bagging_improvement(&result.ensemble_results) {
        let _ = writeln!(
            out,
            "\nKey insight: bagging changed accuracy by {:+.1} percentage points.",
            gain * 100.0
        );
    }
    if let Some(best) = best_model(&result.ensemble_results) {
        let _ = writeln!(out, "Best model: {} ({:.1}%)", best.name, best.value * 100.0);
    }

    if !result.probability_data.is_empty() {
        let _ = writeln!(out, "\nPrediction confidence");
        out.push_str(&render_histogram(&result.probability_data));
        if let Some(density) = render_density(&result.probability_data) {
            out.push_str(&density);
        }
    }

    if let Some(summary) = ConfusionSummary::from_result(result) {
        let _ = writeln!(out, "\nConfusion matrix");
        out.push_str(&render_confusion(&summary));
    }
    out
}

/// Dataset summary with the first `rows` rows.
pub fn render_dataset(dataset: &Dataset, rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", dataset.name);
    if !dataset.description.is_empty() {
        let _ = writeln!(out, "  {}", dataset.description);
    }
    let _ = writeln!(
        out,
        "  {} samples, {} features",
        dataset.n_samples(),
        dataset.n_features()
    );
    for (label, count) in dataset.class_counts() {
        let _ = writeln!(out, "  {:<12} {}", dataset.class_name(label), count);
    }

    if rows > 0 {
        let _ = writeln!(out, "\n  {} | target", dataset.headers.join(" | "));
        for (features, label) in dataset.preview(rows) {
            let cells: Vec<String> = features.iter().map(|v| format!("{v:.3}")).collect();
            let _ = writeln!(out, "  {} | {}", cells.join(" | "), dataset.class_name(label));
        }
    }
    out
}
