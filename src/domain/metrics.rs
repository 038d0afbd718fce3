// ============================================================
// Layer 3 — Classification Metrics
// ============================================================
// Binary confusion matrix and the four scores reported after
// every validation pass. Label 1 is the positive class; any
// other value counts as negative. Every ratio with a zero
// denominator is reported as 0.

use serde::{Deserialize, Serialize};

use crate::domain::sample::POSITIVE_LABEL;

/// Counts of a 2×2 confusion matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    /// Tally (true, predicted) pairs. Extra entries in the longer
    /// slice are ignored.
    pub fn from_labels(true_labels: &[i32], predicted: &[i32]) -> Self {
        let mut cm = Self::default();
        for (&t, &p) in true_labels.iter().zip(predicted) {
            match (t == POSITIVE_LABEL, p == POSITIVE_LABEL) {
                (true, true)   => cm.tp += 1,
                (true, false)  => cm.fn_ += 1,
                (false, true)  => cm.fp += 1,
                (false, false) => cm.tn += 1,
            }
        }
        cm
    }
}

/// `{precision, recall, f1, fpr}` for one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub fpr:       f64,
}

impl ClassificationMetrics {
    pub fn compute(true_labels: &[i32], predicted: &[i32]) -> Self {
        Self::from_confusion(&ConfusionMatrix::from_labels(true_labels, predicted))
    }

    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let precision = ratio(cm.tp as f64, (cm.tp + cm.fp) as f64);
        let recall    = ratio(cm.tp as f64, (cm.tp + cm.fn_) as f64);
        let f1        = ratio(2.0 * precision * recall, precision + recall);
        let fpr       = ratio(cm.fp as f64, (cm.fp + cm.tn) as f64);
        Self { precision, recall, f1, fpr }
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_reference_confusion() {
        let truth = [1, 1, 1, 1, 1, 0, 0, 0, 0];
        let pred  = [1, 1, 1, 1, 0, 0, 0, 1, 0];

        let cm = ConfusionMatrix::from_labels(&truth, &pred);
        assert_eq!(cm, ConfusionMatrix { tn: 3, fp: 1, fn_: 1, tp: 4 });

        let m = ClassificationMetrics::compute(&truth, &pred);
        assert!(close(m.precision, 0.8));
        assert!(close(m.recall, 0.8));
        assert!(close(m.f1, 0.8));
        assert!(close(m.fpr, 0.25));
    }

    #[test]
    fn test_all_negative_gives_zeros() {
        let m = ClassificationMetrics::compute(&[0, 0, 0], &[0, 0, 0]);
        assert_eq!(m, ClassificationMetrics::default());
    }

    #[test]
    fn test_no_predicted_positives() {
        // tp + fp == 0 → precision 0, f1 0; recall 0 as well
        let m = ClassificationMetrics::compute(&[1, 1, 0], &[0, 0, 0]);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1, 0.0);
        assert_eq!(m.fpr, 0.0);
    }

    #[test]
    fn test_all_false_positives() {
        let m = ClassificationMetrics::compute(&[0, 0], &[1, 1]);
        assert_eq!(m.fpr, 1.0);
        assert_eq!(m.precision, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let cm = ConfusionMatrix::from_labels(&[], &[]);
        assert_eq!(cm, ConfusionMatrix::default());
        assert_eq!(ClassificationMetrics::from_confusion(&cm), ClassificationMetrics::default());
    }
}
