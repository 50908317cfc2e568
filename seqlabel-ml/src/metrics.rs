//! Label-sequence evaluation metrics.
//!
//! Compares a predicted label sequence against the actual one for a single
//! target class: confusion counts, precision, recall and F-score.

use std::collections::BTreeMap;

use seqlabel_core::{Result, SeqLabelError};

/// One-vs-rest confusion counts for a target class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Actual and predicted are both the class.
    pub true_positives: usize,
    /// Neither actual nor predicted is the class.
    pub true_negatives: usize,
    /// Predicted as the class but actually something else.
    pub false_positives: usize,
    /// Actually the class but predicted as something else.
    pub false_negatives: usize,
}

impl Evaluation {
    /// Total number of positions compared.
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Precision: `TP / (TP + FP)`.
    ///
    /// # Errors
    ///
    /// Returns [`SeqLabelError::DegenerateMetric`] if `TP + FP == 0`.
    pub fn precision(&self) -> Result<f64> {
        let predicted = self.true_positives + self.false_positives;
        ratio("precision", self.true_positives, predicted)
    }

    /// Recall: `TP / (TP + FN)`.
    ///
    /// # Errors
    ///
    /// Returns [`SeqLabelError::DegenerateMetric`] if `TP + FN == 0`.
    pub fn recall(&self) -> Result<f64> {
        let actual = self.true_positives + self.false_negatives;
        ratio("recall", self.true_positives, actual)
    }

    /// F-score: harmonic mean of precision and recall.
    ///
    /// # Errors
    ///
    /// Returns [`SeqLabelError::DegenerateMetric`] if precision or recall is
    /// undefined, or if both are 0.
    pub fn f_score(&self) -> Result<f64> {
        let p = self.precision()?;
        let r = self.recall()?;
        if p + r == 0.0 {
            return Err(SeqLabelError::DegenerateMetric { metric: "F-score" });
        }
        Ok(2.0 * p * r / (p + r))
    }

    /// Metric name → value: `"F-score"`, `"TP"`, `"TN"`, `"FP"`, `"FN"`.
    pub fn metrics(&self) -> Result<BTreeMap<&'static str, f64>> {
        Ok(BTreeMap::from([
            ("F-score", self.f_score()?),
            ("TP", self.true_positives as f64),
            ("TN", self.true_negatives as f64),
            ("FP", self.false_positives as f64),
            ("FN", self.false_negatives as f64),
        ]))
    }
}

fn ratio(metric: &'static str, numer: usize, denom: usize) -> Result<f64> {
    if denom == 0 {
        return Err(SeqLabelError::DegenerateMetric { metric });
    }
    Ok(numer as f64 / denom as f64)
}

/// Confusion counts of `class_label` in `predicted` against `actual`.
///
/// # Errors
///
/// Returns [`SeqLabelError::LengthMismatch`] if the sequences differ in length.
pub fn evaluate<P, A>(predicted: &[P], actual: &[A], class_label: &str) -> Result<Evaluation>
where
    P: AsRef<str>,
    A: AsRef<str>,
{
    if predicted.len() != actual.len() {
        return Err(SeqLabelError::LengthMismatch {
            predicted: predicted.len(),
            actual: actual.len(),
        });
    }

    let mut eval = Evaluation::default();
    for (p, a) in predicted.iter().zip(actual) {
        let p = p.as_ref() == class_label;
        let a = a.as_ref() == class_label;
        match (a, p) {
            (true, true) => eval.true_positives += 1,
            (false, false) => eval.true_negatives += 1,
            (false, true) => eval.false_positives += 1,
            (true, false) => eval.false_negatives += 1,
        }
    }
    Ok(eval)
}
