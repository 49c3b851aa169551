//! Evaluation of a trained model on a labelled testing set

use crate::core::{Dataset, Model, Result, SVMError};
use serde::{Deserialize, Serialize};

/// Two labels name the same class when they differ by less than `f32::EPSILON`
pub fn labels_match(predicted: f32, actual: f32) -> bool {
    (predicted - actual).abs() < f32::EPSILON
}

/// Letter for class label `1..=26` (`A..=Z`), `?` otherwise
pub fn class_symbol(label: usize) -> char {
    match label {
        1..=26 => (b'A' + (label - 1) as u8) as char,
        _ => '?',
    }
}

/// Counts of correct and incorrect predictions on a testing set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationTally {
    pub correct: usize,
    pub incorrect: usize,
    /// Misclassified samples per true class; entry `c` is class label `c + 1`
    pub false_positives: Vec<usize>,
}

impl EvaluationTally {
    pub fn new(n_classes: usize) -> Self {
        Self {
            correct: 0,
            incorrect: 0,
            false_positives: vec![0; n_classes],
        }
    }

    /// Record one prediction against its true label
    pub fn record(&mut self, predicted: f32, actual: f32) -> Result<()> {
        if labels_match(predicted, actual) {
            self.correct += 1;
            return Ok(());
        }
        let n_classes = self.false_positives.len();
        let index = actual.round() as i64 - 1;
        if index < 0 || index as usize >= n_classes {
            return Err(SVMError::InvalidLabel {
                sample: self.total(),
                label: actual,
                n_classes,
            });
        }
        self.incorrect += 1;
        self.false_positives[index as usize] += 1;
        Ok(())
    }

    /// Number of samples evaluated
    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    pub fn correct_percent(&self) -> f64 {
        self.percent_of_total(self.correct)
    }

    pub fn incorrect_percent(&self) -> f64 {
        self.percent_of_total(self.incorrect)
    }

    /// False positives of class index `class` as a percentage of all samples
    pub fn false_positive_percent(&self, class: usize) -> f64 {
        self.percent_of_total(self.false_positives.get(class).copied().unwrap_or(0))
    }

    fn percent_of_total(&self, count: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / total as f64
        }
    }
}

/// Tally precomputed predictions against the true labels
pub fn tally_predictions(
    predictions: &[f32],
    labels: &[f32],
    n_classes: usize,
) -> Result<EvaluationTally> {
    if predictions.len() != labels.len() {
        return Err(SVMError::DimensionMismatch {
            expected: labels.len(),
            actual: predictions.len(),
        });
    }
    let mut tally = EvaluationTally::new(n_classes);
    for (&predicted, &actual) in predictions.iter().zip(labels.iter()) {
        tally.record(predicted, actual)?;
    }
    Ok(tally)
}

/// Predict every row of `testing` with `model` and tally the outcome
pub fn evaluate<M: Model, D: Dataset>(
    model: &M,
    testing: &D,
    n_classes: usize,
) -> Result<EvaluationTally> {
    let predictions = model.predict_dataset(testing);
    tally_predictions(&predictions, &testing.labels(), n_classes)
}
