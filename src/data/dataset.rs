//! In-memory labelled datasets and index views over them

use crate::core::{Dataset, FeatureMatrix, LabelVector, Result, SVMError};
use serde::{Deserialize, Serialize};

/// Feature matrix plus aligned label vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledDataset {
    features: FeatureMatrix,
    labels: LabelVector,
}

impl LabeledDataset {
    /// Pair a feature matrix with its labels; both must have the same length
    pub fn new(features: FeatureMatrix, labels: LabelVector) -> Result<Self> {
        if features.n_rows() != labels.len() {
            return Err(SVMError::DimensionMismatch {
                expected: features.n_rows(),
                actual: labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Empty dataset with `attributes` columns
    pub fn empty(attributes: usize) -> Self {
        Self {
            features: FeatureMatrix::new(attributes),
            labels: LabelVector::default(),
        }
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn label_vector(&self) -> &LabelVector {
        &self.labels
    }

    /// Number of samples per class label `1..=n_classes`
    ///
    /// Labels outside that range are not counted.
    pub fn class_counts(&self, n_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; n_classes];
        for label in self.labels.iter() {
            let index = label as i64 - 1;
            if index >= 0 && (index as usize) < n_classes {
                counts[index as usize] += 1;
            }
        }
        counts
    }
}

impl Dataset for LabeledDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn dim(&self) -> usize {
        self.features.n_cols()
    }

    fn row(&self, i: usize) -> &[f32] {
        self.features.row(i)
    }

    fn label(&self, i: usize) -> f32 {
        self.labels.get(i)
    }
}

/// A subset of another dataset, addressed through an index list
#[derive(Debug, Clone)]
pub struct DatasetView<'a, D: Dataset> {
    parent: &'a D,
    indices: Vec<usize>,
}

impl<'a, D: Dataset> DatasetView<'a, D> {
    /// # Panics
    /// Panics if any index is out of range for `parent`
    pub fn new(parent: &'a D, indices: Vec<usize>) -> Self {
        assert!(
            indices.iter().all(|&i| i < parent.len()),
            "View index out of range"
        );
        Self { parent, indices }
    }

    /// Indices into the parent dataset
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl<D: Dataset> Dataset for DatasetView<'_, D> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn dim(&self) -> usize {
        self.parent.dim()
    }

    fn row(&self, i: usize) -> &[f32] {
        self.parent.row(self.indices[i])
    }

    fn label(&self, i: usize) -> f32 {
        self.parent.label(self.indices[i])
    }
}
