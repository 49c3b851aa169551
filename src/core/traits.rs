//! Core traits: the seams between the loader, the classifier and the harness

use crate::core::{Result, Training, TrainingMode};

/// Dataset abstraction for row access by index
pub trait Dataset: Send + Sync {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Number of features (dimensionality)
    fn dim(&self) -> usize;

    /// Feature row of a single sample
    ///
    /// # Panics
    /// Panics if index >= len()
    fn row(&self, i: usize) -> &[f32];

    /// Class label of a single sample
    ///
    /// # Panics
    /// Panics if index >= len()
    fn label(&self, i: usize) -> f32;

    /// Get all labels as a vector
    fn labels(&self) -> Vec<f32> {
        (0..self.len()).map(|i| self.label(i)).collect()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trained multi-class model
pub trait Model {
    /// Predict the class label of a single feature row
    fn predict(&self, row: &[f32]) -> f32;

    /// Predict every row of a dataset in order
    fn predict_dataset<D: Dataset>(&self, dataset: &D) -> Vec<f32>
    where
        Self: Sized,
    {
        (0..dataset.len())
            .map(|i| self.predict(dataset.row(i)))
            .collect()
    }

    /// Number of training samples kept as support vectors
    fn n_support_vectors(&self) -> usize;
}

/// Something that can fit a [`Model`] to a labelled dataset
pub trait Classifier {
    type Model: Model;

    fn train<D: Dataset>(&self, dataset: &D, mode: &TrainingMode)
        -> Result<Training<Self::Model>>;
}
