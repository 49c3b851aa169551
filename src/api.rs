//! High-level API for training and evaluating the multi-class SVM
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use speechsvm::api::SVM;
//! use speechsvm::core::KernelType;
//! use speechsvm::data::{CsvLayout, CsvLoader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = CsvLoader::new(CsvLayout::new(617, 26));
//! let training = loader.load_file("isolet1234.data")?;
//! let testing = loader.load_file("isolet5.data")?;
//!
//! let trained = SVM::manual()
//!     .with_kernel(KernelType::Rbf)
//!     .with_gamma(0.001)
//!     .with_c(10.0)
//!     .train(&training)?;
//!
//! let tally = speechsvm::evaluation::evaluate(&trained.model, &testing, 26)?;
//! println!("Correct: {:.2}%", tally.correct_percent());
//! # Ok(())
//! # }
//! ```

use crate::core::{
    Classifier, Dataset, KernelType, ParamGrids, Result, Training, TrainingMode,
};
use crate::grid_search::GridSearch;
use crate::multiclass::{MulticlassSvm, OneVsOneTrainer};
use log::info;

/// One-vs-one SVM classifier; the training mode picks manual or grid-searched parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct SvmClassifier;

impl Classifier for SvmClassifier {
    type Model = MulticlassSvm;

    fn train<D: Dataset>(&self, dataset: &D, mode: &TrainingMode) -> Result<Training<MulticlassSvm>> {
        match mode {
            TrainingMode::Manual { params } => {
                info!(
                    "Training {:?} SVM on {} samples with C={}",
                    params.kernel,
                    dataset.len(),
                    params.c
                );
                let model = OneVsOneTrainer::new(*params).fit(dataset)?;
                Ok(Training {
                    model,
                    params: *params,
                    search: None,
                })
            }
            TrainingMode::AutoGridSearch {
                params,
                folds,
                grids,
                seed,
            } => {
                info!(
                    "Training {:?} SVM on {} samples with grid search (may take some time)",
                    params.kernel,
                    dataset.len()
                );
                let (best, summary) =
                    GridSearch::new(*folds, *grids, *seed).search(dataset, params)?;
                let model = OneVsOneTrainer::new(best).fit(dataset)?;
                Ok(Training {
                    model,
                    params: best,
                    search: Some(summary),
                })
            }
        }
    }
}

/// Builder over a [`TrainingMode`]
#[derive(Debug, Clone)]
pub struct SVM {
    mode: TrainingMode,
}

impl SVM {
    /// Automatic mode with default grids, 10 folds and seed 0
    pub fn new() -> Self {
        Self {
            mode: TrainingMode::default(),
        }
    }

    /// Manual mode with default parameters
    pub fn manual() -> Self {
        Self {
            mode: TrainingMode::Manual {
                params: Default::default(),
            },
        }
    }

    pub fn with_kernel(mut self, kernel: KernelType) -> Self {
        self.mode.params_mut().kernel = kernel;
        self
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.mode.params_mut().c = c;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.mode.params_mut().gamma = gamma;
        self
    }

    pub fn with_degree(mut self, degree: f64) -> Self {
        self.mode.params_mut().degree = degree;
        self
    }

    pub fn with_coef0(mut self, coef0: f64) -> Self {
        self.mode.params_mut().coef0 = coef0;
        self
    }

    /// Set convergence tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.mode.params_mut().termination.epsilon = epsilon;
        self
    }

    /// Set maximum number of iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.mode.params_mut().termination.max_iterations = max_iterations;
        self
    }

    /// Set kernel cache size in bytes
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.mode.params_mut().cache_size = cache_size;
        self
    }

    /// Switch to grid search with `folds` folds, keeping the current parameters as base
    pub fn with_grid_search(mut self, folds: usize, grids: ParamGrids, seed: u64) -> Self {
        self.mode = TrainingMode::AutoGridSearch {
            params: *self.mode.params(),
            folds,
            grids,
            seed,
        };
        self
    }

    pub fn mode(&self) -> &TrainingMode {
        &self.mode
    }

    /// Train on a dataset
    pub fn train<D: Dataset>(&self, dataset: &D) -> Result<Training<MulticlassSvm>> {
        SvmClassifier.train(dataset, &self.mode)
    }
}

impl Default for SVM {
    fn default() -> Self {
        Self::new()
    }
}
