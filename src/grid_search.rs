//! Cross-validated grid search over SVM hyperparameters
//!
//! Every combination of the grids relevant to the kernel is scored by k-fold
//! cross-validation on a seeded shuffle of the data. The combination with the
//! fewest misclassified held-out samples wins; ties keep the earlier one.

use crate::core::{
    Dataset, KernelType, Model, ParamGrids, Result, SVMError, SearchSummary, SvmParams,
};
use crate::data::DatasetView;
use crate::evaluation::labels_match;
use crate::multiclass::OneVsOneTrainer;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// k-fold grid search configuration
#[derive(Debug, Clone)]
pub struct GridSearch {
    folds: usize,
    grids: ParamGrids,
    seed: u64,
}

impl GridSearch {
    pub fn new(folds: usize, grids: ParamGrids, seed: u64) -> Self {
        Self { folds, grids, seed }
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    pub fn grids(&self) -> &ParamGrids {
        &self.grids
    }

    /// All parameter combinations to evaluate, C outermost and degree innermost
    ///
    /// Parameters the kernel does not use keep their value from `base`.
    pub fn candidates(&self, base: &SvmParams) -> Vec<SvmParams> {
        let kernel = base.kernel;
        let gammas = if kernel == KernelType::Linear {
            vec![base.gamma]
        } else {
            self.grids.gamma.values(base.gamma)
        };
        let coef0s = if matches!(kernel, KernelType::Polynomial | KernelType::Sigmoid) {
            self.grids.coef0.values(base.coef0)
        } else {
            vec![base.coef0]
        };
        let degrees = if kernel == KernelType::Polynomial {
            self.grids.degree.values(base.degree)
        } else {
            vec![base.degree]
        };

        let mut candidates = Vec::new();
        for &c in &self.grids.c.values(base.c) {
            for &gamma in &gammas {
                for &coef0 in &coef0s {
                    for &degree in &degrees {
                        candidates.push(SvmParams {
                            c,
                            gamma,
                            coef0,
                            degree,
                            ..*base
                        });
                    }
                }
            }
        }
        candidates
    }

    /// Shuffle `0..n` with the configured seed and cut it into contiguous folds
    pub fn fold_indices(&self, n: usize) -> Vec<Vec<usize>> {
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        order.shuffle(&mut rng);

        (0..self.folds)
            .map(|fold| {
                let start = fold * n / self.folds;
                let end = (fold + 1) * n / self.folds;
                order[start..end].to_vec()
            })
            .collect()
    }

    /// Find the best parameters for `dataset`
    pub fn search<D: Dataset>(
        &self,
        dataset: &D,
        base: &SvmParams,
    ) -> Result<(SvmParams, SearchSummary)> {
        let n = dataset.len();
        if n == 0 {
            return Err(SVMError::EmptyDataset);
        }
        if self.folds < 2 {
            return Err(SVMError::InvalidParameter(format!(
                "cross-validation needs at least 2 folds, got {}",
                self.folds
            )));
        }
        if self.folds > n {
            return Err(SVMError::InvalidParameter(format!(
                "cannot split {} samples into {} folds",
                n, self.folds
            )));
        }
        self.grids.validate()?;

        let folds = self.fold_indices(n);
        let candidates = self.candidates(base);
        info!(
            "Grid search over {} parameter combinations with {}-fold cross-validation",
            candidates.len(),
            self.folds
        );

        let mut best: Option<(SvmParams, usize)> = None;
        for params in &candidates {
            let errors = self.cross_validate(dataset, &folds, params)?;
            debug!(
                "C={} gamma={} coef0={} degree={}: {} of {} misclassified",
                params.c, params.gamma, params.coef0, params.degree, errors, n
            );
            if best.map_or(true, |(_, best_errors)| errors < best_errors) {
                best = Some((*params, errors));
            }
        }

        let (params, errors) = best.ok_or_else(|| {
            SVMError::InvalidParameter("grid search has no candidates".to_string())
        })?;
        let summary = SearchSummary {
            evaluated: candidates.len(),
            folds: self.folds,
            best_error_rate: errors as f64 / n as f64,
        };
        info!(
            "Best parameters: C={} gamma={} coef0={} degree={} (cross-validation error {:.2}%)",
            params.c,
            params.gamma,
            params.coef0,
            params.degree,
            summary.best_error_rate * 100.0
        );
        Ok((params, summary))
    }

    /// Total number of held-out samples misclassified across all folds
    fn cross_validate<D: Dataset>(
        &self,
        dataset: &D,
        folds: &[Vec<usize>],
        params: &SvmParams,
    ) -> Result<usize> {
        let trainer = OneVsOneTrainer::new(*params);
        let mut errors = 0;

        for (held_out, test_indices) in folds.iter().enumerate() {
            let train_indices: Vec<usize> = folds
                .iter()
                .enumerate()
                .filter(|&(fold, _)| fold != held_out)
                .flat_map(|(_, indices)| indices.iter().copied())
                .collect();

            let train = DatasetView::new(dataset, train_indices);
            let test = DatasetView::new(dataset, test_indices.clone());
            let model = trainer.fit(&train)?;

            errors += model
                .predict_dataset(&test)
                .iter()
                .zip(test.labels())
                .filter(|&(&predicted, actual)| !labels_match(predicted, actual))
                .count();
        }
        Ok(errors)
    }
}
