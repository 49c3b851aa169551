//! One-vs-one multi-class SVM
//!
//! A binary machine is trained for every pair of classes. Prediction runs all
//! machines and returns the class with the most votes. Support vectors shared
//! between machines are stored once in a common pool.

use crate::core::{Dataset, FeatureMatrix, Model, Result, SVMError, SvmParams};
use crate::kernel::{Kernel, KernelFunction};
use crate::solver::SMOSolver;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Binary machine separating `classes[positive]` (+1) from `classes[negative]` (-1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseMachine {
    pub positive: usize,
    pub negative: usize,
    /// Indices into the shared support vector pool
    pub support: Vec<usize>,
    /// alpha_i * y_i for each entry of `support`
    pub coefficients: Vec<f64>,
    pub bias: f64,
}

impl PairwiseMachine {
    /// Decision value given the kernel values of a row against the whole pool
    pub fn decision(&self, pool_kernel: &[f64]) -> f64 {
        self.support
            .iter()
            .zip(self.coefficients.iter())
            .map(|(&sv, &coef)| coef * pool_kernel[sv])
            .sum::<f64>()
            + self.bias
    }
}

/// Trained one-vs-one classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticlassSvm {
    params: SvmParams,
    kernel: KernelFunction,
    classes: Vec<f32>,
    support_vectors: FeatureMatrix,
    machines: Vec<PairwiseMachine>,
}

impl MulticlassSvm {
    pub fn params(&self) -> &SvmParams {
        &self.params
    }

    pub fn kernel(&self) -> &KernelFunction {
        &self.kernel
    }

    /// Distinct class labels in ascending order
    pub fn classes(&self) -> &[f32] {
        &self.classes
    }

    pub fn support_vectors(&self) -> &FeatureMatrix {
        &self.support_vectors
    }

    pub fn machines(&self) -> &[PairwiseMachine] {
        &self.machines
    }

    /// Decision value of every pairwise machine, in training order
    pub fn decision_values(&self, row: &[f32]) -> Vec<f64> {
        let pool_kernel = self.pool_kernel(row);
        self.machines
            .iter()
            .map(|machine| machine.decision(&pool_kernel))
            .collect()
    }

    /// Votes per class; a machine votes for its positive class when the decision is > 0
    pub fn votes(&self, row: &[f32]) -> Vec<usize> {
        let mut votes = vec![0; self.classes.len()];
        for (machine, decision) in self.machines.iter().zip(self.decision_values(row)) {
            if decision > 0.0 {
                votes[machine.positive] += 1;
            } else {
                votes[machine.negative] += 1;
            }
        }
        votes
    }

    /// Structural checks for models that did not come from [`OneVsOneTrainer`]
    pub fn validate(&self) -> Result<()> {
        let expected = KernelFunction::from_params(&self.params)?;
        if expected != self.kernel {
            return Err(SVMError::InvalidParameter(format!(
                "stored kernel {:?} does not match the parameters, expected {:?}",
                self.kernel, expected
            )));
        }
        let k = self.classes.len();
        if k < 2 {
            return Err(SVMError::InvalidDataset(format!(
                "model needs at least two classes, has {k}"
            )));
        }
        if self.machines.len() != k * (k - 1) / 2 {
            return Err(SVMError::InvalidDataset(format!(
                "{} classes need {} pairwise machines, found {}",
                k,
                k * (k - 1) / 2,
                self.machines.len()
            )));
        }
        let pool = self.support_vectors.n_rows();
        for machine in &self.machines {
            if machine.positive >= k || machine.negative >= k {
                return Err(SVMError::InvalidDataset(
                    "pairwise machine refers to an unknown class".to_string(),
                ));
            }
            if machine.support.len() != machine.coefficients.len() {
                return Err(SVMError::DimensionMismatch {
                    expected: machine.support.len(),
                    actual: machine.coefficients.len(),
                });
            }
            if machine.support.iter().any(|&sv| sv >= pool) {
                return Err(SVMError::InvalidDataset(
                    "pairwise machine refers to a missing support vector".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn pool_kernel(&self, row: &[f32]) -> Vec<f64> {
        self.support_vectors
            .rows()
            .map(|sv| self.kernel.compute(sv, row))
            .collect()
    }
}

impl Model for MulticlassSvm {
    fn predict(&self, row: &[f32]) -> f32 {
        let votes = self.votes(row);
        // Ties go to the smaller class label
        let mut best = 0;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = class;
            }
        }
        self.classes[best]
    }

    fn n_support_vectors(&self) -> usize {
        self.support_vectors.n_rows()
    }
}

/// Trains a [`MulticlassSvm`] with fixed parameters
#[derive(Debug, Clone)]
pub struct OneVsOneTrainer {
    params: SvmParams,
}

impl OneVsOneTrainer {
    pub fn new(params: SvmParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SvmParams {
        &self.params
    }

    /// Fit one binary machine per class pair
    pub fn fit<D: Dataset>(&self, dataset: &D) -> Result<MulticlassSvm> {
        if dataset.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        let kernel = KernelFunction::from_params(&self.params)?;

        let mut classes = dataset.labels();
        classes.sort_by(|a, b| a.total_cmp(b));
        classes.dedup();
        if classes.len() < 2 {
            return Err(SVMError::InvalidDataset(format!(
                "training needs at least two classes, found {}",
                classes.len()
            )));
        }

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); classes.len()];
        for i in 0..dataset.len() {
            let label = dataset.label(i);
            if let Ok(class) = classes.binary_search_by(|c| c.total_cmp(&label)) {
                members[class].push(i);
            }
        }

        let solver = SMOSolver::new(kernel, &self.params);
        let mut pool = FeatureMatrix::new(dataset.dim());
        let mut pool_index: HashMap<usize, usize> = HashMap::new();
        let mut machines = Vec::with_capacity(classes.len() * (classes.len() - 1) / 2);

        for positive in 0..classes.len() {
            for negative in positive + 1..classes.len() {
                let indices: Vec<usize> = members[positive]
                    .iter()
                    .chain(members[negative].iter())
                    .copied()
                    .collect();
                let rows: Vec<&[f32]> = indices.iter().map(|&i| dataset.row(i)).collect();
                let labels: Vec<f64> = members[positive]
                    .iter()
                    .map(|_| 1.0)
                    .chain(members[negative].iter().map(|_| -1.0))
                    .collect();

                let solution = solver.solve(&rows, &labels)?;

                let mut support = Vec::new();
                let mut coefficients = Vec::new();
                for local in solution.support_vectors() {
                    let global = indices[local];
                    let sv = match pool_index.get(&global) {
                        Some(&sv) => sv,
                        None => {
                            pool.push_row(dataset.row(global))?;
                            pool_index.insert(global, pool.n_rows() - 1);
                            pool.n_rows() - 1
                        }
                    };
                    support.push(sv);
                    coefficients.push(solution.alpha[local] * labels[local]);
                }

                debug!(
                    "Machine {} vs {}: {} support vectors, {} iterations, objective {:.6}",
                    classes[positive],
                    classes[negative],
                    support.len(),
                    solution.iterations,
                    solution.objective_value
                );

                machines.push(PairwiseMachine {
                    positive,
                    negative,
                    support,
                    coefficients,
                    bias: solution.bias,
                });
            }
        }

        info!(
            "Trained {} pairwise machines over {} classes with {} support vectors",
            machines.len(),
            classes.len(),
            pool.n_rows()
        );

        Ok(MulticlassSvm {
            params: self.params,
            kernel,
            classes,
            support_vectors: pool,
            machines,
        })
    }
}
