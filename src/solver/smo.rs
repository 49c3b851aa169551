//! Sequential Minimal Optimization (SMO) solver for the binary C-SVC dual
//!
//! Solves
//!
//! ```text
//! min_a  0.5 * a^T Q a - e^T a
//! s.t.   0 <= a_i <= C,  y^T a = 0,   Q_ij = y_i y_j K(x_i, x_j)
//! ```
//!
//! by repeatedly optimizing a pair of Lagrange multipliers. The pair is the
//! maximal violating pair, with the second index chosen by second-order
//! (curvature) information. The gradient `G = Q a - e` is kept up to date
//! after every step; kernel rows come from an LRU [`KernelCache`].

use crate::cache::KernelCache;
use crate::core::{Result, SVMError, SvmParams, TermCriteria};
use crate::kernel::{norm_squared, Kernel};
use log::{debug, warn};
use std::sync::Arc;

/// Floor for non-positive curvature (sigmoid kernels, duplicate rows)
const TAU: f64 = 1e-12;

/// Result of a binary optimization
#[derive(Debug, Clone)]
pub struct BinarySolution {
    /// Lagrange multipliers, one per training row
    pub alpha: Vec<f64>,
    /// Bias term b of f(x) = sum_i alpha_i y_i K(x_i, x) + b
    pub bias: f64,
    /// Number of pair updates performed
    pub iterations: usize,
    /// Dual objective value sum(alpha) - 0.5 * alpha^T Q alpha
    pub objective_value: f64,
    /// False when the iteration limit stopped the solver
    pub converged: bool,
}

impl BinarySolution {
    /// Indices of rows with a non-zero multiplier
    pub fn support_vectors(&self) -> Vec<usize> {
        self.alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| if a > 0.0 { Some(i) } else { None })
            .collect()
    }
}

/// SMO solver for the binary C-SVC problem
pub struct SMOSolver<K: Kernel> {
    kernel: K,
    c: f64,
    termination: TermCriteria,
    cache_size: usize,
}

/// Borrowed training problem shared by the solver helpers
struct Problem<'a> {
    rows: &'a [&'a [f32]],
    labels: &'a [f64],
    norms: Vec<f64>,
    diag: Vec<f64>,
}

impl<K: Kernel> SMOSolver<K> {
    /// Create a solver using the cost, termination and cache settings of `params`
    pub fn new(kernel: K, params: &SvmParams) -> Self {
        Self {
            kernel,
            c: params.c,
            termination: params.termination,
            cache_size: params.cache_size,
        }
    }

    /// Solve the dual for `rows` with labels in {-1, +1}
    pub fn solve(&self, rows: &[&[f32]], labels: &[f64]) -> Result<BinarySolution> {
        if rows.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        if rows.len() != labels.len() {
            return Err(SVMError::DimensionMismatch {
                expected: rows.len(),
                actual: labels.len(),
            });
        }
        if let Some(&bad) = labels.iter().find(|&&y| y != 1.0 && y != -1.0) {
            return Err(SVMError::InvalidDataset(format!(
                "binary labels must be +1 or -1, got {bad}"
            )));
        }
        if !labels.contains(&1.0) || !labels.contains(&-1.0) {
            return Err(SVMError::InvalidDataset(
                "binary problem needs samples of both classes".to_string(),
            ));
        }

        let n = rows.len();
        let norms: Vec<f64> = rows.iter().map(|row| norm_squared(row)).collect();
        let diag: Vec<f64> = (0..n)
            .map(|i| {
                self.kernel
                    .compute_with_norms(rows[i], rows[i], norms[i], norms[i])
            })
            .collect();
        let problem = Problem {
            rows,
            labels,
            norms,
            diag,
        };

        let mut cache = KernelCache::with_memory_limit(self.cache_size, n);
        let mut alpha = vec![0.0; n];
        // G = Q a - e with a = 0
        let mut gradient = vec![-1.0; n];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.termination.max_iterations {
            let Some((i, j, row_i)) =
                self.select_working_pair(&problem, &mut cache, &alpha, &gradient)
            else {
                converged = true;
                break;
            };
            let row_j = self.kernel_row(&problem, &mut cache, j);
            self.take_step(&problem, i, j, &row_i, &row_j, &mut alpha, &mut gradient);
            iterations += 1;
        }

        if !converged {
            // The last step may have reached optimality exactly at the limit
            converged = self
                .select_working_pair(&problem, &mut cache, &alpha, &gradient)
                .is_none();
            if !converged {
                warn!(
                    "SMO stopped at the iteration limit ({}) before reaching tolerance {}",
                    self.termination.max_iterations, self.termination.epsilon
                );
            }
        }

        let bias = self.calculate_bias(&problem, &alpha, &gradient);
        let objective_value = alpha
            .iter()
            .zip(gradient.iter())
            .map(|(&a, &g)| a * (1.0 - g) / 2.0)
            .sum();

        debug!(
            "SMO finished after {} iterations on {} samples (cache hit rate {:.1}%)",
            iterations,
            n,
            cache.hit_rate() * 100.0
        );

        Ok(BinarySolution {
            alpha,
            bias,
            iterations,
            objective_value,
            converged,
        })
    }

    /// Kernel row K(x_i, .) through the cache
    fn kernel_row(&self, problem: &Problem<'_>, cache: &mut KernelCache, i: usize) -> Arc<[f64]> {
        cache.row(i, || {
            problem
                .rows
                .iter()
                .zip(problem.norms.iter())
                .map(|(row, &norm)| {
                    self.kernel
                        .compute_with_norms(problem.rows[i], row, problem.norms[i], norm)
                })
                .collect()
        })
    }

    /// Pick the maximal violating pair, or `None` once the KKT gap is below epsilon
    fn select_working_pair(
        &self,
        problem: &Problem<'_>,
        cache: &mut KernelCache,
        alpha: &[f64],
        gradient: &[f64],
    ) -> Option<(usize, usize, Arc<[f64]>)> {
        let labels = problem.labels;

        // First index: largest -y_t G_t among variables that can move up
        let mut g_max = f64::NEG_INFINITY;
        let mut first = None;
        for t in 0..labels.len() {
            let candidate = if labels[t] > 0.0 {
                (alpha[t] < self.c).then(|| -gradient[t])
            } else {
                (alpha[t] > 0.0).then(|| gradient[t])
            };
            if let Some(value) = candidate {
                if value >= g_max {
                    g_max = value;
                    first = Some(t);
                }
            }
        }
        let i = first?;
        let row_i = self.kernel_row(problem, cache, i);

        // Second index: largest objective decrease among variables that can move down
        let mut g_max2 = f64::NEG_INFINITY;
        let mut second = None;
        let mut best_decrease = f64::INFINITY;
        for t in 0..labels.len() {
            let grad_diff = if labels[t] > 0.0 {
                if alpha[t] <= 0.0 {
                    continue;
                }
                g_max2 = g_max2.max(gradient[t]);
                g_max + gradient[t]
            } else {
                if alpha[t] >= self.c {
                    continue;
                }
                g_max2 = g_max2.max(-gradient[t]);
                g_max - gradient[t]
            };

            if grad_diff > 0.0 {
                let curvature = problem.diag[i] + problem.diag[t] - 2.0 * row_i[t];
                let decrease = -(grad_diff * grad_diff) / curvature.max(TAU);
                if decrease <= best_decrease {
                    best_decrease = decrease;
                    second = Some(t);
                }
            }
        }

        if g_max + g_max2 < self.termination.epsilon {
            return None;
        }
        second.map(|j| (i, j, row_i))
    }

    /// Analytically optimize the pair (i, j) and update the gradient
    #[allow(clippy::too_many_arguments)]
    fn take_step(
        &self,
        problem: &Problem<'_>,
        i: usize,
        j: usize,
        row_i: &[f64],
        row_j: &[f64],
        alpha: &mut [f64],
        gradient: &mut [f64],
    ) {
        let c = self.c;
        let y_i = problem.labels[i];
        let y_j = problem.labels[j];
        let alpha_i_old = alpha[i];
        let alpha_j_old = alpha[j];

        let curvature = (problem.diag[i] + problem.diag[j] - 2.0 * row_i[j]).max(TAU);

        if y_i != y_j {
            let delta = (-gradient[i] - gradient[j]) / curvature;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;

            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = -diff;
            }
            if diff > 0.0 {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else if alpha[j] > c {
                alpha[j] = c;
                alpha[i] = c + diff;
            }
        } else {
            let delta = (gradient[i] - gradient[j]) / curvature;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;

            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
            } else if alpha[j] < 0.0 {
                alpha[j] = 0.0;
                alpha[i] = sum;
            }
            if sum > c {
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = sum;
            }
        }

        let delta_i = (alpha[i] - alpha_i_old) * y_i;
        let delta_j = (alpha[j] - alpha_j_old) * y_j;
        for (k, g) in gradient.iter_mut().enumerate() {
            *g += problem.labels[k] * (row_i[k] * delta_i + row_j[k] * delta_j);
        }
    }

    /// Bias from free support vectors, or the middle of the feasible interval
    fn calculate_bias(&self, problem: &Problem<'_>, alpha: &[f64], gradient: &[f64]) -> f64 {
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_sum = 0.0;
        let mut free_count = 0usize;

        for (t, &y) in problem.labels.iter().enumerate() {
            let y_grad = y * gradient[t];
            let at_upper = alpha[t] >= self.c;
            let at_lower = alpha[t] <= 0.0;
            if (at_upper && y < 0.0) || (at_lower && y > 0.0) {
                upper = upper.min(y_grad);
            } else if at_upper || at_lower {
                lower = lower.max(y_grad);
            } else {
                free_sum += y_grad;
                free_count += 1;
            }
        }

        let rho = if free_count > 0 {
            free_sum / free_count as f64
        } else {
            match (upper.is_finite(), lower.is_finite()) {
                (true, true) => (upper + lower) / 2.0,
                (true, false) => upper,
                (false, true) => lower,
                (false, false) => 0.0,
            }
        };
        -rho
    }
}
