//! Core type definitions: dense feature storage and SVM training parameters

use crate::core::{Result, SVMError};
use serde::{Deserialize, Serialize};

/// Dense row-major matrix of `f32` features, one row per sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl FeatureMatrix {
    /// Create an empty matrix with a fixed column count
    pub fn new(cols: usize) -> Self {
        Self {
            rows: 0,
            cols,
            data: Vec::new(),
        }
    }

    /// Create an empty matrix with room for `rows` rows
    pub fn with_capacity(rows: usize, cols: usize) -> Self {
        Self {
            rows: 0,
            cols,
            data: Vec::with_capacity(rows * cols),
        }
    }

    /// Create a zero-filled matrix of the given shape
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from equally sized rows
    pub fn from_rows<R: AsRef<[f32]>>(cols: usize, rows: &[R]) -> Result<Self> {
        let mut matrix = Self::with_capacity(rows.len(), cols);
        for row in rows {
            matrix.push_row(row.as_ref())?;
        }
        Ok(matrix)
    }

    /// Append a row, which must have exactly `n_cols()` values
    pub fn push_row(&mut self, row: &[f32]) -> Result<()> {
        if row.len() != self.cols {
            return Err(SVMError::DimensionMismatch {
                expected: self.cols,
                actual: row.len(),
            });
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i`
    ///
    /// # Panics
    /// Panics if `i >= n_rows()`
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.cols + col] = value;
    }

    /// Iterate over rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on a zero chunk size
        let cols = self.cols.max(1);
        let rows = self.rows;
        self.data.chunks_exact(cols).take(rows)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Class labels aligned by index with a [`FeatureMatrix`]
///
/// Labels are integers stored as `f32`, the same encoding the classifier
/// returns from `predict`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelVector {
    values: Vec<f32>,
}

impl LabelVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, label: f32) {
        self.values.push(label);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize) -> f32 {
        self.values[i]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().copied()
    }
}

/// SVM kernel type (the four classic C-SVC kernels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelType {
    Linear,
    Polynomial,
    Rbf,
    Sigmoid,
}

/// Termination criteria for the binary solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermCriteria {
    /// Maximum number of working-pair updates
    pub max_iterations: usize,
    /// Tolerance on the KKT optimality gap
    pub epsilon: f64,
}

impl Default for TermCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            epsilon: 1e-6,
        }
    }
}

/// C-SVC training parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvmParams {
    pub kernel: KernelType,
    /// Polynomial degree (polynomial kernel only)
    pub degree: f64,
    /// Kernel coefficient (polynomial, RBF and sigmoid kernels)
    pub gamma: f64,
    /// Independent term (polynomial and sigmoid kernels)
    pub coef0: f64,
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    pub termination: TermCriteria,
    /// Kernel row cache size in bytes
    pub cache_size: usize,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            kernel: KernelType::Linear,
            degree: 0.0,
            gamma: 0.0,
            coef0: 0.0,
            c: 10.0,
            termination: TermCriteria::default(),
            cache_size: 100 * 1024 * 1024,
        }
    }
}

impl SvmParams {
    /// Check the parameters against what the chosen kernel needs
    pub fn validate(&self) -> Result<()> {
        if !(self.c > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "C must be positive, got: {}",
                self.c
            )));
        }
        if !(self.termination.epsilon > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "epsilon must be positive, got: {}",
                self.termination.epsilon
            )));
        }
        if self.termination.max_iterations == 0 {
            return Err(SVMError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.kernel != KernelType::Linear && !(self.gamma > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "gamma must be positive for the {:?} kernel, got: {}",
                self.kernel, self.gamma
            )));
        }
        if self.kernel == KernelType::Polynomial && !(self.degree > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "degree must be positive for the polynomial kernel, got: {}",
                self.degree
            )));
        }
        Ok(())
    }
}

/// Logarithmic parameter grid: `min_val, min_val * log_step, ...` while below `max_val`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub min_val: f64,
    pub max_val: f64,
    pub log_step: f64,
}

impl ParamGrid {
    pub fn new(min_val: f64, max_val: f64, log_step: f64) -> Self {
        Self {
            min_val,
            max_val,
            log_step,
        }
    }

    /// Grid holding a single value
    pub fn fixed(value: f64) -> Self {
        Self::new(value, value, 0.0)
    }

    /// A grid with `log_step <= 1` does not search anything
    pub fn is_search(&self) -> bool {
        self.log_step > 1.0
    }

    /// Enumerate the grid; `base` is returned alone when the grid does not search
    pub fn values(&self, base: f64) -> Vec<f64> {
        if !self.is_search() {
            return vec![base];
        }
        let mut values = vec![self.min_val];
        let mut value = self.min_val * self.log_step;
        while value < self.max_val {
            values.push(value);
            value *= self.log_step;
        }
        values
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.is_search() && !(self.min_val > 0.0 && self.min_val <= self.max_val) {
            return Err(SVMError::InvalidParameter(format!(
                "{name} grid needs 0 < min_val <= max_val, got [{}, {}]",
                self.min_val, self.max_val
            )));
        }
        Ok(())
    }
}

/// Search grids for the automatic training mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamGrids {
    pub c: ParamGrid,
    pub gamma: ParamGrid,
    pub coef0: ParamGrid,
    pub degree: ParamGrid,
}

impl Default for ParamGrids {
    fn default() -> Self {
        Self {
            c: ParamGrid::new(0.1, 500.0, 5.0),
            gamma: ParamGrid::new(1e-5, 0.6, 15.0),
            coef0: ParamGrid::new(0.1, 300.0, 14.0),
            degree: ParamGrid::new(0.01, 4.0, 7.0),
        }
    }
}

impl ParamGrids {
    pub fn validate(&self) -> Result<()> {
        self.c.validate("C")?;
        self.gamma.validate("gamma")?;
        self.coef0.validate("coef0")?;
        self.degree.validate("degree")
    }
}

/// How the classifier chooses its hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TrainingMode {
    /// Train once with the given parameters
    Manual { params: SvmParams },
    /// k-fold cross-validated grid search, then a final fit with the best point
    AutoGridSearch {
        #[serde(default)]
        params: SvmParams,
        #[serde(default = "default_folds")]
        folds: usize,
        #[serde(default)]
        grids: ParamGrids,
        #[serde(default)]
        seed: u64,
    },
}

fn default_folds() -> usize {
    10
}

impl Default for TrainingMode {
    fn default() -> Self {
        Self::AutoGridSearch {
            params: SvmParams::default(),
            folds: default_folds(),
            grids: ParamGrids::default(),
            seed: 0,
        }
    }
}

impl TrainingMode {
    /// The base parameters of either mode
    pub fn params(&self) -> &SvmParams {
        match self {
            Self::Manual { params } | Self::AutoGridSearch { params, .. } => params,
        }
    }

    pub fn params_mut(&mut self) -> &mut SvmParams {
        match self {
            Self::Manual { params } | Self::AutoGridSearch { params, .. } => params,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::AutoGridSearch { .. })
    }
}

/// Outcome of a grid search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Number of parameter combinations cross-validated
    pub evaluated: usize,
    /// Number of folds used
    pub folds: usize,
    /// Cross-validation error rate of the chosen combination
    pub best_error_rate: f64,
}

/// A trained model together with the parameters it was trained with
#[derive(Debug, Clone)]
pub struct Training<M> {
    pub model: M,
    pub params: SvmParams,
    pub search: Option<SearchSummary>,
}
