//! Kernel trait definition and dense vector helpers

/// Kernel function trait
///
/// A kernel function K(x, y) compares two dense feature rows of equal length.
/// Values are accumulated in `f64` even though features are stored as `f32`.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &[f32], y: &[f32]) -> f64;

    /// Optional: compute kernel value using precomputed squared norms
    /// This can be more efficient for some kernels (e.g., RBF)
    fn compute_with_norms(&self, x: &[f32], y: &[f32], x_norm_sq: f64, y_norm_sq: f64) -> f64 {
        let _ = (x_norm_sq, y_norm_sq);
        self.compute(x, y)
    }
}

/// Dot product of two dense rows
pub fn dot(x: &[f32], y: &[f32]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "Rows must have the same length");
    x.iter()
        .zip(y.iter())
        .map(|(&a, &b)| a as f64 * b as f64)
        .sum()
}

/// Squared L2 norm of a dense row
pub fn norm_squared(x: &[f32]) -> f64 {
    x.iter().map(|&v| v as f64 * v as f64).sum()
}

/// Squared Euclidean distance between two dense rows
pub fn squared_distance(x: &[f32], y: &[f32]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "Rows must have the same length");
    x.iter()
        .zip(y.iter())
        .map(|(&a, &b)| {
            let diff = a as f64 - b as f64;
            diff * diff
        })
        .sum()
}
