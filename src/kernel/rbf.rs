//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.

use crate::kernel::traits::{dot, squared_distance, Kernel};

/// RBF (Radial Basis Function) kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// The gamma parameter controls the "reach" of each training example:
/// - High gamma: close points have high influence (potential overfitting)
/// - Low gamma: distant points have influence (potential underfitting)
///
/// In automatic training mode gamma is picked from a logarithmic grid.
#[derive(Debug, Clone, Copy)]
pub struct RBFKernel {
    gamma: f64,
}

impl RBFKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Panics
    /// Panics if gamma is not positive
    pub fn new(gamma: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self { gamma }
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Kernel for RBFKernel {
    fn compute(&self, x: &[f32], y: &[f32]) -> f64 {
        (-self.gamma * squared_distance(x, y)).exp()
    }

    fn compute_with_norms(&self, x: &[f32], y: &[f32], x_norm_sq: f64, y_norm_sq: f64) -> f64 {
        // ||x - y||² = ||x||² + ||y||² - 2*x^T*y, clamped against rounding
        let squared_distance = (x_norm_sq + y_norm_sq - 2.0 * dot(x, y)).max(0.0);
        (-self.gamma * squared_distance).exp()
    }
}
