//! Sigmoid (Tanh) Kernel Implementation
//!
//! K(x, y) = tanh(γ * <x, y> + r)
//!
//! The kernel is bounded to [-1, 1] and is not positive semi-definite for
//! every parameter choice; the solver copes with non-positive curvature.

use crate::kernel::traits::{dot, Kernel};

/// Sigmoid (Hyperbolic Tangent) kernel
#[derive(Debug, Clone, Copy)]
pub struct SigmoidKernel {
    /// Scaling parameter for the dot product (must be positive)
    pub gamma: f64,
    /// Bias/offset parameter
    pub coef0: f64,
}

impl SigmoidKernel {
    /// # Panics
    /// Panics if gamma is not positive
    pub fn new(gamma: f64, coef0: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self { gamma, coef0 }
    }
}

impl Kernel for SigmoidKernel {
    fn compute(&self, x: &[f32], y: &[f32]) -> f64 {
        (self.gamma * dot(x, y) + self.coef0).tanh()
    }
}
