//! Linear kernel implementation

use crate::kernel::traits::{dot, Kernel};

/// Linear kernel: K(x, y) = x^T * y
///
/// This is the simplest kernel function, computing the dot product between two rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: &[f32], y: &[f32]) -> f64 {
        dot(x, y)
    }
}
