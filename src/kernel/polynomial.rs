//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (γ * <x, y> + r)^d
//!
//! Where:
//! - γ (gamma): scaling factor for the dot product
//! - r (coef0): independent term in the polynomial
//! - d (degree): degree of the polynomial
//!
//! The grid search explores fractional degrees, so `d` is a float. For a
//! negative base and a fractional degree the sign of the base is kept:
//! `sign(b) * |b|^d`.

use crate::kernel::traits::{dot, Kernel};

/// Polynomial kernel with configurable degree, gamma, and coefficient
#[derive(Debug, Clone, Copy)]
pub struct PolynomialKernel {
    pub gamma: f64,
    pub coef0: f64,
    pub degree: f64,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel with the specified parameters
    ///
    /// # Panics
    /// Panics if degree or gamma is not positive
    pub fn new(degree: f64, gamma: f64, coef0: f64) -> Self {
        assert!(degree > 0.0, "Polynomial degree must be positive");
        assert!(gamma > 0.0, "Gamma must be positive");

        Self {
            gamma,
            coef0,
            degree,
        }
    }

    /// Creates a quadratic kernel: (γ * <x,y> + 1)²
    pub fn quadratic(gamma: f64) -> Self {
        Self::new(2.0, gamma, 1.0)
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: &[f32], y: &[f32]) -> f64 {
        let base = self.gamma * dot(x, y) + self.coef0;
        if self.degree.fract() == 0.0 && self.degree <= i32::MAX as f64 {
            base.powi(self.degree as i32)
        } else {
            base.abs().powf(self.degree).copysign(base)
        }
    }
}
