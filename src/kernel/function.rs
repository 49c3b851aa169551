//! Runtime-selected kernel built from [`SvmParams`]

use crate::core::{KernelType, Result, SvmParams};
use crate::kernel::{Kernel, LinearKernel, PolynomialKernel, RBFKernel, SigmoidKernel};
use serde::{Deserialize, Serialize};

/// Kernel chosen at run time from the training parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KernelFunction {
    Linear,
    Polynomial { degree: f64, gamma: f64, coef0: f64 },
    Rbf { gamma: f64 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl KernelFunction {
    /// Validate `params` and build the matching kernel
    pub fn from_params(params: &SvmParams) -> Result<Self> {
        params.validate()?;
        Ok(match params.kernel {
            KernelType::Linear => Self::Linear,
            KernelType::Polynomial => Self::Polynomial {
                degree: params.degree,
                gamma: params.gamma,
                coef0: params.coef0,
            },
            KernelType::Rbf => Self::Rbf {
                gamma: params.gamma,
            },
            KernelType::Sigmoid => Self::Sigmoid {
                gamma: params.gamma,
                coef0: params.coef0,
            },
        })
    }

    pub fn kernel_type(&self) -> KernelType {
        match self {
            Self::Linear => KernelType::Linear,
            Self::Polynomial { .. } => KernelType::Polynomial,
            Self::Rbf { .. } => KernelType::Rbf,
            Self::Sigmoid { .. } => KernelType::Sigmoid,
        }
    }
}

impl Kernel for KernelFunction {
    fn compute(&self, x: &[f32], y: &[f32]) -> f64 {
        match *self {
            Self::Linear => LinearKernel.compute(x, y),
            Self::Polynomial {
                degree,
                gamma,
                coef0,
            } => PolynomialKernel {
                gamma,
                coef0,
                degree,
            }
            .compute(x, y),
            Self::Rbf { gamma } => RBFKernel::new(gamma).compute(x, y),
            Self::Sigmoid { gamma, coef0 } => SigmoidKernel { gamma, coef0 }.compute(x, y),
        }
    }

    fn compute_with_norms(&self, x: &[f32], y: &[f32], x_norm_sq: f64, y_norm_sq: f64) -> f64 {
        match *self {
            Self::Rbf { gamma } => {
                RBFKernel::new(gamma).compute_with_norms(x, y, x_norm_sq, y_norm_sq)
            }
            _ => self.compute(x, y),
        }
    }
}
