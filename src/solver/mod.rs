//! SVM solver implementations
//!
//! Binary C-SVC training by Sequential Minimal Optimization with second-order
//! working-pair selection. Multi-class training is built on top of it in
//! [`crate::multiclass`].

pub mod smo;

pub use self::smo::*;
