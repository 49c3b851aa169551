//! Multi-class SVM training and evaluation for fixed-layout CSV datasets
//!
//! Loads ISOLET-style spoken-letter data (617 attributes, labels 1 to 26),
//! trains a one-vs-one C-SVC either with fixed parameters or with a
//! cross-validated grid search, and tallies its predictions on a testing set.

pub mod api;
pub mod cache;
pub mod config;
pub mod core;
pub mod data;
pub mod driver;
pub mod evaluation;
pub mod grid_search;
pub mod kernel;
pub mod multiclass;
pub mod persistence;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{SvmClassifier, SVM};
pub use crate::cache::{CacheStats, KernelCache};
pub use crate::config::RunConfig;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::{CsvLayout, CsvLoader, LabeledDataset};
pub use crate::driver::{Driver, RunOutcome};
pub use crate::evaluation::EvaluationTally;
pub use crate::kernel::{Kernel, KernelFunction};
pub use crate::multiclass::MulticlassSvm;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
