//! Core types and traits shared by the loader, the SVM engine and the harness

pub mod error;
pub mod traits;
pub mod types;

pub use self::error::*;
pub use self::traits::*;
pub use self::types::*;
