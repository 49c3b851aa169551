//! Dataset storage and the fixed-layout CSV loader

pub mod csv;
pub mod dataset;

pub use self::csv::*;
pub use self::dataset::*;
