//! Run configuration: dataset layout and training mode
//!
//! Defaults describe the ISOLET spoken-letter dataset. A JSON file may
//! override any subset of the fields; command-line flags are applied on top.

use crate::core::{Result, SVMError, TrainingMode};
use crate::data::CsvLayout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_ATTRIBUTES: usize = 617;
pub const DEFAULT_TRAINING_SAMPLES: usize = 6238;
pub const DEFAULT_TESTING_SAMPLES: usize = 1559;
pub const DEFAULT_CLASSES: usize = 26;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Features per sample
    pub attributes: usize,
    /// Expected training samples; `None` reads until the end of the file
    pub training_samples: Option<usize>,
    /// Expected testing samples; `None` reads until the end of the file
    pub testing_samples: Option<usize>,
    /// Class labels run from 1 to `n_classes`
    pub n_classes: usize,
    pub training: TrainingMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            attributes: DEFAULT_ATTRIBUTES,
            training_samples: Some(DEFAULT_TRAINING_SAMPLES),
            testing_samples: Some(DEFAULT_TESTING_SAMPLES),
            n_classes: DEFAULT_CLASSES,
            training: TrainingMode::default(),
        }
    }
}

impl RunConfig {
    /// Read a JSON configuration file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SVMError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| {
            SVMError::ConfigError(format!("invalid configuration {}: {e}", path.display()))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.attributes == 0 {
            return Err(SVMError::ConfigError(
                "attributes must be at least 1".to_string(),
            ));
        }
        if self.n_classes < 2 {
            return Err(SVMError::ConfigError(format!(
                "at least 2 classes are needed, got {}",
                self.n_classes
            )));
        }
        if let TrainingMode::AutoGridSearch { folds, grids, .. } = &self.training {
            if *folds < 2 {
                return Err(SVMError::ConfigError(format!(
                    "grid search needs at least 2 folds, got {folds}"
                )));
            }
            if let Some(n) = self.training_samples {
                if *folds > n {
                    return Err(SVMError::ConfigError(format!(
                        "cannot split {n} training samples into {folds} folds"
                    )));
                }
            }
            grids.validate()?;
        } else {
            self.training.params().validate()?;
        }
        Ok(())
    }

    pub fn training_layout(&self) -> CsvLayout {
        Self::layout(self.attributes, self.n_classes, self.training_samples)
    }

    pub fn testing_layout(&self) -> CsvLayout {
        Self::layout(self.attributes, self.n_classes, self.testing_samples)
    }

    fn layout(attributes: usize, classes: usize, samples: Option<usize>) -> CsvLayout {
        let layout = CsvLayout::new(attributes, classes);
        match samples {
            Some(n) => layout.with_samples(n),
            None => layout,
        }
    }
}
