//! Model serialization and persistence
//!
//! A trained one-vs-one model is written as a pretty-printed JSON document
//! together with metadata describing how it was produced.

use crate::core::{Model, Result, SVMError, SearchSummary, SvmParams, Training};
use crate::multiclass::MulticlassSvm;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Model metadata for tracking and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    pub n_support_vectors: usize,
    pub classes: Vec<f32>,
    pub params: SvmParams,
    /// Present when the parameters came from a grid search
    pub search: Option<SearchSummary>,
}

/// Serializable trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedModel {
    pub metadata: ModelMetadata,
    pub model: MulticlassSvm,
}

impl SavedModel {
    pub fn from_training(training: &Training<MulticlassSvm>) -> Self {
        Self {
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
                n_support_vectors: training.model.n_support_vectors(),
                classes: training.model.classes().to_vec(),
                params: training.params,
                search: training.search.clone(),
            },
            model: training.model.clone(),
        }
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file and check that it is usable for prediction
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        let saved: Self = serde_json::from_reader(reader)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        saved.model.validate()?;
        Ok(saved)
    }

    pub fn into_model(self) -> MulticlassSvm {
        self.model
    }
}
