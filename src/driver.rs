//! End-to-end run: load both datasets, train, evaluate

use crate::config::RunConfig;
use crate::core::{Classifier, Dataset, Model, Result, Training};
use crate::data::CsvLoader;
use crate::evaluation::{evaluate, EvaluationTally};
use log::info;
use std::path::Path;

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunOutcome<M> {
    pub training_samples: usize,
    pub testing_samples: usize,
    pub tally: EvaluationTally,
    pub n_support_vectors: usize,
    pub training: Training<M>,
}

/// Sequences a run for a given classifier
pub struct Driver<C: Classifier> {
    config: RunConfig,
    classifier: C,
}

impl<C: Classifier> Driver<C> {
    pub fn new(config: RunConfig, classifier: C) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Load the training and testing files, then train and evaluate
    ///
    /// Both files are loaded before the classifier is touched, so a missing
    /// or malformed input never starts a training run.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        training_path: P,
        testing_path: Q,
    ) -> Result<RunOutcome<C::Model>> {
        self.config.validate()?;

        info!("Using training database: {}", training_path.as_ref().display());
        let training_set = CsvLoader::new(self.config.training_layout()).load_file(training_path)?;
        info!("Using testing database: {}", testing_path.as_ref().display());
        let testing_set = CsvLoader::new(self.config.testing_layout()).load_file(testing_path)?;
        info!(
            "Loaded {} training and {} testing samples with {} attributes",
            training_set.len(),
            testing_set.len(),
            self.config.attributes
        );

        let training = self.classifier.train(&training_set, &self.config.training)?;
        let n_support_vectors = training.model.n_support_vectors();
        info!("Number of support vectors for trained SVM = {n_support_vectors}");

        let tally = evaluate(&training.model, &testing_set, self.config.n_classes)?;

        Ok(RunOutcome {
            training_samples: training_set.len(),
            testing_samples: testing_set.len(),
            tally,
            n_support_vectors,
            training,
        })
    }
}
