//! Integration tests for the speechsvm library
//!
//! These tests run the loader, the classifier and the evaluation harness
//! together on small synthetic datasets.

use approx::assert_relative_eq;
use speechsvm::core::{KernelType, ParamGrid, ParamGrids, SvmParams, TrainingMode};
use speechsvm::data::write_csv;
use speechsvm::evaluation::tally_predictions;
use speechsvm::persistence::SavedModel;
use speechsvm::{
    Dataset, Driver, FeatureMatrix, LabelVector, LabeledDataset, Model, RunConfig, SvmClassifier,
    SVM,
};
use tempfile::{NamedTempFile, TempDir};

const DIM: usize = 6;

/// `per_class` noisy points around a distinct corner for each class
fn clustered(n_classes: usize, per_class: usize, jitter: f32) -> LabeledDataset {
    let mut features = FeatureMatrix::new(DIM);
    let mut labels = LabelVector::default();
    for class in 0..n_classes {
        for k in 0..per_class {
            let mut row = vec![0.0_f32; DIM];
            row[class % DIM] = 3.0;
            if class >= DIM {
                row[(class + 1) % DIM] = -3.0;
            }
            for (d, value) in row.iter_mut().enumerate() {
                *value += jitter * (((k * 7 + d * 3) % 5) as f32 - 2.0) / 2.0;
            }
            features.push_row(&row).unwrap();
            labels.push((class + 1) as f32);
        }
    }
    LabeledDataset::new(features, labels).unwrap()
}

fn write_dataset(dataset: &LabeledDataset) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    write_csv(dataset, file.as_file()).expect("Failed to write dataset");
    file
}

fn manual_config(n_classes: usize, train: usize, test: usize) -> RunConfig {
    RunConfig {
        attributes: DIM,
        training_samples: Some(train),
        testing_samples: Some(test),
        n_classes,
        training: TrainingMode::Manual {
            params: SvmParams::default(),
        },
    }
}

/// Test complete workflow: files -> training -> evaluation
#[test]
fn test_complete_workflow_manual() {
    let training = clustered(4, 10, 0.3);
    let testing = clustered(4, 5, 0.5);
    let train_file = write_dataset(&training);
    let test_file = write_dataset(&testing);

    let driver = Driver::new(manual_config(4, 40, 20), SvmClassifier);
    let outcome = driver
        .run(train_file.path(), test_file.path())
        .expect("Run should succeed");

    assert_eq!(outcome.training_samples, 40);
    assert_eq!(outcome.testing_samples, 20);
    assert_eq!(outcome.tally.correct, 20);
    assert_eq!(outcome.tally.incorrect, 0);
    assert_eq!(outcome.tally.false_positives, vec![0; 4]);
    assert!(outcome.n_support_vectors > 0);
    assert!(outcome.n_support_vectors <= 40);
    assert!(outcome.training.search.is_none());
}

#[test]
fn test_complete_workflow_grid_search() {
    let training = clustered(3, 8, 0.3);
    let train_file = write_dataset(&training);
    let test_file = write_dataset(&training);

    let config = RunConfig {
        training: TrainingMode::AutoGridSearch {
            params: SvmParams {
                kernel: KernelType::Rbf,
                gamma: 0.1,
                ..SvmParams::default()
            },
            folds: 4,
            grids: ParamGrids {
                c: ParamGrid::new(1.0, 100.0, 10.0),
                gamma: ParamGrid::new(0.01, 1.0, 10.0),
                ..ParamGrids::default()
            },
            seed: 11,
        },
        ..manual_config(3, 24, 24)
    };

    let outcome = Driver::new(config, SvmClassifier)
        .run(train_file.path(), test_file.path())
        .expect("Run should succeed");

    let summary = outcome.training.search.expect("Grid search summary");
    assert_eq!(summary.evaluated, 4);
    assert_eq!(summary.folds, 4);
    assert!([1.0, 10.0].contains(&outcome.training.params.c));
    assert!([0.01, 0.1].contains(&outcome.training.params.gamma));
    assert!(outcome.tally.correct >= 22);
}

#[test]
fn test_saved_model_predicts_identically() {
    let training = clustered(5, 6, 0.4);
    let trained = SVM::manual()
        .with_kernel(KernelType::Polynomial)
        .with_degree(2.0)
        .with_gamma(0.5)
        .with_coef0(1.0)
        .train(&training)
        .expect("Training should succeed");

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("model.json");
    SavedModel::from_training(&trained)
        .save_to_file(&path)
        .expect("Save should succeed");
    let restored = SavedModel::load_from_file(&path)
        .expect("Load should succeed")
        .into_model();

    assert_eq!(restored.n_support_vectors(), trained.model.n_support_vectors());
    assert_eq!(
        restored.predict_dataset(&training),
        trained.model.predict_dataset(&training)
    );
}

/// Every sample of class c predicted as class c + 1 (wrapping at 26)
#[test]
fn test_uniform_confusion_over_26_classes() {
    let labels: Vec<f32> = (0..26 * 3).map(|i| (i % 26 + 1) as f32).collect();
    let predictions: Vec<f32> = labels
        .iter()
        .map(|&label| (label as usize % 26 + 1) as f32)
        .collect();

    let tally = tally_predictions(&predictions, &labels, 26).unwrap();

    assert_eq!(tally.correct, 0);
    assert_eq!(tally.incorrect, 78);
    assert_eq!(tally.false_positives, vec![3; 26]);
    assert_relative_eq!(tally.incorrect_percent(), 100.0);
    assert_relative_eq!(tally.false_positive_percent(25), 100.0 * 3.0 / 78.0);
}

#[test]
fn test_perfect_predictions() {
    let labels: Vec<f32> = (1..=26).map(|l| l as f32).collect();
    let tally = tally_predictions(&labels, &labels, 26).unwrap();

    assert_eq!(tally.correct, 26);
    assert_eq!(tally.incorrect, 0);
    assert!(tally.false_positives.iter().all(|&fp| fp == 0));
    assert_relative_eq!(tally.correct_percent(), 100.0);
}

#[test]
fn test_empty_testing_set() {
    let training = clustered(2, 5, 0.2);
    let train_file = write_dataset(&training);
    let test_file = NamedTempFile::new().unwrap();

    let outcome = Driver::new(manual_config(2, 10, 0), SvmClassifier)
        .run(train_file.path(), test_file.path())
        .expect("Run should succeed");

    assert_eq!(outcome.testing_samples, 0);
    assert_eq!(outcome.tally.correct, 0);
    assert_eq!(outcome.tally.incorrect, 0);
    assert_eq!(outcome.tally.correct_percent(), 0.0);
    assert_eq!(outcome.tally.incorrect_percent(), 0.0);
    assert_eq!(outcome.tally.false_positive_percent(0), 0.0);
}

#[test]
fn test_single_class_training_set_fails() {
    let training = clustered(1, 4, 0.2);
    let train_file = write_dataset(&training);
    let test_file = write_dataset(&training);

    let result = Driver::new(manual_config(2, 4, 4), SvmClassifier)
        .run(train_file.path(), test_file.path());
    assert!(result.is_err());
}

#[test]
fn test_dataset_helpers() {
    let dataset = clustered(3, 4, 0.0);
    assert_eq!(dataset.len(), 12);
    assert_eq!(dataset.dim(), DIM);
    assert_eq!(dataset.class_counts(3), vec![4, 4, 4]);
}
