//! Integration tests for the CLI application
//!
//! These tests run the compiled binary on small data files.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

/// Training and testing files: 3 attributes, 3 classes, 4 samples per class
struct TestDataFiles {
    pub training: NamedTempFile,
    pub testing: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        let centers = [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]];

        let mut training = NamedTempFile::new()?;
        let mut testing = NamedTempFile::new()?;
        for (class, center) in centers.iter().enumerate() {
            for k in 0..4 {
                let shift = 0.1 * k as f32;
                writeln!(
                    training,
                    "{},{},{},{},",
                    center[0] + shift,
                    center[1] - shift,
                    center[2] + shift,
                    class + 1
                )?;
                writeln!(
                    testing,
                    "{},{},{},{},",
                    center[0] - shift,
                    center[1] + shift,
                    center[2] - shift,
                    class + 1
                )?;
            }
        }
        training.flush()?;
        testing.flush()?;

        Ok(Self { training, testing })
    }

    fn paths(&self) -> [&str; 2] {
        [
            self.training.path().to_str().unwrap(),
            self.testing.path().to_str().unwrap(),
        ]
    }
}

const SMALL_LAYOUT: [&str; 8] = [
    "--attributes",
    "3",
    "--classes",
    "3",
    "--training-samples",
    "12",
    "--testing-samples",
    "12",
];

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_speechsvm"))
        .args(args)
        .output()
        .expect("Failed to run CLI")
}

#[test]
fn test_cli_manual_run() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let mut args = data.paths().to_vec();
    args.extend_from_slice(&SMALL_LAYOUT);
    args.extend_from_slice(&["--mode", "manual", "--kernel", "linear", "-C", "10"]);

    let output = run_cli(&args);

    assert!(
        output.status.success(),
        "Run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Correct classification: 12 (100.00%)"));
    assert!(stdout.contains("Wrong classifications: 0 (0.00%)"));
    assert!(stdout.contains("Class (character C) false positives"));
    assert!(!stdout.contains("Class (character D)"));
    assert!(stdout.contains("Number of support vectors for trained SVM ="));
}

#[test]
fn test_cli_auto_run_reports_parameters() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let mut args = data.paths().to_vec();
    args.extend_from_slice(&SMALL_LAYOUT);
    args.extend_from_slice(&["--mode", "auto", "--folds", "3", "--seed", "4"]);

    let output = run_cli(&args);

    assert!(
        output.status.success(),
        "Run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Using optimal parameters"));
    assert!(stdout.contains("3-fold cross-validation"));
}

#[test]
fn test_cli_saves_model() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    let model_arg = model_path.to_str().unwrap();

    let mut args = data.paths().to_vec();
    args.extend_from_slice(&SMALL_LAYOUT);
    args.extend_from_slice(&["--mode", "manual", "--save-model", model_arg]);

    let output = run_cli(&args);

    assert!(output.status.success());
    assert!(model_path.exists(), "Model file was not created");
    let json = std::fs::read_to_string(&model_path).unwrap();
    assert!(json.contains("\"library_version\""));
    assert!(json.contains("\"machines\""));
}

#[test]
fn test_cli_config_file() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        r#"{{
            "attributes": 3,
            "training_samples": null,
            "testing_samples": null,
            "n_classes": 3,
            "training": {{ "mode": "manual", "params": {{ "kernel": "rbf", "gamma": 0.5 }} }}
        }}"#
    )
    .unwrap();

    let mut args = data.paths().to_vec();
    args.extend_from_slice(&["--config", config.path().to_str().unwrap()]);

    let output = run_cli(&args);

    assert!(
        output.status.success(),
        "Run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Correct classification: 12"));
}

#[test]
fn test_cli_missing_training_file() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let mut args = vec!["/nonexistent/isolet1234.data", data.paths()[1]];
    args.extend_from_slice(&SMALL_LAYOUT);

    let output = run_cli(&args);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read file"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Results on the testing database"));
}

#[test]
fn test_cli_malformed_input() {
    let mut training = NamedTempFile::new().unwrap();
    write!(training, "1.0,2.0,oops,1,\n").unwrap();
    let data = TestDataFiles::new().expect("Failed to create test data");

    let mut args = vec![training.path().to_str().unwrap(), data.paths()[1]];
    args.extend_from_slice(&SMALL_LAYOUT);

    let output = run_cli(&args);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_rejects_bad_sample_count() {
    let data = TestDataFiles::new().expect("Failed to create test data");
    let mut args = data.paths().to_vec();
    args.extend_from_slice(&["--training-samples", "many"]);

    let output = run_cli(&args);

    assert!(!output.status.success());
}

#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--training-samples"));
    assert!(stdout.contains("--mode"));
}
