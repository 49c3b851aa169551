//! speechsvm command line interface
//!
//! Trains a multi-class SVM on a training CSV file and reports how it
//! classifies a testing CSV file.

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use speechsvm::config::RunConfig;
use speechsvm::core::{KernelType, ParamGrids, Result, TrainingMode};
use speechsvm::persistence::SavedModel;
use speechsvm::report::Report;
use speechsvm::{Driver, SvmClassifier};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "speechsvm")]
#[command(about = "Train and evaluate a multi-class SVM on fixed-layout CSV data")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Training data file
    training: PathBuf,

    /// Testing data file
    testing: PathBuf,

    /// JSON run configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Feature values per sample
    #[arg(long)]
    attributes: Option<usize>,

    /// Expected training samples, or "auto" to read the whole file
    #[arg(long)]
    training_samples: Option<SampleCount>,

    /// Expected testing samples, or "auto" to read the whole file
    #[arg(long)]
    testing_samples: Option<SampleCount>,

    /// Number of classes (labels 1..=N)
    #[arg(long)]
    classes: Option<usize>,

    /// Parameter selection: grid search or fixed parameters
    #[arg(long, value_enum)]
    mode: Option<CliMode>,

    #[arg(long, value_enum)]
    kernel: Option<CliKernel>,

    /// Regularization parameter C
    #[arg(short = 'C', long)]
    c: Option<f64>,

    #[arg(long)]
    gamma: Option<f64>,

    #[arg(long)]
    degree: Option<f64>,

    #[arg(long)]
    coef0: Option<f64>,

    /// Maximum solver iterations per binary machine
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Convergence tolerance
    #[arg(long)]
    epsilon: Option<f64>,

    /// Cross-validation folds (auto mode)
    #[arg(long)]
    folds: Option<usize>,

    /// Shuffle seed for cross-validation (auto mode)
    #[arg(long)]
    seed: Option<u64>,

    /// Kernel cache size in MB
    #[arg(long)]
    cache_size: Option<usize>,

    /// Write the trained model as JSON
    #[arg(long)]
    save_model: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum CliMode {
    /// Cross-validated grid search
    Auto,
    /// Use the given parameters as they are
    Manual,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum CliKernel {
    Linear,
    #[value(name = "poly")]
    Polynomial,
    Rbf,
    Sigmoid,
}

impl From<CliKernel> for KernelType {
    fn from(kernel: CliKernel) -> Self {
        match kernel {
            CliKernel::Linear => KernelType::Linear,
            CliKernel::Polynomial => KernelType::Polynomial,
            CliKernel::Rbf => KernelType::Rbf,
            CliKernel::Sigmoid => KernelType::Sigmoid,
        }
    }
}

/// Sample count flag value: a number or "auto"
#[derive(Clone, Copy, Debug, PartialEq)]
enum SampleCount {
    Auto,
    Exactly(usize),
}

impl FromStr for SampleCount {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse()
            .map(Self::Exactly)
            .map_err(|_| format!("expected a sample count or 'auto', got '{s}'"))
    }
}

impl SampleCount {
    fn into_option(self) -> Option<usize> {
        match self {
            Self::Auto => None,
            Self::Exactly(n) => Some(n),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(&cli) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Reading configuration from {}", path.display());
            RunConfig::from_file(path)?
        }
        None => RunConfig::default(),
    };
    apply_overrides(cli, &mut config);

    if config.training.is_auto() {
        info!("Training the SVM with grid search; this may take some time");
    }

    let driver = Driver::new(config, SvmClassifier);
    let outcome = driver.run(&cli.training, &cli.testing)?;

    print!("{}", Report::new(&outcome, &cli.testing));

    if let Some(path) = &cli.save_model {
        SavedModel::from_training(&outcome.training).save_to_file(path)?;
        info!("Model saved to: {}", path.display());
    }
    Ok(())
}

/// Apply command-line flags on top of the file or default configuration
fn apply_overrides(cli: &Cli, config: &mut RunConfig) {
    if let Some(attributes) = cli.attributes {
        config.attributes = attributes;
    }
    if let Some(count) = cli.training_samples {
        config.training_samples = count.into_option();
    }
    if let Some(count) = cli.testing_samples {
        config.testing_samples = count.into_option();
    }
    if let Some(classes) = cli.classes {
        config.n_classes = classes;
    }

    match (cli.mode, &config.training) {
        (Some(CliMode::Manual), TrainingMode::AutoGridSearch { params, .. }) => {
            config.training = TrainingMode::Manual { params: *params };
        }
        (Some(CliMode::Auto), TrainingMode::Manual { params }) => {
            config.training = TrainingMode::AutoGridSearch {
                params: *params,
                folds: 10,
                grids: ParamGrids::default(),
                seed: 0,
            };
        }
        _ => {}
    }

    let params = config.training.params_mut();
    if let Some(kernel) = cli.kernel {
        params.kernel = kernel.into();
    }
    if let Some(c) = cli.c {
        params.c = c;
    }
    if let Some(gamma) = cli.gamma {
        params.gamma = gamma;
    }
    if let Some(degree) = cli.degree {
        params.degree = degree;
    }
    if let Some(coef0) = cli.coef0 {
        params.coef0 = coef0;
    }
    if let Some(max_iterations) = cli.max_iterations {
        params.termination.max_iterations = max_iterations;
    }
    if let Some(epsilon) = cli.epsilon {
        params.termination.epsilon = epsilon;
    }
    if let Some(cache_size) = cli.cache_size {
        params.cache_size = cache_size * 1024 * 1024; // Convert MB to bytes
    }

    match &mut config.training {
        TrainingMode::AutoGridSearch { folds, seed, .. } => {
            if let Some(n) = cli.folds {
                *folds = n;
            }
            if let Some(s) = cli.seed {
                *seed = s;
            }
        }
        TrainingMode::Manual { .. } => {
            if cli.folds.is_some() || cli.seed.is_some() {
                warn!("--folds and --seed only apply to auto mode; ignoring them");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["speechsvm", "train.data", "test.data"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_sample_count_parsing() {
        assert_eq!("auto".parse::<SampleCount>(), Ok(SampleCount::Auto));
        assert_eq!("AUTO".parse::<SampleCount>(), Ok(SampleCount::Auto));
        assert_eq!("42".parse::<SampleCount>(), Ok(SampleCount::Exactly(42)));
        assert!("-1".parse::<SampleCount>().is_err());
    }

    #[test]
    fn test_defaults_untouched_without_flags() {
        let cli = parse(&[]);
        let mut config = RunConfig::default();
        apply_overrides(&cli, &mut config);
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_manual_overrides() {
        let cli = parse(&[
            "--mode",
            "manual",
            "--kernel",
            "poly",
            "-C",
            "2.5",
            "--degree",
            "3",
            "--gamma",
            "0.5",
            "--training-samples",
            "auto",
            "--cache-size",
            "10",
        ]);
        let mut config = RunConfig::default();
        apply_overrides(&cli, &mut config);

        assert!(!config.training.is_auto());
        assert_eq!(config.training_samples, None);
        let params = config.training.params();
        assert_eq!(params.kernel, KernelType::Polynomial);
        assert_eq!(params.c, 2.5);
        assert_eq!(params.degree, 3.0);
        assert_eq!(params.gamma, 0.5);
        assert_eq!(params.cache_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_auto_overrides() {
        let cli = parse(&["--mode", "auto", "--folds", "5", "--seed", "9"]);
        let mut config = RunConfig {
            training: TrainingMode::Manual {
                params: Default::default(),
            },
            ..RunConfig::default()
        };
        apply_overrides(&cli, &mut config);

        match config.training {
            TrainingMode::AutoGridSearch { folds, seed, .. } => {
                assert_eq!(folds, 5);
                assert_eq!(seed, 9);
            }
            TrainingMode::Manual { .. } => panic!("expected auto mode"),
        }
    }
}
