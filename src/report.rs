//! Human-readable summary of a run

use crate::driver::RunOutcome;
use crate::evaluation::class_symbol;
use std::fmt;
use std::path::Path;

/// Console report for a finished run
pub struct Report<'a, M> {
    outcome: &'a RunOutcome<M>,
    testing_path: &'a Path,
}

impl<'a, M> Report<'a, M> {
    pub fn new(outcome: &'a RunOutcome<M>, testing_path: &'a Path) -> Self {
        Self {
            outcome,
            testing_path,
        }
    }
}

impl<M> fmt::Display for Report<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.outcome;
        let tally = &outcome.tally;

        if let Some(search) = &outcome.training.search {
            let params = &outcome.training.params;
            writeln!(
                f,
                "Using optimal parameters degree {}, gamma {}, coef0 {}, C {}",
                params.degree, params.gamma, params.coef0, params.c
            )?;
            writeln!(
                f,
                "\t({} combinations, {}-fold cross-validation error {:.2}%)",
                search.evaluated,
                search.folds,
                search.best_error_rate * 100.0
            )?;
        }
        writeln!(
            f,
            "Number of support vectors for trained SVM = {}",
            outcome.n_support_vectors
        )?;

        writeln!(f)?;
        writeln!(
            f,
            "Results on the testing database: {}",
            self.testing_path.display()
        )?;
        writeln!(
            f,
            "\tCorrect classification: {} ({:.2}%)",
            tally.correct,
            tally.correct_percent()
        )?;
        writeln!(
            f,
            "\tWrong classifications: {} ({:.2}%)",
            tally.incorrect,
            tally.incorrect_percent()
        )?;
        for (class, count) in tally.false_positives.iter().enumerate() {
            writeln!(
                f,
                "\tClass (character {}) false positives\t{} ({:.2}%)",
                class_symbol(class + 1),
                count,
                tally.false_positive_percent(class)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SearchSummary, SvmParams, Training};
    use crate::evaluation::tally_predictions;

    fn outcome(search: Option<SearchSummary>) -> RunOutcome<()> {
        RunOutcome {
            training_samples: 4,
            testing_samples: 4,
            tally: tally_predictions(&[1.0, 2.0, 2.0, 1.0], &[1.0, 2.0, 1.0, 1.0], 2).unwrap(),
            n_support_vectors: 3,
            training: Training {
                model: (),
                params: SvmParams::default(),
                search,
            },
        }
    }

    #[test]
    fn test_report_lists_counts_and_classes() {
        let outcome = outcome(None);
        let text = Report::new(&outcome, Path::new("test.data")).to_string();

        assert!(text.contains("Number of support vectors for trained SVM = 3"));
        assert!(text.contains("Results on the testing database: test.data"));
        assert!(text.contains("Correct classification: 3 (75.00%)"));
        assert!(text.contains("Wrong classifications: 1 (25.00%)"));
        assert!(text.contains("Class (character A) false positives\t1 (25.00%)"));
        assert!(text.contains("Class (character B) false positives\t0 (0.00%)"));
        assert!(!text.contains("optimal parameters"));
    }

    #[test]
    fn test_report_shows_search_result() {
        let outcome = outcome(Some(SearchSummary {
            evaluated: 6,
            folds: 10,
            best_error_rate: 0.05,
        }));
        let text = Report::new(&outcome, Path::new("test.data")).to_string();

        assert!(text.contains("Using optimal parameters degree 0, gamma 0, coef0 0, C 10"));
        assert!(text.contains("6 combinations, 10-fold cross-validation error 5.00%"));
    }
}
