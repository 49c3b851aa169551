//! Dataset format compatibility tests
//!
//! The same records must load identically however the tokens are spread over
//! lines, and malformed files must fail with errors that point at the record.

use speechsvm::core::SVMError;
use speechsvm::data::write_csv;
use speechsvm::{CsvLayout, CsvLoader, Dataset, FeatureMatrix, LabelVector, LabeledDataset};
use std::io::Write;
use tempfile::NamedTempFile;

fn loader(attributes: usize, samples: usize) -> CsvLoader {
    CsvLoader::new(CsvLayout::new(attributes, 26).with_samples(samples))
}

/// Test layout variations that describe the same two records
#[test]
fn test_record_layout_variations() {
    let expected = loader(3, 2)
        .parse_str("1.0,2.0,3.0,1,\n4.0,5.0,6.0,2,\n")
        .expect("Reference layout should load");

    let test_cases = vec![
        ("1.0,2.0,3.0,1\n4.0,5.0,6.0,2\n", "no trailing comma"),
        ("1.0,2.0,3.0,1,\r\n4.0,5.0,6.0,2,\r\n", "CRLF line endings"),
        ("1.0,2.0,\n3.0,1,\n4.0,\n5.0,6.0,2,", "records wrapped over lines"),
        ("1.0,2.0,3.0,1,4.0,5.0,6.0,2,", "records sharing a line"),
        ("1.0 2.0 3.0 1\n4.0 5.0 6.0 2\n", "whitespace separated"),
        ("  1.0, 2.0, 3.0, 1,\n\n\t4.0, 5.0, 6.0, 2,\n\n", "padding and blank lines"),
        ("1,2,3,1,4,5,6,2", "integer tokens"),
        ("1e0,2E0,3.0e+0,1,4,5,6,2", "exponent notation"),
    ];

    for (text, description) in test_cases {
        let dataset = loader(3, 2)
            .parse_str(text)
            .unwrap_or_else(|e| panic!("Failed to load {description}: {e}"));
        assert_eq!(dataset, expected, "Mismatch for {description}");
    }
}

#[test]
fn test_isolet_shape() {
    let attributes = 617;
    let samples = 30;
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for s in 0..samples {
        for a in 0..attributes {
            let value = ((s * attributes + a) % 200) as f32 / 100.0 - 1.0;
            write!(file, "{value}, ").expect("Failed to write");
        }
        writeln!(file, "{}.", s % 26 + 1).expect("Failed to write");
    }
    file.flush().expect("Failed to flush");

    let dataset = loader(attributes, samples)
        .load_file(file.path())
        .expect("ISOLET-shaped file should load");

    assert_eq!(dataset.len(), samples);
    assert_eq!(dataset.dim(), attributes);
    assert_eq!(dataset.features().n_rows(), samples);
    assert_eq!(dataset.label(0), 1.0);
    assert_eq!(dataset.label(29), 4.0);
    assert_eq!(dataset.row(1)[0], ((617 % 200) as f32) / 100.0 - 1.0);
}

#[test]
fn test_write_then_load_round_trip() {
    let features = FeatureMatrix::from_rows(
        4,
        &[
            [0.25_f32, -1.5, 3.0e-4, 7.0],
            [-0.125, 2.5, 1.0e6, -0.0],
            [1.0 / 3.0, -2.0 / 7.0, 0.1, 0.2],
        ],
    )
    .unwrap();
    let original = LabeledDataset::new(features, LabelVector::new(vec![26.0, 1.0, 13.0])).unwrap();

    let mut buffer = Vec::new();
    write_csv(&original, &mut buffer).expect("Write should succeed");
    let text = String::from_utf8(buffer).unwrap();
    let loaded = loader(4, 3).parse_str(&text).expect("Load should succeed");

    assert_eq!(loaded, original);
}

#[test]
fn test_truncated_file_reports_position() {
    let result = loader(2, 3).parse_str("1,2,1,\n3,4,2,\n5,");
    match result {
        Err(SVMError::MalformedRecord { sample, field, .. }) => {
            assert_eq!(sample, 2);
            assert_eq!(field, 1);
        }
        other => panic!("Expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn test_extra_tokens_rejected() {
    let result = loader(2, 1).parse_str("1,2,1,\n9,");
    assert!(matches!(
        result,
        Err(SVMError::TrailingData {
            samples: 1,
            line: 2
        })
    ));
}

#[test]
fn test_non_numeric_token_rejected() {
    let result = loader(2, 2).parse_str("1,2,1,\n3,x,2,\n");
    match result {
        Err(SVMError::MalformedRecord {
            sample,
            field,
            line,
            reason,
        }) => {
            assert_eq!((sample, field, line), (1, 1, 2));
            assert!(reason.contains("'x'"));
        }
        other => panic!("Expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn test_label_outside_class_range_rejected() {
    for text in ["1,2,27,", "1,2,0,", "1,2,1.5,"] {
        let result = loader(2, 1).parse_str(text);
        assert!(
            matches!(result, Err(SVMError::InvalidLabel { sample: 0, .. })),
            "{text} should be rejected"
        );
    }
}

#[test]
fn test_undeclared_count_reads_to_end() {
    let layout = CsvLayout::new(2, 26);
    let dataset = CsvLoader::new(layout)
        .parse_str("1,2,1,\n3,4,2,\n5,6,3,\n")
        .unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.labels(), vec![1.0, 2.0, 3.0]);
}
