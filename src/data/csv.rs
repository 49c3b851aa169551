//! Fixed-layout CSV loader
//!
//! The input is read as one stream of floating-point tokens. Every token may
//! be followed by a single comma, and whitespace (line breaks included) between
//! tokens is ignored, so a record is simply the next `attributes + 1` tokens:
//! `attributes` feature values followed by the class label. Records may wrap
//! across physical lines or share one.

use crate::core::{Dataset, FeatureMatrix, LabelVector, Result, SVMError};
use crate::data::LabeledDataset;
use log::debug;
use std::io::{Read, Write};
use std::path::Path;

/// Shape of a fixed-layout CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvLayout {
    /// Feature values per record
    pub attributes: usize,
    /// Declared record count; `None` reads until the end of input
    pub samples: Option<usize>,
    /// Labels must be integers in `1..=classes`
    pub classes: usize,
}

impl CsvLayout {
    pub fn new(attributes: usize, classes: usize) -> Self {
        Self {
            attributes,
            samples: None,
            classes,
        }
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.attributes == 0 {
            return Err(SVMError::InvalidParameter(
                "a record needs at least one attribute".to_string(),
            ));
        }
        if self.classes == 0 {
            return Err(SVMError::InvalidParameter(
                "the number of classes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loader for fixed-layout CSV datasets
#[derive(Debug, Clone, Copy)]
pub struct CsvLoader {
    layout: CsvLayout,
}

impl CsvLoader {
    pub fn new(layout: CsvLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &CsvLayout {
        &self.layout
    }

    /// Load a dataset from a file
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<LabeledDataset> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SVMError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = self.parse_bytes(&bytes)?;
        debug!(
            "Loaded {} samples x {} attributes from {}",
            dataset.len(),
            dataset.dim(),
            path.display()
        );
        Ok(dataset)
    }

    /// Load a dataset from any reader
    pub fn load_reader<R: Read>(&self, mut reader: R) -> Result<LabeledDataset> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(&bytes)
    }

    /// Parse a dataset from in-memory text
    pub fn parse_str(&self, text: &str) -> Result<LabeledDataset> {
        self.parse_bytes(text.as_bytes())
    }

    /// Parse a dataset from raw file contents
    ///
    /// Tokens that are not valid UTF-8 are reported as malformed records.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<LabeledDataset> {
        self.layout.validate()?;

        let attributes = self.layout.attributes;
        let capacity = self.layout.samples.unwrap_or(0);
        let mut features = FeatureMatrix::with_capacity(capacity, attributes);
        let mut labels = LabelVector::with_capacity(capacity);
        let mut row = vec![0.0_f32; attributes];
        let mut scanner = TokenScanner::new(bytes);
        let mut sample = 0;

        'records: while self.layout.samples.map_or(true, |n| sample < n) {
            for field in 0..=attributes {
                let (token, line) = match scanner.next_token() {
                    Token::Value { text, line } => (text, line),
                    Token::End if field == 0 && self.layout.samples.is_none() => {
                        break 'records;
                    }
                    Token::End => {
                        return Err(malformed(
                            sample,
                            field,
                            scanner.last_line(),
                            "unexpected end of input",
                        ))
                    }
                    Token::EmptyField { line } => {
                        return Err(malformed(sample, field, line, "empty field"))
                    }
                };

                let value = parse_value(token).ok_or_else(|| {
                    let reason = match std::str::from_utf8(token) {
                        Ok(text) => format!("invalid number '{text}'"),
                        Err(_) => format!(
                            "invalid UTF-8 in token '{}'",
                            String::from_utf8_lossy(token)
                        ),
                    };
                    malformed(sample, field, line, reason)
                })?;

                if field < attributes {
                    row[field] = value;
                } else {
                    self.check_label(sample, value)?;
                    labels.push(value);
                }
            }
            features.push_row(&row)?;
            sample += 1;
        }

        if self.layout.samples.is_some() {
            match scanner.next_token() {
                Token::End => {}
                Token::Value { line, .. } | Token::EmptyField { line } => {
                    return Err(SVMError::TrailingData {
                        samples: sample,
                        line,
                    })
                }
            }
        }

        LabeledDataset::new(features, labels)
    }

    fn check_label(&self, sample: usize, label: f32) -> Result<()> {
        if label.fract() != 0.0 || label < 1.0 || label > self.layout.classes as f32 {
            return Err(SVMError::InvalidLabel {
                sample,
                label,
                n_classes: self.layout.classes,
            });
        }
        Ok(())
    }
}

/// Write a dataset in the layout [`CsvLoader`] reads, one record per line
pub fn write_csv<D: Dataset, W: Write>(dataset: &D, mut writer: W) -> Result<()> {
    for i in 0..dataset.len() {
        for value in dataset.row(i) {
            write!(writer, "{value},")?;
        }
        writeln!(writer, "{}", dataset.label(i))?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_value(token: &[u8]) -> Option<f32> {
    std::str::from_utf8(token)
        .ok()?
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
}

fn malformed(sample: usize, field: usize, line: usize, reason: impl Into<String>) -> SVMError {
    SVMError::MalformedRecord {
        sample,
        field,
        line,
        reason: reason.into(),
    }
}

enum Token<'a> {
    Value { text: &'a [u8], line: usize },
    EmptyField { line: usize },
    End,
}

/// Splits raw bytes into number tokens, each optionally followed by one comma
struct TokenScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    last_line: usize,
}

impl<'a> TokenScanner<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            line: 1,
            last_line: 1,
        }
    }

    /// Line of the most recently consumed token
    fn last_line(&self) -> usize {
        self.last_line
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.bytes;
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            if bytes[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();
        let bytes = self.bytes;
        if self.pos >= bytes.len() {
            return Token::End;
        }

        let line = self.line;
        self.last_line = line;
        if bytes[self.pos] == b',' {
            self.pos += 1;
            return Token::EmptyField { line };
        }

        let start = self.pos;
        while self.pos < bytes.len()
            && bytes[self.pos] != b','
            && !bytes[self.pos].is_ascii_whitespace()
        {
            self.pos += 1;
        }
        let text = &bytes[start..self.pos];

        // One separator comma, possibly after blanks on the same line
        let mut lookahead = self.pos;
        while lookahead < bytes.len() && matches!(bytes[lookahead], b' ' | b'\t') {
            lookahead += 1;
        }
        if lookahead < bytes.len() && bytes[lookahead] == b',' {
            self.pos = lookahead + 1;
        }

        Token::Value { text, line }
    }
}
