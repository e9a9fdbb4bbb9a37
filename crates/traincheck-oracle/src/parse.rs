//! Parsing of trainer output files into numeric sequences.
//!
//! Two file families are consumed:
//! - weight dumps: one weight per line, value in the leading field
//! - prediction dumps: one example per line, in one of three formats
//!   (`label:score` pairs, comma-separated row, single scalar)
//!
//! Numeric tokens are extracted with a deliberately lossy filter that keeps
//! only digits and the decimal point. Under the default [`SignHandling`],
//! a leading minus sign is discarded with the rest of the decoration, so
//! negative values parse as their absolute value. That quirk is inherited
//! from the harness this format comes from and is kept as the default for
//! behavioral parity; [`SignHandling::Preserve`] selects the corrected
//! variant.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// How numeric-token extraction treats a leading minus sign.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignHandling {
    /// Discard the sign with all other non-numeric decoration; negative
    /// values parse as their absolute value. Default, for parity with the
    /// trainer harness.
    #[default]
    Discard,

    /// Keep a leading minus sign.
    Preserve,
}

/// Errors produced while parsing output files.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("output file is empty: {path}")]
    EmptyFile { path: String },

    #[error("input has no parseable lines")]
    NoLines,

    #[error("no numeric content in token: {token:?}")]
    InvalidToken { token: String },

    #[error("rows have unequal lengths: row 0 has {expected} elements, row {row} has {found}")]
    RaggedRows {
        expected: usize,
        found: usize,
        row: usize,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Numeric sequence(s) extracted from one output file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ParsedSequence {
    /// One number per line.
    Scalars(Vec<f64>),

    /// One row of numbers per line (e.g. per-class scores).
    Rows(Vec<Vec<f64>>),
}

impl ParsedSequence {
    /// Number of lines the sequence was built from.
    pub fn line_count(&self) -> usize {
        match self {
            ParsedSequence::Scalars(values) => values.len(),
            ParsedSequence::Rows(rows) => rows.len(),
        }
    }

    /// Flatten to a single element vector.
    ///
    /// Rows must all have the same length; ragged rows are an error rather
    /// than a silent mismatch.
    pub fn flatten(&self) -> Result<Vec<f64>, ParseError> {
        match self {
            ParsedSequence::Scalars(values) => Ok(values.clone()),
            ParsedSequence::Rows(rows) => {
                let expected = rows.first().map_or(0, Vec::len);
                for (row, values) in rows.iter().enumerate() {
                    if values.len() != expected {
                        return Err(ParseError::RaggedRows {
                            expected,
                            found: values.len(),
                            row,
                        });
                    }
                }
                Ok(rows.iter().flatten().copied().collect())
            }
        }
    }
}

/// Extract a floating-point value from a raw token.
///
/// Keeps only ASCII digits and `.`, then parses the residue. A token with no
/// numeric content, or whose residue does not form a number, is an error.
pub fn numeric_token(raw: &str, sign: SignHandling) -> Result<f64, ParseError> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let candidate = if sign == SignHandling::Preserve && raw.trim_start().starts_with('-') {
        format!("-{digits}")
    } else {
        digits
    };

    candidate.parse::<f64>().map_err(|_| ParseError::InvalidToken {
        token: raw.to_string(),
    })
}

/// Parse weight-dump lines: one weight per line, value in the leading field.
pub fn parse_weight_lines<'a, I>(lines: I, sign: SignHandling) -> Result<Vec<f64>, ParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut weights = Vec::new();
    for line in lines {
        let field = line
            .split_whitespace()
            .next()
            .ok_or_else(|| ParseError::InvalidToken {
                token: line.to_string(),
            })?;
        weights.push(numeric_token(field, sign)?);
    }
    if weights.is_empty() {
        return Err(ParseError::NoLines);
    }
    Ok(weights)
}

/// Parse a weight-dump file.
pub fn parse_weights_file(path: &Path, sign: SignHandling) -> Result<Vec<f64>, ParseError> {
    let text = read_output(path)?;
    parse_weight_lines(text.lines(), sign).map_err(|err| at_path(err, path))
}

/// Parse prediction-dump lines.
///
/// Blank lines are dropped; the format is detected from the first remaining
/// line: `label:score` pairs when it contains `:`, a comma-separated row when
/// it contains `,`, one scalar per line otherwise.
pub fn parse_prediction_lines<'a, I>(
    lines: I,
    sign: SignHandling,
) -> Result<ParsedSequence, ParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let lines: Vec<&str> = lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let first = lines.first().ok_or(ParseError::NoLines)?;

    if first.contains(':') {
        debug!(event = "parse.predictions", format = "label_score_pairs", lines = lines.len());
        let rows = lines
            .iter()
            .map(|line| {
                line.split(',')
                    .map(|pair| {
                        let score = pair.split(':').nth(1).ok_or_else(|| {
                            ParseError::InvalidToken {
                                token: pair.to_string(),
                            }
                        })?;
                        numeric_token(score, sign)
                    })
                    .collect::<Result<Vec<f64>, ParseError>>()
            })
            .collect::<Result<Vec<Vec<f64>>, ParseError>>()?;
        Ok(ParsedSequence::Rows(rows))
    } else if first.contains(',') {
        debug!(event = "parse.predictions", format = "comma_row", lines = lines.len());
        let rows = lines
            .iter()
            .map(|line| {
                line.split(',')
                    .map(|token| numeric_token(token, sign))
                    .collect::<Result<Vec<f64>, ParseError>>()
            })
            .collect::<Result<Vec<Vec<f64>>, ParseError>>()?;
        Ok(ParsedSequence::Rows(rows))
    } else {
        debug!(event = "parse.predictions", format = "scalar", lines = lines.len());
        let values = lines
            .iter()
            .map(|line| numeric_token(line, sign))
            .collect::<Result<Vec<f64>, ParseError>>()?;
        Ok(ParsedSequence::Scalars(values))
    }
}

/// Parse a prediction-dump file.
pub fn parse_predictions_file(
    path: &Path,
    sign: SignHandling,
) -> Result<ParsedSequence, ParseError> {
    let text = read_output(path)?;
    parse_prediction_lines(text.lines(), sign).map_err(|err| at_path(err, path))
}

fn read_output(path: &Path) -> Result<String, ParseError> {
    fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn at_path(err: ParseError, path: &Path) -> ParseError {
    match err {
        ParseError::NoLines => ParseError::EmptyFile {
            path: path.display().to_string(),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_numeric_token_strips_decoration() {
        assert_eq!(numeric_token("0.42", SignHandling::Discard).expect("parse"), 0.42);
        assert_eq!(numeric_token("1.5kg", SignHandling::Discard).expect("parse"), 1.5);
    }

    #[test]
    fn test_numeric_token_drops_sign_by_default() {
        // Legacy quirk: negatives parse as their absolute value.
        assert_eq!(numeric_token("-0.25", SignHandling::Discard).expect("parse"), 0.25);
    }

    #[test]
    fn test_numeric_token_preserve_sign() {
        assert_eq!(numeric_token("-0.25", SignHandling::Preserve).expect("parse"), -0.25);
        assert_eq!(numeric_token("0.25", SignHandling::Preserve).expect("parse"), 0.25);
    }

    #[test]
    fn test_numeric_token_rejects_non_numeric() {
        let err = numeric_token("label", SignHandling::Discard).expect_err("no digits");
        assert!(matches!(err, ParseError::InvalidToken { .. }));

        let err = numeric_token("1.2.3", SignHandling::Discard).expect_err("two dots");
        assert!(matches!(err, ParseError::InvalidToken { .. }));
    }

    #[test]
    fn test_parse_weight_lines_leading_field() {
        let lines = ["0.5 feature_a", "-0.25 feature_b", "1.0 feature_c"];
        let weights = parse_weight_lines(lines, SignHandling::Discard).expect("parse");
        assert_eq!(weights, vec![0.5, 0.25, 1.0]);
    }

    #[test]
    fn test_parse_weight_lines_preserve_sign() {
        let lines = ["0.5 feature_a", "-0.25 feature_b", "1.0 feature_c"];
        let weights = parse_weight_lines(lines, SignHandling::Preserve).expect("parse");
        assert_eq!(weights, vec![0.5, -0.25, 1.0]);
    }

    #[test]
    fn test_parse_weight_lines_empty_is_error() {
        let err =
            parse_weight_lines(std::iter::empty::<&str>(), SignHandling::Discard).expect_err("empty");
        assert!(matches!(err, ParseError::NoLines));
    }

    #[test]
    fn test_parse_predictions_label_score_pairs() {
        let parsed =
            parse_prediction_lines(["1:0.2,2:0.8"], SignHandling::Discard).expect("parse");
        assert_eq!(parsed, ParsedSequence::Rows(vec![vec![0.2, 0.8]]));
    }

    #[test]
    fn test_parse_predictions_comma_row() {
        let parsed = parse_prediction_lines(["0.3,0.7"], SignHandling::Discard).expect("parse");
        assert_eq!(parsed, ParsedSequence::Rows(vec![vec![0.3, 0.7]]));
    }

    #[test]
    fn test_parse_predictions_scalar() {
        let parsed = parse_prediction_lines(["0.42"], SignHandling::Discard).expect("parse");
        assert_eq!(parsed, ParsedSequence::Scalars(vec![0.42]));
    }

    #[test]
    fn test_parse_predictions_drops_blank_lines() {
        let parsed = parse_prediction_lines(["", "0.1", "  ", "0.9"], SignHandling::Discard)
            .expect("parse");
        assert_eq!(parsed, ParsedSequence::Scalars(vec![0.1, 0.9]));
    }

    #[test]
    fn test_parse_predictions_all_blank_is_error() {
        let err =
            parse_prediction_lines(["", "  "], SignHandling::Discard).expect_err("all blank");
        assert!(matches!(err, ParseError::NoLines));
    }

    #[test]
    fn test_parse_predictions_pair_without_colon_is_error() {
        // Format detected from the first line; a later malformed pair fails hard.
        let err = parse_prediction_lines(["1:0.2,2:0.8", "0.5,0.5"], SignHandling::Discard)
            .expect_err("malformed pair");
        assert!(matches!(err, ParseError::InvalidToken { .. }));
    }

    #[test]
    fn test_flatten_scalars() {
        let parsed = ParsedSequence::Scalars(vec![0.1, 0.2]);
        assert_eq!(parsed.flatten().expect("flatten"), vec![0.1, 0.2]);
    }

    #[test]
    fn test_flatten_rows() {
        let parsed = ParsedSequence::Rows(vec![vec![0.1, 0.9], vec![0.4, 0.6]]);
        assert_eq!(parsed.flatten().expect("flatten"), vec![0.1, 0.9, 0.4, 0.6]);
    }

    #[test]
    fn test_flatten_ragged_rows_is_error() {
        let parsed = ParsedSequence::Rows(vec![vec![0.1, 0.9], vec![0.5]]);
        let err = parsed.flatten().expect_err("ragged");
        assert!(matches!(
            err,
            ParseError::RaggedRows {
                expected: 2,
                found: 1,
                row: 1,
            }
        ));
    }

    #[test]
    fn test_parse_weights_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "0.5 f_a").expect("write");
        writeln!(file, "-0.25 f_b").expect("write");
        writeln!(file, "1.0 f_c").expect("write");

        let weights = parse_weights_file(file.path(), SignHandling::Discard).expect("parse");
        assert_eq!(weights, vec![0.5, 0.25, 1.0]);
    }

    #[test]
    fn test_parse_weights_file_empty_names_path() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let err = parse_weights_file(file.path(), SignHandling::Discard).expect_err("empty");
        match err {
            ParseError::EmptyFile { path } => {
                assert!(path.contains(&file.path().file_name().unwrap().to_string_lossy().to_string()))
            }
            other => panic!("expected EmptyFile, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_predictions_file_unreadable_names_path() {
        let err = parse_predictions_file(Path::new("/nonexistent/preds.txt"), SignHandling::Discard)
            .expect_err("unreadable");
        match err {
            ParseError::Io { path, .. } => assert!(path.contains("preds.txt")),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
