use std::ops::Range;

use thiserror::Error;

use crate::filter::report::FilterReport;

pub type Result<T> = std::result::Result<T, SamfiltError>;

// Problems with a single alignment line. These never abort a run unless strict mode is on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    #[error("record has {found} fields, expected at least {expected}")]
    MissingField { expected: usize, found: usize },

    #[error("could not parse flag field \"{0}\" as an integer")]
    InvalidFlag(String),

    #[error("could not parse alignment score from tag \"{0}\"")]
    InvalidScore(String),

    #[error("could not parse operation length in CIGAR token \"{0}\"")]
    InvalidCigarLength(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required option: {0}")]
    ConfigMissing(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("could not read config file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Unparseable {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("record {index} could not be evaluated: {source}; records left unevaluated: {}", format_ranges(unevaluated))]
    WorkerFailed {
        index: usize,
        source: RecordError,
        unevaluated: Vec<Range<usize>>,
    },

    #[error("evaluation cancelled after {} records; records left unevaluated: {}", partial.evaluated, format_ranges(unevaluated))]
    Cancelled {
        partial: Box<FilterReport>,
        kept: Vec<usize>,
        unevaluated: Vec<Range<usize>>,
    },

    #[error("could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

// Renders record index ranges as "0-99, 200-249", inclusive at both ends
fn format_ranges(ranges: &[Range<usize>]) -> String {
    ranges
        .iter()
        .map(|r| format!("{}-{}", r.start, r.end - 1))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum SamfiltError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        source: niffler::Error,
    },

    #[error("could not write report {path}: {source}")]
    Report { path: String, source: csv::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
}

#[cfg(test)]
mod tests {
    use super::{EvaluateError, RecordError};

    #[test]
    fn worker_failure_names_ranges() {
        let error = EvaluateError::WorkerFailed {
            index: 7,
            source: RecordError::InvalidFlag(String::from("x")),
            unevaluated: vec![7..10, 20..40],
        };

        assert_eq!(
            error.to_string(),
            "record 7 could not be evaluated: could not parse flag field \"x\" as an integer; records left unevaluated: 7-9, 20-39"
        );
    }
}
