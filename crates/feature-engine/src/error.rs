//! Record Error Types

use thiserror::Error;

/// Errors raised while parsing or validating a light-curve record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedRecordError {
    /// Required column absent from the header
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// `time` and `flux` differ in length
    #[error("Length mismatch: time has {time} values, flux has {flux}")]
    LengthMismatch { time: usize, flux: usize },

    /// No samples at all
    #[error("Record contains no samples")]
    Empty,

    /// Label column present but without a value
    #[error("Label column is empty")]
    EmptyLabel,

    /// A later row carries a different label than the first
    #[error("Inconsistent label at row {row}: expected {expected:?}, found {found:?}")]
    InconsistentLabel {
        row: usize,
        expected: String,
        found: String,
    },

    /// Non-numeric cell in a numeric column
    #[error("Invalid {column} value {value:?} at row {row}")]
    InvalidValue {
        column: &'static str,
        row: usize,
        value: String,
    },

    /// CSV content could not be read
    #[error("Unparseable record: {0}")]
    Unparseable(String),
}

impl From<csv::Error> for MalformedRecordError {
    fn from(err: csv::Error) -> Self {
        MalformedRecordError::Unparseable(err.to_string())
    }
}
