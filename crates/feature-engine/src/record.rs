//! Light Curve Records

use crate::error::MalformedRecordError;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Header name of the timestamp column
pub const TIME_COLUMN: &str = "time";
/// Header name of the brightness column
pub const FLUX_COLUMN: &str = "flux";
/// Header name of the class label column
pub const LABEL_COLUMN: &str = "label";

/// One object's light curve as read from a single input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurveRecord {
    /// Sample timestamps, irregular spacing allowed
    pub time: Vec<f64>,
    /// Brightness per timestamp
    pub flux: Vec<f64>,
    /// Variable-star class of the object
    pub label: String,
}

impl LightCurveRecord {
    /// Create a record from already-parsed columns
    pub fn new(time: Vec<f64>, flux: Vec<f64>, label: impl Into<String>) -> Self {
        Self {
            time,
            flux,
            label: label.into(),
        }
    }

    /// Parse a CSV document with `time`, `flux` and `label` columns.
    ///
    /// Extra columns are ignored and column order is free. Empty cells count
    /// as missing, so a gap in one numeric column surfaces as a length
    /// mismatch. The label is taken from the first data row and must not be
    /// blank. With `strict_labels` every later label cell, blank ones
    /// included, must equal it; without it later cells are ignored.
    pub fn from_csv<R: Read>(reader: R, strict_labels: bool) -> Result<Self, MalformedRecordError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(MalformedRecordError::MissingColumn(name))
        };
        let time_idx = column(TIME_COLUMN)?;
        let flux_idx = column(FLUX_COLUMN)?;
        let label_idx = column(LABEL_COLUMN)?;

        let mut time = Vec::new();
        let mut flux = Vec::new();
        let mut label: Option<String> = None;

        for (i, result) in reader.records().enumerate() {
            let row = i + 1;
            let record = result?;

            if let Some(t) = parse_cell(&record, time_idx, TIME_COLUMN, row)? {
                time.push(t);
            }
            if let Some(f) = parse_cell(&record, flux_idx, FLUX_COLUMN, row)? {
                flux.push(f);
            }

            let value = record.get(label_idx).unwrap_or("");
            match &label {
                None if value.is_empty() => return Err(MalformedRecordError::EmptyLabel),
                None => label = Some(value.to_string()),
                Some(expected) if strict_labels && expected != value => {
                    return Err(MalformedRecordError::InconsistentLabel {
                        row,
                        expected: expected.clone(),
                        found: value.to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        let record = Self::new(time, flux, label.unwrap_or_default());
        record.validate()?;
        Ok(record)
    }

    /// Check the structural invariants the extractor relies on
    pub fn validate(&self) -> Result<(), MalformedRecordError> {
        if self.time.len() != self.flux.len() {
            return Err(MalformedRecordError::LengthMismatch {
                time: self.time.len(),
                flux: self.flux.len(),
            });
        }
        if self.time.is_empty() {
            return Err(MalformedRecordError::Empty);
        }
        if self.label.trim().is_empty() {
            return Err(MalformedRecordError::EmptyLabel);
        }
        Ok(())
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.flux.len()
    }

    /// Whether the record holds no samples
    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }
}

fn parse_cell(
    record: &csv::StringRecord,
    index: usize,
    column: &'static str,
    row: usize,
) -> Result<Option<f64>, MalformedRecordError> {
    match record.get(index) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| MalformedRecordError::InvalidValue {
                column,
                row,
                value: raw.to_string(),
            }),
    }
}
