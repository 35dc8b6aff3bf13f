//! Feature Table Builder
//!
//! Runs the feature extractor over every light-curve file of a directory and
//! persists the rows as a single CSV table.

mod builder;
mod table;

pub use builder::{build_table, TableBuilder, TableSummary};
pub use table::FeatureTable;

use feature_engine::MalformedRecordError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors while building, writing or reading a feature table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed record {}: {source}", .path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: MalformedRecordError,
    },
    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Unexpected header in {}: {found:?}", .path.display())]
    Schema { path: PathBuf, found: Vec<String> },
}

impl TableError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| TableError::Io { path, source }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>) -> impl FnOnce(csv::Error) -> Self {
        let path = path.into();
        move |source| TableError::Csv { path, source }
    }
}
