//! Directory-to-Table Orchestration

use crate::table::FeatureTable;
use crate::TableError;
use feature_engine::{ExtractorConfig, FeatureExtractor};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension of light-curve input files (case-sensitive)
pub const INPUT_EXTENSION: &str = "csv";

/// Outcome of a successful build
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    /// Number of rows written
    pub rows: usize,
    /// Destination of the table
    pub output: PathBuf,
    /// Rows per label
    pub label_counts: BTreeMap<String, usize>,
}

/// Builds feature tables from directories of light curves
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    extractor: FeatureExtractor,
}

impl TableBuilder {
    /// Create a builder with the given extraction settings
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            extractor: FeatureExtractor::new(config),
        }
    }

    /// Regular `*.csv` files of `input_dir`, sorted by file name
    pub fn input_files(input_dir: &Path) -> Result<Vec<PathBuf>, TableError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(input_dir).map_err(TableError::io(input_dir))? {
            let path = entry.map_err(TableError::io(input_dir))?.path();
            if path.is_file() && path.extension() == Some(OsStr::new(INPUT_EXTENSION)) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Extract one row per input file, in file-name order.
    ///
    /// The first unreadable or malformed file aborts the whole collection.
    pub fn collect(&self, input_dir: &Path) -> Result<FeatureTable, TableError> {
        let files = Self::input_files(input_dir)?;
        info!(
            "Extracting features from {} files in {}",
            files.len(),
            input_dir.display()
        );

        let mut table = FeatureTable::new();
        for path in files {
            let bytes = fs::read(&path).map_err(TableError::io(&path))?;
            let row = self
                .extractor
                .extract_csv(bytes.as_slice())
                .map_err(|source| TableError::Record {
                    path: path.clone(),
                    source,
                })?;
            debug!("{} -> label={} period={:.4}", path.display(), row.label, row.period);
            table.push(row);
        }
        Ok(table)
    }

    /// Collect every row of `input_dir`, then write the table to `output_path`
    pub fn build(&self, input_dir: &Path, output_path: &Path) -> Result<TableSummary, TableError> {
        let table = self.collect(input_dir)?;
        table.write(output_path)?;

        let mut label_counts = BTreeMap::new();
        for row in table.rows() {
            *label_counts.entry(row.label.clone()).or_insert(0) += 1;
        }

        info!("Features saved to {} ({} rows)", output_path.display(), table.len());
        Ok(TableSummary {
            rows: table.len(),
            output: output_path.to_path_buf(),
            label_counts,
        })
    }
}

/// Build a feature table with default extraction settings
pub fn build_table(
    input_dir: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<TableSummary, TableError> {
    TableBuilder::default().build(input_dir.as_ref(), output_path.as_ref())
}
