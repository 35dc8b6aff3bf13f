//! Feature Table Persistence

use crate::TableError;
use feature_engine::{FeatureRow, FEATURE_COLUMNS};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Ordered feature rows under the fixed column header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap rows, keeping their order
    pub fn from_rows(rows: Vec<FeatureRow>) -> Self {
        Self { rows }
    }

    /// Append a row
    pub fn push(&mut self, row: FeatureRow) {
        self.rows.push(row);
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FeatureRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in order
    pub fn header() -> &'static [&'static str] {
        &FEATURE_COLUMNS
    }

    /// Serialize header and rows as CSV. The header is written even when
    /// the table has no rows.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(FEATURE_COLUMNS)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the table to `path`, replacing any existing file.
    ///
    /// Content goes to a temporary file in the destination directory first and
    /// is renamed over `path` only once fully flushed; on error the temporary
    /// file is removed and `path` is left untouched.
    pub fn write(&self, path: &Path) -> Result<(), TableError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(TableError::io(dir))?;
        self.write_to(&mut tmp).map_err(TableError::csv(tmp.path()))?;
        tmp.as_file().sync_all().map_err(TableError::io(tmp.path()))?;
        tmp.persist(path)
            .map_err(|err| TableError::io(path)(err.error))?;

        debug!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Read a table previously written by [`FeatureTable::write`]
    pub fn read(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(TableError::io(path))?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers().map_err(TableError::csv(path))?;
        if !headers.iter().eq(FEATURE_COLUMNS.iter().copied()) {
            return Err(TableError::Schema {
                path: path.to_path_buf(),
                found: headers.iter().map(str::to_string).collect(),
            });
        }

        let rows = reader
            .deserialize()
            .collect::<Result<Vec<FeatureRow>, _>>()
            .map_err(TableError::csv(path))?;
        Ok(Self { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(label: &str, period: f64) -> FeatureRow {
        FeatureRow {
            mean_flux: 3.0,
            std_flux: 2.0,
            amplitude: 4.0,
            p95: 5.0,
            p5: 1.0,
            period,
            num_peaks: 3,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_header_written_first() {
        let table = FeatureTable::from_rows(vec![row("EB", 0.5)]);
        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("mean_flux,std_flux,amplitude,p95,p5,period,num_peaks,label")
        );
        assert_eq!(lines.next(), Some("3.0,2.0,4.0,5.0,1.0,0.5,3,EB"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_table_has_header() {
        let mut buf = Vec::new();
        FeatureTable::new().write_to(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "mean_flux,std_flux,amplitude,p95,p5,period,num_peaks,label\n"
        );
    }

    #[test]
    fn test_write_read_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("features.csv");
        let table = FeatureTable::from_rows(vec![
            row("EB", 0.731),
            row("RR_LYR", 2.0),
            row("CEPHEID", f64::INFINITY),
        ]);

        table.write(&path).unwrap();
        let loaded = FeatureTable::read(&path).unwrap();

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("features.csv");
        std::fs::write(&path, "stale content that is longer than the new table\n".repeat(50))
            .unwrap();

        FeatureTable::from_rows(vec![row("EB", 1.0)]).write(&path).unwrap();
        let loaded = FeatureTable::read(&path).unwrap();
        assert_eq!(loaded.len(), 1);

        // no temporary files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("features.csv");
        let err = FeatureTable::new().write(&path).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "time,flux,label\n0,1,EB\n").unwrap();
        let err = FeatureTable::read(&path).unwrap_err();
        assert!(matches!(err, TableError::Schema { .. }));
    }
}
