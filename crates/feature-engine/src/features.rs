//! Feature Row Assembly

use crate::error::MalformedRecordError;
use crate::periodogram::{GridParams, LombScargle};
use crate::record::LightCurveRecord;
use crate::statistics::FluxStatistics;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::debug;

/// Table columns in output order
pub const FEATURE_COLUMNS: [&str; 8] = [
    "mean_flux",
    "std_flux",
    "amplitude",
    "p95",
    "p5",
    "period",
    "num_peaks",
    "label",
];

/// Number of numeric predictors (every column except `label`)
pub const PREDICTOR_DIMENSION: usize = 7;

/// Features of one light curve; field order is the table column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub mean_flux: f64,
    pub std_flux: f64,
    pub amplitude: f64,
    pub p95: f64,
    pub p5: f64,
    pub period: f64,
    pub num_peaks: usize,
    pub label: String,
}

impl FeatureRow {
    /// Numeric predictors in column order
    pub fn predictors(&self) -> [f64; PREDICTOR_DIMENSION] {
        [
            self.mean_flux,
            self.std_flux,
            self.amplitude,
            self.p95,
            self.p5,
            self.period,
            self.num_peaks as f64,
        ]
    }
}

/// Extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Periodogram grid density
    pub samples_per_peak: f64,
    /// Periodogram upper bound as a multiple of the average Nyquist frequency
    pub nyquist_factor: f64,
    /// Reject files whose label column is not constant
    pub strict_labels: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let grid = GridParams::default();
        Self {
            samples_per_peak: grid.samples_per_peak,
            nyquist_factor: grid.nyquist_factor,
            strict_labels: true,
        }
    }
}

/// Turns light-curve records into feature rows
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    periodogram: LombScargle,
    strict_labels: bool,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            periodogram: LombScargle::new(GridParams {
                samples_per_peak: config.samples_per_peak,
                nyquist_factor: config.nyquist_factor,
            }),
            strict_labels: config.strict_labels,
        }
    }

    /// Compute the feature row of a record
    pub fn extract(&self, record: &LightCurveRecord) -> Result<FeatureRow, MalformedRecordError> {
        record.validate()?;

        let stats = FluxStatistics::compute(&record.flux);
        let spectrum = self.periodogram.analyze(&record.time, &record.flux);

        debug!(
            "Extracted {} samples: mean={:.4}, std={:.4}, period={:.4}, peaks={}",
            record.len(),
            stats.mean,
            stats.std_dev,
            spectrum.best_period,
            stats.num_peaks
        );

        Ok(FeatureRow {
            mean_flux: stats.mean,
            std_flux: stats.std_dev,
            amplitude: stats.amplitude,
            p95: stats.p95,
            p5: stats.p5,
            period: spectrum.best_period,
            num_peaks: stats.num_peaks,
            label: record.label.clone(),
        })
    }

    /// Parse a CSV light curve and compute its feature row
    pub fn extract_csv<R: Read>(&self, reader: R) -> Result<FeatureRow, MalformedRecordError> {
        let record = LightCurveRecord::from_csv(reader, self.strict_labels)?;
        self.extract(&record)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn alternating_record() -> LightCurveRecord {
        LightCurveRecord::new(
            (0..8).map(f64::from).collect(),
            vec![1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0],
            "RR_LYR",
        )
    }

    #[test]
    fn test_alternating_scenario() {
        let extractor = FeatureExtractor::default();
        let row = extractor.extract(&alternating_record()).unwrap();

        assert_eq!(row.amplitude, 4.0);
        assert_eq!(row.mean_flux, 3.0);
        assert_eq!(row.std_flux, 2.0);
        assert_eq!(row.num_peaks, 3);
        assert!((row.period - 2.0).abs() < 1e-6, "period {}", row.period);
        assert_eq!(row.label, "RR_LYR");
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let extractor = FeatureExtractor::default();
        let record = LightCurveRecord::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![1.0, 2.0, 3.0, 4.0],
            "EB",
        );
        assert_eq!(
            extractor.extract(&record),
            Err(MalformedRecordError::LengthMismatch { time: 5, flux: 4 })
        );
    }

    #[test]
    fn test_empty_label_rejected() {
        let extractor = FeatureExtractor::default();
        let record = LightCurveRecord::new(vec![0.0, 1.0], vec![1.0, 2.0], "  ");
        assert_eq!(extractor.extract(&record), Err(MalformedRecordError::EmptyLabel));
    }

    #[test]
    fn test_constant_flux_is_valid() {
        let extractor = FeatureExtractor::default();
        let record = LightCurveRecord::new(vec![0.0, 1.0, 2.0, 3.0], vec![7.0; 4], "CONST");
        let row = extractor.extract(&record).unwrap();
        assert_eq!(row.std_flux, 0.0);
        assert_eq!(row.amplitude, 0.0);
        assert_eq!(row.p5, 7.0);
        assert_eq!(row.p95, 7.0);
        assert_eq!(row.num_peaks, 0);
        assert!(row.period.is_finite());
    }

    #[test]
    fn test_extract_csv() {
        let csv = "time,flux,label\n0,1,RR_LYR\n1,5,RR_LYR\n2,1,RR_LYR\n3,5,RR_LYR\n\
                   4,1,RR_LYR\n5,5,RR_LYR\n6,1,RR_LYR\n7,5,RR_LYR\n";
        let extractor = FeatureExtractor::default();
        let row = extractor.extract_csv(csv.as_bytes()).unwrap();
        assert_eq!(row, extractor.extract(&alternating_record()).unwrap());
    }

    #[test]
    fn test_extract_csv_blank_first_label() {
        let csv = "time,flux,label\n0,1,\n1,2,EB\n2,1,EB\n";
        let extractor = FeatureExtractor::default();
        assert_eq!(
            extractor.extract_csv(csv.as_bytes()),
            Err(MalformedRecordError::EmptyLabel)
        );
    }

    #[test]
    fn test_strict_labels_from_config() {
        let csv = "time,flux,label\n0,1,EB\n1,2,RR_LYR\n2,1,EB\n";
        let strict = FeatureExtractor::new(&ExtractorConfig::default());
        assert!(strict.extract_csv(csv.as_bytes()).is_err());

        let lenient = FeatureExtractor::new(&ExtractorConfig {
            strict_labels: false,
            ..Default::default()
        });
        assert_eq!(lenient.extract_csv(csv.as_bytes()).unwrap().label, "EB");
    }

    #[test]
    fn test_predictors_order() {
        let row = FeatureRow {
            mean_flux: 1.0,
            std_flux: 2.0,
            amplitude: 3.0,
            p95: 4.0,
            p5: 5.0,
            period: 6.0,
            num_peaks: 7,
            label: "EB".to_string(),
        };
        assert_eq!(row.predictors(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(FEATURE_COLUMNS.len(), PREDICTOR_DIMENSION + 1);
    }

    fn record_strategy() -> impl Strategy<Value = LightCurveRecord> {
        prop::collection::vec((0.01f64..2.0, -100.0f64..100.0), 2..60).prop_map(|samples| {
            let mut t = 0.0;
            let mut time = Vec::with_capacity(samples.len());
            let mut flux = Vec::with_capacity(samples.len());
            for (dt, f) in samples {
                t += dt;
                time.push(t);
                flux.push(f);
            }
            LightCurveRecord::new(time, flux, "EB")
        })
    }

    proptest! {
        #[test]
        fn extraction_is_deterministic(record in record_strategy()) {
            let extractor = FeatureExtractor::default();
            let a = extractor.extract(&record).unwrap();
            let b = extractor.extract(&record).unwrap();
            prop_assert_eq!(a.mean_flux.to_bits(), b.mean_flux.to_bits());
            prop_assert_eq!(a.std_flux.to_bits(), b.std_flux.to_bits());
            prop_assert_eq!(a.p95.to_bits(), b.p95.to_bits());
            prop_assert_eq!(a.p5.to_bits(), b.p5.to_bits());
            prop_assert_eq!(a.period.to_bits(), b.period.to_bits());
            prop_assert_eq!(a.num_peaks, b.num_peaks);
        }

        #[test]
        fn period_is_positive(record in record_strategy()) {
            let row = FeatureExtractor::default().extract(&record).unwrap();
            prop_assert!(row.period > 0.0);
        }
    }
}
