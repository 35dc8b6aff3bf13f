//! Light Curve Feature Engine
//!
//! Computes descriptive statistics and a Lomb-Scargle period estimate for
//! irregularly sampled light curves, one fixed-width feature row per object.

mod error;
mod features;
mod fft;
mod periodogram;
mod record;
mod statistics;

pub use error::MalformedRecordError;
pub use features::{
    ExtractorConfig, FeatureExtractor, FeatureRow, FEATURE_COLUMNS, PREDICTOR_DIMENSION,
};
pub use periodogram::{
    FrequencyGrid, GridParams, LombScargle, PeriodogramResult, FAST_MIN_FREQUENCIES, TIE_TOLERANCE,
};
pub use record::{LightCurveRecord, FLUX_COLUMN, LABEL_COLUMN, TIME_COLUMN};
pub use statistics::{count_peaks, percentile_sorted, FluxStatistics};
