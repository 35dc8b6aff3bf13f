//! Pipeline configuration

use classifier::TrainingConfig;
use config::{ConfigError, Environment, File, Source};
use feature_engine::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the optional configuration file in the working directory
pub const CONFIG_NAME: &str = "pipeline";

/// Prefix of configuration environment variables, e.g. `LCPIPE_DATA_DIR`
/// or `LCPIPE_TRAINING__N_TREES`
pub const ENV_PREFIX: &str = "LCPIPE";

/// Locations and settings shared by both entry points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory of per-object light-curve CSV files
    pub data_dir: PathBuf,
    /// Feature table written by extraction, read by training
    pub features_path: PathBuf,
    /// Trained model artifact
    pub model_path: PathBuf,
    /// Rendered confusion matrix
    pub confusion_matrix_path: PathBuf,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,

    pub extractor: ExtractorConfig,
    pub training: TrainingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            features_path: PathBuf::from("features.csv"),
            model_path: PathBuf::from("models/variable_star_classifier.json"),
            confusion_matrix_path: PathBuf::from("docs/confusion_matrix.png"),
            log_level: "info".to_string(),
            extractor: ExtractorConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults, overlaid by `pipeline.{toml,json,...}` when present, then
    /// by `LCPIPE_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(File::with_name(CONFIG_NAME).required(false))
    }

    /// Like [`PipelineConfig::load`] but from an explicit, required file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
