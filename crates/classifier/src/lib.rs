//! Variable Star Classifier
//!
//! Trains a random forest on a feature table and reports held-out accuracy
//! and a confusion matrix.

mod encoder;
mod forest;
mod metrics;
mod plot;
mod split;
mod trainer;

pub use encoder::LabelEncoder;
pub use forest::{ForestModel, TrainingConfig};
pub use metrics::{accuracy, ConfusionMatrix};
pub use plot::render_confusion_matrix;
pub use split::{stratified_split, Split};
pub use trainer::{Trainer, TrainingReport};

use feature_table::TableError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during training, evaluation or persistence
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Feature table error: {0}")]
    Table(#[from] TableError),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Training failed: {0}")]
    TrainingFailed(String),
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Model serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Image rendering failed: {0}")]
    Image(#[from] image::ImageError),
}

impl ClassifierError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ClassifierError::Io { path, source }
    }
}

/// Create the parent directory of `path` if it has one
pub(crate) fn ensure_parent(path: &std::path::Path) -> Result<(), ClassifierError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(ClassifierError::io(parent))
        }
        _ => Ok(()),
    }
}
