//! Light Curve Pipeline
//!
//! Shared wiring for the `extract-features` and `train-classifier` binaries.

use classifier::{render_confusion_matrix, ClassifierError, Trainer, TrainingReport};
use feature_table::{TableBuilder, TableError, TableSummary};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;

pub use config::{PipelineConfig, CONFIG_NAME, ENV_PREFIX};

/// Initialize logging; `RUST_LOG` wins over `default_level`
pub fn init_logging(default_level: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

/// Turn every light curve in the data directory into one feature table
pub fn run_extraction(config: &PipelineConfig) -> Result<TableSummary, TableError> {
    info!("Extracting features from {}", config.data_dir.display());
    let summary = TableBuilder::new(&config.extractor).build(&config.data_dir, &config.features_path)?;
    for (label, count) in &summary.label_counts {
        info!("  {}: {}", label, count);
    }
    Ok(summary)
}

/// Train on the feature table, then write the model and the confusion matrix image
pub fn run_training(config: &PipelineConfig) -> Result<TrainingReport, ClassifierError> {
    let trainer = Trainer::new(config.training.clone());
    let (model, report) = trainer.train_from_path(&config.features_path)?;

    info!(
        "Held-out accuracy {:.4} ({} train / {} test rows)",
        report.accuracy, report.n_train, report.n_test
    );
    debug!("Confusion matrix:\n{}", report.confusion);

    render_confusion_matrix(&report.confusion, &config.confusion_matrix_path)?;
    model.save(&config.model_path)?;

    Ok(report)
}
