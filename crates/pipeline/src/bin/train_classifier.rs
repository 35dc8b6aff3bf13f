//! Classifier training entry point

use anyhow::Context;
use pipeline::{init_logging, run_training, PipelineConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = PipelineConfig::load().context("Failed to load pipeline configuration")?;
    init_logging(&config.log_level)?;

    info!("=== Variable Star Classifier Training v{} ===", env!("CARGO_PKG_VERSION"));

    let report = run_training(&config)
        .with_context(|| format!("Training on {} failed", config.features_path.display()))?;

    println!("Accuracy: {:.4}", report.accuracy);
    println!("\nConfusion Matrix:");
    print!("{}", report.confusion);

    Ok(())
}
