//! Feature extraction entry point

use anyhow::Context;
use pipeline::{init_logging, run_extraction, PipelineConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = PipelineConfig::load().context("Failed to load pipeline configuration")?;
    init_logging(&config.log_level)?;

    info!("=== Light Curve Feature Extraction v{} ===", env!("CARGO_PKG_VERSION"));

    run_extraction(&config).with_context(|| {
        format!(
            "Failed to build {} from {}",
            config.features_path.display(),
            config.data_dir.display()
        )
    })?;

    Ok(())
}
