//! Training Orchestration

use crate::encoder::LabelEncoder;
use crate::forest::{ForestModel, TrainingConfig};
use crate::metrics::{accuracy, ConfusionMatrix};
use crate::split::stratified_split;
use crate::ClassifierError;
use feature_engine::FeatureRow;
use feature_table::FeatureTable;
use std::path::Path;
use tracing::{debug, info};

/// Held-out evaluation of a freshly trained model
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Fraction of correctly classified test rows
    pub accuracy: f64,
    /// Test-partition confusion matrix in class-code order
    pub confusion: ConfusionMatrix,
    pub n_train: usize,
    pub n_test: usize,
}

/// Splits a feature table, fits a forest and evaluates it
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    /// Create a trainer
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Read the table at `path` and train on it
    pub fn train_from_path(&self, path: &Path) -> Result<(ForestModel, TrainingReport), ClassifierError> {
        let table = FeatureTable::read(path)?;
        info!("Loaded {} feature rows from {}", table.len(), path.display());
        self.train(&table)
    }

    /// Stratified split, fit on the training rows, evaluate on the rest
    pub fn train(&self, table: &FeatureTable) -> Result<(ForestModel, TrainingReport), ClassifierError> {
        let rows = table.rows();
        if rows.is_empty() {
            return Err(ClassifierError::InvalidData("Feature table is empty".to_string()));
        }
        check_finite(rows)?;

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        let encoder = LabelEncoder::fit(&labels);
        let y = encoder.transform(&labels)?;
        info!("Classes: {:?}", encoder.classes());

        let split = stratified_split(&y, encoder.n_classes(), self.config.test_size, self.config.seed)?;
        debug!("Split: {} train, {} test", split.train.len(), split.test.len());

        let gather_x = |idx: &[usize]| -> Vec<Vec<f64>> {
            idx.iter().map(|&i| rows[i].predictors().to_vec()).collect()
        };
        let gather_y = |idx: &[usize]| -> Vec<u32> { idx.iter().map(|&i| y[i]).collect() };

        let y_test = gather_y(&split.test);
        let model = ForestModel::fit(
            gather_x(&split.train),
            gather_y(&split.train),
            encoder.clone(),
            &self.config,
        )?;
        let y_pred = model.predict(gather_x(&split.test))?;

        let confusion = ConfusionMatrix::from_predictions(&y_test, &y_pred, encoder.classes().to_vec());
        let report = TrainingReport {
            accuracy: accuracy(&y_test, &y_pred),
            confusion,
            n_train: split.train.len(),
            n_test: split.test.len(),
        };
        info!("Accuracy: {:.4}", report.accuracy);

        Ok((model, report))
    }
}

fn check_finite(rows: &[FeatureRow]) -> Result<(), ClassifierError> {
    for (i, row) in rows.iter().enumerate() {
        if row.predictors().iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::InvalidData(format!(
                "Row {} ({}) has a missing or non-finite feature",
                i + 1,
                row.label
            )));
        }
    }
    Ok(())
}
