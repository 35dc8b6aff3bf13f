//! Random Forest Model
//!
//! Thin wrapper around the smartcore random forest that carries the class
//! names and feature order alongside the fitted trees.

use crate::encoder::LabelEncoder;
use crate::{ensure_parent, ClassifierError};
use feature_engine::{FeatureRow, FEATURE_COLUMNS, PREDICTOR_DIMENSION};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Split and forest settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Seed for the split and the forest
    pub seed: u64,
    /// Number of trees
    pub n_trees: u16,
    /// Depth limit per tree; unbounded when absent
    pub max_depth: Option<u16>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.3,
            seed: 42,
            n_trees: 300,
            max_depth: None,
        }
    }
}

/// Fitted forest plus the metadata needed to use it on new feature rows
#[derive(Debug, Serialize, Deserialize)]
pub struct ForestModel {
    /// Class names, indexed by code
    pub encoder: LabelEncoder,
    /// Predictor column names in matrix order
    pub feature_names: Vec<String>,
    /// Settings the forest was trained with
    pub params: TrainingConfig,
    forest: Forest,
}

impl ForestModel {
    /// Fit a forest on predictor rows and encoded labels
    pub fn fit(
        features: Vec<Vec<f64>>,
        labels: Vec<u32>,
        encoder: LabelEncoder,
        params: &TrainingConfig,
    ) -> Result<Self, ClassifierError> {
        if features.is_empty() {
            return Err(ClassifierError::InvalidData("Empty training set".to_string()));
        }

        let x = DenseMatrix::from_2d_vec(&features).map_err(|e| {
            ClassifierError::InvalidData(format!("Failed to create feature matrix: {:?}", e))
        })?;

        let mut parameters = RandomForestClassifierParameters::default()
            .with_n_trees(params.n_trees as _)
            .with_seed(params.seed as _);
        if let Some(depth) = params.max_depth {
            parameters = parameters.with_max_depth(depth as _);
        }

        info!(
            "Training random forest: {} trees, {} samples, {} features",
            params.n_trees,
            features.len(),
            PREDICTOR_DIMENSION
        );

        let forest = RandomForestClassifier::fit(&x, &labels, parameters)
            .map_err(|e| ClassifierError::TrainingFailed(format!("{:?}", e)))?;

        Ok(Self {
            encoder,
            feature_names: FEATURE_COLUMNS[..PREDICTOR_DIMENSION]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            params: params.clone(),
            forest,
        })
    }

    /// Predict class codes for predictor rows
    pub fn predict(&self, features: Vec<Vec<f64>>) -> Result<Vec<u32>, ClassifierError> {
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let x = DenseMatrix::from_2d_vec(&features).map_err(|e| {
            ClassifierError::PredictionFailed(format!("Failed to create feature matrix: {:?}", e))
        })?;

        self.forest
            .predict(&x)
            .map_err(|e| ClassifierError::PredictionFailed(format!("{:?}", e)))
    }

    /// Predict class names for feature rows
    pub fn predict_rows(&self, rows: &[FeatureRow]) -> Result<Vec<String>, ClassifierError> {
        let codes = self.predict(rows.iter().map(|r| r.predictors().to_vec()).collect())?;
        codes
            .into_iter()
            .map(|code| {
                self.encoder.decode(code).map(str::to_string).ok_or_else(|| {
                    ClassifierError::PredictionFailed(format!("Unknown class code {}", code))
                })
            })
            .collect()
    }

    /// Class names in code order
    pub fn classes(&self) -> &[String] {
        self.encoder.classes()
    }

    /// Persist as JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        ensure_parent(path)?;
        let file = File::create(path).map_err(ClassifierError::io(path))?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        info!("Model saved to {}", path.display());
        Ok(())
    }

    /// Load a model written by [`ForestModel::save`]
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let file = File::open(path).map_err(ClassifierError::io(path))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
