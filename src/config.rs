//! Predictor configuration. Every section has defaults matching the reference
//! training setup (80/20 stratified split, seed 42, 64x32 MLP).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Header-labelled CSV with feature and `has_<label>` outcome columns
    pub dataset_path: PathBuf,
    /// Train/test split parameters
    pub training: TrainingConfig,
    /// Which classifier backs every label, and its hyperparameters
    pub classifier: ClassifierConfig,
    /// CLI output format
    pub output: OutputFormat,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of each class held out for evaluation (0.0–1.0, exclusive)
    pub test_fraction: f64,
    /// Seed for the split and for classifier initialisation
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Mlp,
    Logistic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub kind: ClassifierKind,
    pub mlp: MlpConfig,
    pub logistic: LogisticConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MlpConfig {
    /// Hidden layer widths, input side first
    pub hidden_layers: Vec<usize>,
    /// Adam step size
    pub learning_rate: f64,
    /// L2 penalty
    pub alpha: f64,
    /// Mini-batch size (clamped to the number of training rows)
    pub batch_size: usize,
    pub max_epochs: usize,
    /// Hold out part of the training rows and stop when validation accuracy stalls
    pub early_stopping: bool,
    pub validation_fraction: f64,
    /// Epochs without improvement before stopping
    pub patience: usize,
    /// Minimum validation improvement that resets patience
    pub tol: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    pub learning_rate: f64,
    pub iterations: usize,
    /// L2 penalty
    pub l2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One JSON array of risk records
    Json,
    /// Console table sorted by probability, highest first
    Table,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("health_risk_dataset.csv"),
            training: TrainingConfig::default(),
            classifier: ClassifierConfig::default(),
            output: OutputFormat::Json,
            log: LogConfig::default(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::Mlp,
            mlp: MlpConfig::default(),
            logistic: LogisticConfig::default(),
        }
    }
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![64, 32],
            learning_rate: 1e-3,
            alpha: 1e-4,
            batch_size: 200,
            max_epochs: 300,
            early_stopping: true,
            validation_fraction: 0.1,
            patience: 10,
            tol: 1e-4,
        }
    }
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            iterations: 1000,
            l2: 1e-4,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl RiskConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<RiskConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
