//! Risk prediction: per-label probabilities bucketed into risk categories.

mod engine;
mod report;

pub use engine::{predict, LabelPrediction, PredictionResult, RiskBucket};
pub use report::{render_table, to_percent, RiskRecord};
