//! Disease risk ensemble: one independent binary classifier per disease over a
//! fixed patient feature schema, with probabilities bucketed into risk levels.
//!
//! Modular structure:
//! - [`features`] — Feature schema, label set, validated feature vectors
//! - [`dataset`] — CSV training data
//! - [`model`] — Scaler and classifiers (MLP, logistic regression)
//! - [`training`] — Stratified split and per-label training
//! - [`risk`] — Prediction, risk buckets, result records
//! - [`service`] — Published model state with atomic swap on retrain
//! - [`logging`] — Structured logging

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod risk;
pub mod service;
pub mod training;

pub use config::RiskConfig;
pub use dataset::Dataset;
pub use error::{DataError, PredictError, SchemaError};
pub use features::{Feature, FeatureVector, Label};
pub use logging::StructuredLogger;
pub use risk::{predict, PredictionResult, RiskBucket, RiskRecord};
pub use service::RiskService;
pub use training::{TrainedState, Trainer, TrainingReport};
