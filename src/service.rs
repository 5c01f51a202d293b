//! Holds the currently published trained state. Retraining builds a complete
//! new state before swapping it in; predictions never see a half-built state.

use crate::dataset::Dataset;
use crate::error::{DataError, PredictError};
use crate::features::FeatureVector;
use crate::risk::{self, PredictionResult};
use crate::training::{TrainedState, Trainer, TrainingReport};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

pub struct RiskService {
    trainer: Trainer,
    current: RwLock<Option<Arc<TrainedState>>>,
}

impl RiskService {
    pub fn new(trainer: Trainer) -> Self {
        Self {
            trainer,
            current: RwLock::new(None),
        }
    }

    /// Train on `dataset` and publish the result. On failure the previously
    /// published state, if any, stays in place.
    pub fn retrain(&self, dataset: &Dataset) -> Result<TrainingReport, DataError> {
        info!(
            rows = dataset.len(),
            classifier = self.trainer.classifier_name(),
            "training started"
        );
        match self.trainer.train(dataset) {
            Ok((state, report)) => {
                self.publish(state);
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "training failed; keeping current model state");
                Err(e)
            }
        }
    }

    /// Swap in a new state with a single assignment.
    pub fn publish(&self, state: TrainedState) -> Arc<TrainedState> {
        let state = Arc::new(state);
        let version = state.version();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&state));
        info!(model_version = %version, "model state published");
        state
    }

    pub fn current(&self) -> Option<Arc<TrainedState>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictError> {
        let state = self.current().ok_or(PredictError::UntrainedModel)?;
        Ok(risk::predict(features, &state))
    }

    /// Validate raw JSON input, then predict. Schema failures abort the whole call.
    pub fn predict_json(&self, input: &Value) -> Result<PredictionResult, PredictError> {
        let features = FeatureVector::from_json(input)?;
        self.predict(&features)
    }
}
