//! Runs every label's model over one feature vector and buckets the probabilities.

use crate::features::{FeatureVector, Label};
use crate::training::TrainedState;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Discrete risk category. Ranges are lower-inclusive, upper-exclusive, except
/// `VeryHigh` which also includes 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBucket {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskBucket {
    pub const MEDIUM_FROM: f64 = 0.3;
    pub const HIGH_FROM: f64 = 0.6;
    pub const VERY_HIGH_FROM: f64 = 0.8;

    pub fn from_probability(p: f64) -> Self {
        let p = p.clamp(0.0, 1.0);
        if p >= Self::VERY_HIGH_FROM {
            RiskBucket::VeryHigh
        } else if p >= Self::HIGH_FROM {
            RiskBucket::High
        } else if p >= Self::MEDIUM_FROM {
            RiskBucket::Medium
        } else {
            RiskBucket::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskBucket::Low => "low",
            RiskBucket::Medium => "medium",
            RiskBucket::High => "high",
            RiskBucket::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for a single label. `probability` is the raw classifier output in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPrediction {
    pub label: Label,
    pub probability: f64,
    pub bucket: RiskBucket,
}

/// One entry per label, in label order.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    model_version: Uuid,
    entries: Vec<LabelPrediction>,
}

impl PredictionResult {
    pub fn model_version(&self) -> Uuid {
        self.model_version
    }

    pub fn entries(&self) -> &[LabelPrediction] {
        &self.entries
    }

    pub fn get(&self, label: Label) -> Option<&LabelPrediction> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify one patient against a trained state. Pure; same inputs give
/// bit-identical output.
pub fn predict(features: &FeatureVector, state: &TrainedState) -> PredictionResult {
    let entries: Vec<LabelPrediction> = state
        .models()
        .map(|(label, model)| {
            let probability = model.predict_proba(features);
            LabelPrediction {
                label,
                probability,
                bucket: RiskBucket::from_probability(probability),
            }
        })
        .collect();
    debug!(model_version = %state.version(), labels = entries.len(), "prediction computed");
    PredictionResult {
        model_version: state.version(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        let cases = [
            (0.0, RiskBucket::Low),
            (0.2999, RiskBucket::Low),
            (0.3, RiskBucket::Medium),
            (0.5999, RiskBucket::Medium),
            (0.6, RiskBucket::High),
            (0.7999, RiskBucket::High),
            (0.8, RiskBucket::VeryHigh),
            (1.0, RiskBucket::VeryHigh),
        ];
        for (p, expected) in cases {
            assert_eq!(RiskBucket::from_probability(p), expected, "p = {}", p);
        }
    }

    #[test]
    fn buckets_are_monotonic() {
        let mut prev = RiskBucket::Low;
        for i in 0..=1000 {
            let b = RiskBucket::from_probability(i as f64 / 1000.0);
            assert!(b >= prev);
            prev = b;
        }
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(RiskBucket::from_probability(-0.5), RiskBucket::Low);
        assert_eq!(RiskBucket::from_probability(1.5), RiskBucket::VeryHigh);
    }

    #[test]
    fn serialises_snake_case() {
        assert_eq!(
            serde_json::to_string(&RiskBucket::VeryHigh).unwrap(),
            "\"very_high\""
        );
        assert_eq!(RiskBucket::Medium.to_string(), "medium");
    }
}
