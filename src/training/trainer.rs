//! Builds a complete [`TrainedState`] from a dataset. Labels are trained
//! independently; any label failing aborts the whole run.

use super::split::stratified_split;
use crate::config::{RiskConfig, TrainingConfig};
use crate::dataset::Dataset;
use crate::error::DataError;
use crate::features::{FeatureVector, Label, FEATURE_COUNT};
use crate::model::{self, Classifier, FittedClassifier, StandardScaler};
use chrono::{DateTime, Utc};
use ndarray::{ArrayView1, Axis};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, info_span};
use uuid::Uuid;

/// One label's fitted scaler + classifier pair.
#[derive(Debug)]
pub struct LabelModel {
    scaler: StandardScaler,
    classifier: Box<dyn FittedClassifier>,
}

impl LabelModel {
    pub fn new(scaler: StandardScaler, classifier: Box<dyn FittedClassifier>) -> Self {
        Self { scaler, classifier }
    }

    /// Scale with this label's scaler, then ask its classifier.
    pub fn predict_proba(&self, features: &FeatureVector) -> f64 {
        let scaled = self
            .scaler
            .transform_row(ArrayView1::from(features.as_slice()));
        self.classifier.predict_proba(scaled.view()).clamp(0.0, 1.0)
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }
}

/// Immutable output of one training run, covering every label.
#[derive(Debug)]
pub struct TrainedState {
    version: Uuid,
    trained_at: DateTime<Utc>,
    models: BTreeMap<Label, LabelModel>,
}

impl TrainedState {
    /// Assemble a state from externally built models. `None` unless every label is covered.
    pub fn from_models(models: BTreeMap<Label, LabelModel>) -> Option<Self> {
        if Label::ALL.iter().any(|l| !models.contains_key(l)) {
            return None;
        }
        Some(Self {
            version: Uuid::new_v4(),
            trained_at: Utc::now(),
            models,
        })
    }

    pub fn version(&self) -> Uuid {
        self.version
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Models in label order.
    pub fn models(&self) -> impl Iterator<Item = (Label, &LabelModel)> {
        self.models.iter().map(|(l, m)| (*l, m))
    }

    pub fn model(&self, label: Label) -> Option<&LabelModel> {
        self.models.get(&label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelReport {
    pub label: Label,
    pub train_rows: usize,
    pub test_rows: usize,
    pub positives: usize,
    /// Accuracy on the held-out rows, thresholded at 0.5
    pub test_accuracy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub version: Uuid,
    pub classifier: &'static str,
    pub labels: Vec<LabelReport>,
}

pub struct Trainer {
    classifier: Box<dyn Classifier>,
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(classifier: Box<dyn Classifier>, config: TrainingConfig) -> Self {
        Self { classifier, config }
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(
            model::from_config(&config.classifier),
            config.training.clone(),
        )
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn train(&self, dataset: &Dataset) -> Result<(TrainedState, TrainingReport), DataError> {
        if dataset.is_empty() {
            return Err(DataError::Empty);
        }
        let x = dataset.features();
        debug_assert_eq!(x.ncols(), FEATURE_COUNT);
        let seed = self.config.seed;

        let mut models = BTreeMap::new();
        let mut reports = Vec::with_capacity(Label::ALL.len());

        for label in Label::ALL {
            let _span = info_span!("train_label", label = %label).entered();
            let y = dataset.outcomes(label);
            let split = stratified_split(y, self.config.test_fraction, seed).map_err(|e| {
                DataError::Unstratifiable {
                    label,
                    class: e.class,
                    count: e.count,
                }
            })?;

            let x_train = x.select(Axis(0), &split.train);
            let y_train: Vec<u8> = split.train.iter().map(|&i| y[i]).collect();
            let x_test = x.select(Axis(0), &split.test);
            let y_test: Vec<u8> = split.test.iter().map(|&i| y[i]).collect();

            let scaler = StandardScaler::fit(x_train.view());
            let classifier = self
                .classifier
                .fit(scaler.transform(x_train.view()).view(), &y_train, seed)
                .map_err(|e| DataError::Training {
                    label,
                    reason: e.to_string(),
                })?;
            let test_accuracy = model::accuracy(
                classifier.as_ref(),
                scaler.transform(x_test.view()).view(),
                &y_test,
            );

            let (_, positives) = dataset.class_counts(label);
            info!(
                train_rows = split.train.len(),
                test_rows = split.test.len(),
                positives,
                accuracy = test_accuracy,
                "label model trained"
            );
            reports.push(LabelReport {
                label,
                train_rows: split.train.len(),
                test_rows: split.test.len(),
                positives,
                test_accuracy,
            });
            models.insert(label, LabelModel::new(scaler, classifier));
        }

        let state = TrainedState {
            version: Uuid::new_v4(),
            trained_at: Utc::now(),
            models,
        };
        let report = TrainingReport {
            version: state.version,
            classifier: self.classifier.name(),
            labels: reports,
        };
        Ok((state, report))
    }
}
