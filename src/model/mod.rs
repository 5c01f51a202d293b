//! Binary classifiers behind one capability: fit on scaled rows, then report
//! P(positive) for a single row.

mod logistic;
mod mlp;
mod scaler;

pub use logistic::LogisticRegression;
pub use mlp::MlpClassifier;
pub use scaler::StandardScaler;

use crate::config::{ClassifierConfig, ClassifierKind};
use ndarray::{ArrayView1, ArrayView2};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("expected {expected} targets, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("no training rows")]
    Empty,

    #[error("loss became non-finite after {epochs} epoch(s)")]
    Diverged { epochs: usize },
}

/// Untrained estimator. Fitting never mutates the estimator itself; each call
/// yields a new, immutable fitted model.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: &[u8],
        seed: u64,
    ) -> Result<Box<dyn FittedClassifier>, FitError>;
}

pub trait FittedClassifier: Send + Sync + fmt::Debug {
    /// Probability of the positive class, in [0, 1].
    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> f64;
}

/// Classifier selected by configuration.
pub fn from_config(config: &ClassifierConfig) -> Box<dyn Classifier> {
    match config.kind {
        ClassifierKind::Mlp => Box::new(MlpClassifier::new(config.mlp.clone())),
        ClassifierKind::Logistic => Box::new(LogisticRegression::new(config.logistic.clone())),
    }
}

/// Fraction of rows where thresholding at 0.5 matches the target.
pub fn accuracy(model: &dyn FittedClassifier, x: ArrayView2<'_, f64>, y: &[u8]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let correct = x
        .rows()
        .into_iter()
        .zip(y)
        .filter(|(row, t)| (model.predict_proba(row.view()) >= 0.5) == (**t == 1))
        .count();
    correct as f64 / y.len() as f64
}

/// Logistic function without overflow for large |z|.
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn check_shape(x: &ArrayView2<'_, f64>, y: &[u8]) -> Result<(), FitError> {
    if x.nrows() != y.len() {
        return Err(FitError::ShapeMismatch {
            expected: x.nrows(),
            got: y.len(),
        });
    }
    if y.is_empty() {
        return Err(FitError::Empty);
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_stable_and_symmetric() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(1000.0) <= 1.0 && sigmoid(1000.0) > 0.999);
        assert!(sigmoid(-1000.0) >= 0.0 && sigmoid(-1000.0) < 1e-3);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn config_selects_classifier() {
        let mut cfg = ClassifierConfig::default();
        assert_eq!(from_config(&cfg).name(), "mlp");
        cfg.kind = ClassifierKind::Logistic;
        assert_eq!(from_config(&cfg).name(), "logistic_regression");
    }
}
