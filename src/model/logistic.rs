//! L2-regularised logistic regression trained with full-batch gradient descent.

use super::{check_shape, sigmoid, Classifier, FitError, FittedClassifier};
use crate::config::LogisticConfig;
use ndarray::{Array1, ArrayView1, ArrayView2};

pub struct LogisticRegression {
    config: LogisticConfig,
}

impl LogisticRegression {
    pub fn new(config: LogisticConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Clone)]
struct FittedLogistic {
    weights: Array1<f64>,
    bias: f64,
}

impl FittedClassifier for FittedLogistic {
    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> f64 {
        sigmoid(row.dot(&self.weights) + self.bias)
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    /// Zero-initialised, so the seed has no effect.
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: &[u8],
        _seed: u64,
    ) -> Result<Box<dyn FittedClassifier>, FitError> {
        check_shape(&x, y)?;
        let n = x.nrows() as f64;
        let targets: Array1<f64> = y.iter().map(|&t| f64::from(t)).collect();
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;

        for iter in 0..self.config.iterations {
            let probs = (x.dot(&weights) + bias).mapv(sigmoid);
            let err = probs - &targets;
            let grad_w = x.t().dot(&err) / n + &weights * self.config.l2;
            let grad_b = err.sum() / n;
            weights.scaled_add(-self.config.learning_rate, &grad_w);
            bias -= self.config.learning_rate * grad_b;

            if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
                return Err(FitError::Diverged { epochs: iter + 1 });
            }
        }

        Ok(Box::new(FittedLogistic { weights, bias }))
    }
}
