//! Feed-forward network: ReLU hidden layers, one sigmoid output unit, binary
//! log-loss with L2 penalty, Adam over shuffled mini-batches.

use super::{check_shape, sigmoid, Classifier, FitError, FittedClassifier};
use crate::config::MlpConfig;
use crate::training::stratified_split;
use ndarray::{Array, Array1, Array2, ArrayView1, ArrayView2, Axis, Dimension, Zip};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const EPSILON: f64 = 1e-8;
const LOG_CLIP: f64 = 1e-12;

pub struct MlpClassifier {
    config: MlpConfig,
}

impl MlpClassifier {
    pub fn new(config: MlpConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Clone)]
struct Layer {
    w: Array2<f64>,
    b: Array1<f64>,
}

#[derive(Debug, Clone)]
struct FittedMlp {
    layers: Vec<Layer>,
}

impl FittedClassifier for FittedMlp {
    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> f64 {
        let last = self.layers.len() - 1;
        let mut a = row.to_owned();
        for (k, layer) in self.layers.iter().enumerate() {
            let z = a.dot(&layer.w) + &layer.b;
            a = if k == last { z.mapv(sigmoid) } else { z.mapv(relu) };
        }
        a[0]
    }
}

fn relu(z: f64) -> f64 {
    z.max(0.0)
}

/// Glorot-uniform weights and intercepts; the sigmoid output layer uses the
/// narrower bound.
fn init_layers(sizes: &[usize], rng: &mut StdRng) -> Vec<Layer> {
    let last = sizes.len() - 2;
    sizes
        .windows(2)
        .enumerate()
        .map(|(k, pair)| {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            let factor = if k == last { 2.0 } else { 6.0 };
            let bound = (factor / (fan_in + fan_out) as f64).sqrt();
            let dist = Uniform::new_inclusive(-bound, bound);
            let w = Array2::from_shape_fn((fan_in, fan_out), |_| rng.sample(dist));
            let b = Array1::from_shape_fn(fan_out, |_| rng.sample(dist));
            Layer { w, b }
        })
        .collect()
}

/// Activations of every layer, input first.
fn forward(layers: &[Layer], x: ArrayView2<'_, f64>) -> Vec<Array2<f64>> {
    let last = layers.len() - 1;
    let mut acts = Vec::with_capacity(layers.len() + 1);
    acts.push(x.to_owned());
    for (k, layer) in layers.iter().enumerate() {
        let z = acts[k].dot(&layer.w) + &layer.b;
        let a = if k == last { z.mapv(sigmoid) } else { z.mapv(relu) };
        acts.push(a);
    }
    acts
}

fn batch_accuracy(layers: &[Layer], x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
    let acts = forward(layers, x);
    let Some(out) = acts.last() else {
        return 0.0;
    };
    let correct = Zip::from(out)
        .and(y)
        .fold(0usize, |acc, &p, &t| acc + usize::from((p >= 0.5) == (t == 1.0)));
    correct as f64 / y.nrows().max(1) as f64
}

struct Moments {
    mw: Array2<f64>,
    vw: Array2<f64>,
    mb: Array1<f64>,
    vb: Array1<f64>,
}

struct Adam {
    learning_rate: f64,
    t: i32,
    moments: Vec<Moments>,
}

impl Adam {
    fn new(layers: &[Layer], learning_rate: f64) -> Self {
        let moments = layers
            .iter()
            .map(|l| Moments {
                mw: Array2::zeros(l.w.raw_dim()),
                vw: Array2::zeros(l.w.raw_dim()),
                mb: Array1::zeros(l.b.raw_dim()),
                vb: Array1::zeros(l.b.raw_dim()),
            })
            .collect();
        Self {
            learning_rate,
            t: 0,
            moments,
        }
    }

    fn update(&mut self, layers: &mut [Layer], grads: &[(Array2<f64>, Array1<f64>)]) {
        self.t += 1;
        let lr_t = self.learning_rate * (1.0 - BETA2.powi(self.t)).sqrt()
            / (1.0 - BETA1.powi(self.t));
        for ((layer, m), (gw, gb)) in layers.iter_mut().zip(&mut self.moments).zip(grads) {
            adam_step(&mut layer.w, &mut m.mw, &mut m.vw, gw, lr_t);
            adam_step(&mut layer.b, &mut m.mb, &mut m.vb, gb, lr_t);
        }
    }
}

fn adam_step<D: Dimension>(
    param: &mut Array<f64, D>,
    m: &mut Array<f64, D>,
    v: &mut Array<f64, D>,
    g: &Array<f64, D>,
    lr_t: f64,
) {
    Zip::from(param)
        .and(m)
        .and(v)
        .and(g)
        .for_each(|p, m, v, &g| {
            *m = BETA1 * *m + (1.0 - BETA1) * g;
            *v = BETA2 * *v + (1.0 - BETA2) * g * g;
            *p -= lr_t * *m / (v.sqrt() + EPSILON);
        });
}

/// One forward/backward pass and parameter update. Returns the penalised batch loss.
fn train_step(
    layers: &mut [Layer],
    adam: &mut Adam,
    alpha: f64,
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
) -> f64 {
    let n = x.nrows() as f64;
    let acts = forward(layers, x);
    let out = &acts[layers.len()];

    let log_loss = Zip::from(out).and(y).fold(0.0, |acc, &p, &t| {
        let p = p.clamp(LOG_CLIP, 1.0 - LOG_CLIP);
        acc - (t * p.ln() + (1.0 - t) * (1.0 - p).ln())
    });
    let penalty: f64 = layers.iter().map(|l| l.w.mapv(|w| w * w).sum()).sum();
    let loss = log_loss / n + alpha * penalty / (2.0 * n);

    // Sigmoid + log-loss: output delta is p - y
    let mut delta = out - &y;
    let mut grads = Vec::with_capacity(layers.len());
    for k in (0..layers.len()).rev() {
        let gw = (acts[k].t().dot(&delta) + &layers[k].w * alpha) / n;
        let gb = delta.sum_axis(Axis(0)) / n;
        if k > 0 {
            let mut back = delta.dot(&layers[k].w.t());
            back.zip_mut_with(&acts[k], |d, &a| {
                if a <= 0.0 {
                    *d = 0.0;
                }
            });
            delta = back;
        }
        grads.push((gw, gb));
    }
    grads.reverse();
    adam.update(layers, &grads);
    loss
}

impl Classifier for MlpClassifier {
    fn name(&self) -> &'static str {
        "mlp"
    }

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: &[u8],
        seed: u64,
    ) -> Result<Box<dyn FittedClassifier>, FitError> {
        check_shape(&x, y)?;
        let cfg = &self.config;
        let mut rng = StdRng::seed_from_u64(seed);
        let targets = Array2::from_shape_fn((y.len(), 1), |(i, _)| f64::from(y[i]));

        let all: Vec<usize> = (0..y.len()).collect();
        let (train_idx, val_idx) = if cfg.early_stopping {
            match stratified_split(y, cfg.validation_fraction, seed) {
                Ok(split) => (split.train, Some(split.test)),
                Err(e) => {
                    debug!(
                        class = e.class,
                        count = e.count,
                        "too few rows for a validation split; stopping on training loss"
                    );
                    (all, None)
                }
            }
        } else {
            (all, None)
        };

        let x_train = x.select(Axis(0), &train_idx);
        let y_train = targets.select(Axis(0), &train_idx);
        let validation = val_idx.map(|idx| {
            (
                x.select(Axis(0), &idx),
                targets.select(Axis(0), &idx),
            )
        });

        let mut sizes = Vec::with_capacity(cfg.hidden_layers.len() + 2);
        sizes.push(x.ncols());
        sizes.extend(cfg.hidden_layers.iter().copied().filter(|&w| w > 0));
        sizes.push(1);

        let mut layers = init_layers(&sizes, &mut rng);
        let mut adam = Adam::new(&layers, cfg.learning_rate);
        let n_train = x_train.nrows();
        let batch_size = cfg.batch_size.clamp(1, n_train);
        let mut order: Vec<usize> = (0..n_train).collect();

        let mut best_score = f64::NEG_INFINITY;
        let mut best_layers: Option<Vec<Layer>> = None;
        let mut best_loss = f64::INFINITY;
        let mut no_improvement = 0usize;
        let mut epochs = 0usize;

        for epoch in 1..=cfg.max_epochs {
            epochs = epoch;
            order.shuffle(&mut rng);
            let mut loss_sum = 0.0;
            for chunk in order.chunks(batch_size) {
                let xb = x_train.select(Axis(0), chunk);
                let yb = y_train.select(Axis(0), chunk);
                loss_sum += train_step(&mut layers, &mut adam, cfg.alpha, xb.view(), yb.view())
                    * chunk.len() as f64;
            }
            let loss = loss_sum / n_train as f64;
            if !loss.is_finite() {
                return Err(FitError::Diverged { epochs: epoch });
            }

            match &validation {
                Some((xv, yv)) => {
                    let score = batch_accuracy(&layers, xv.view(), yv.view());
                    if score < best_score + cfg.tol {
                        no_improvement += 1;
                    } else {
                        no_improvement = 0;
                    }
                    if score > best_score {
                        best_score = score;
                        best_layers = Some(layers.clone());
                    }
                }
                None => {
                    if loss > best_loss - cfg.tol {
                        no_improvement += 1;
                    } else {
                        no_improvement = 0;
                    }
                    best_loss = best_loss.min(loss);
                }
            }
            if no_improvement > cfg.patience {
                break;
            }
        }

        debug!(
            epochs,
            best_validation_accuracy = best_score,
            "mlp training finished"
        );
        let layers = best_layers.unwrap_or(layers);
        Ok(Box::new(FittedMlp { layers }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{accuracy, test_support::blobs};

    fn quick_config() -> MlpConfig {
        MlpConfig {
            hidden_layers: vec![16, 8],
            learning_rate: 0.01,
            batch_size: 16,
            max_epochs: 60,
            ..MlpConfig::default()
        }
    }

    #[test]
    fn separates_blobs_with_early_stopping() {
        let (x, y) = blobs(200, 3, 11);
        let model = MlpClassifier::new(quick_config())
            .fit(x.view(), &y, 42)
            .unwrap();
        assert!(accuracy(model.as_ref(), x.view(), &y) > 0.9);
    }

    #[test]
    fn separates_blobs_on_training_loss() {
        let (x, y) = blobs(200, 3, 5);
        let cfg = MlpConfig {
            early_stopping: false,
            ..quick_config()
        };
        let model = MlpClassifier::new(cfg).fit(x.view(), &y, 42).unwrap();
        assert!(accuracy(model.as_ref(), x.view(), &y) > 0.9);
    }

    #[test]
    fn same_seed_gives_identical_model() {
        let (x, y) = blobs(100, 4, 3);
        let clf = MlpClassifier::new(quick_config());
        let a = clf.fit(x.view(), &y, 42).unwrap();
        let b = clf.fit(x.view(), &y, 42).unwrap();
        for row in x.rows() {
            assert_eq!(
                a.predict_proba(row).to_bits(),
                b.predict_proba(row).to_bits()
            );
        }
    }

    #[test]
    fn probabilities_are_in_unit_interval() {
        let (x, y) = blobs(60, 2, 9);
        let model = MlpClassifier::new(quick_config())
            .fit(x.view(), &y, 1)
            .unwrap();
        for row in x.rows() {
            let p = model.predict_proba(row);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn no_hidden_layers_still_trains() {
        let (x, y) = blobs(80, 2, 2);
        let cfg = MlpConfig {
            hidden_layers: vec![],
            ..quick_config()
        };
        let model = MlpClassifier::new(cfg).fit(x.view(), &y, 0).unwrap();
        assert!(accuracy(model.as_ref(), x.view(), &y) > 0.9);
    }
}
