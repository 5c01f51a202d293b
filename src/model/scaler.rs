//! Per-feature standardisation fitted on training rows only.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Zero-mean, unit-variance scaling. Population variance; constant columns get
/// scale 1.0 so they map to `x - mean`.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Pass-through scaler over `n_features` columns.
    pub fn identity(n_features: usize) -> Self {
        Self {
            mean: Array1::zeros(n_features),
            scale: Array1::ones(n_features),
        }
    }

    pub fn fit(x: ArrayView2<'_, f64>) -> Self {
        let n_features = x.ncols();
        let Some(mean) = x.mean_axis(Axis(0)) else {
            return Self::identity(n_features);
        };
        let scale = x
            .var_axis(Axis(0), 0.0)
            .mapv(|v| if v > 0.0 { v.sqrt() } else { 1.0 });
        Self { mean, scale }
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        (&x - &self.mean) / &self.scale
    }

    pub fn transform_row(&self, row: ArrayView1<'_, f64>) -> Array1<f64> {
        (&row - &self.mean) / &self.scale
    }

    pub fn mean(&self) -> ArrayView1<'_, f64> {
        self.mean.view()
    }

    pub fn scale(&self) -> ArrayView1<'_, f64> {
        self.scale.view()
    }
}
