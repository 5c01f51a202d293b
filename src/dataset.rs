//! Labelled training data: one row per patient, 14 feature columns plus one
//! binary outcome column per label.

use crate::error::DataError;
use crate::features::{Feature, Label, FEATURE_COUNT, LABEL_COUNT};
use ndarray::{Array2, ArrayView2};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Dataset {
    features: Array2<f64>,
    /// Indexed by [`Label::index`]
    outcomes: Vec<Vec<u8>>,
}

impl Dataset {
    /// Build from in-memory rows (feature values in schema order, outcomes in label order).
    pub fn from_rows(
        rows: Vec<([f64; FEATURE_COUNT], [u8; LABEL_COUNT])>,
    ) -> Result<Self, DataError> {
        if rows.is_empty() {
            return Err(DataError::Empty);
        }
        for (i, (values, outcomes)) in rows.iter().enumerate() {
            let row = i + 1;
            for feature in Feature::ALL {
                let v = values[feature.index()];
                if !v.is_finite() {
                    return Err(DataError::InvalidValue {
                        row,
                        column: feature.name().to_string(),
                        value: v.to_string(),
                    });
                }
            }
            for label in Label::ALL {
                let o = outcomes[label.index()];
                if o > 1 {
                    return Err(DataError::NonBinaryOutcome {
                        row,
                        column: label.outcome_column().to_string(),
                        value: f64::from(o),
                    });
                }
            }
        }

        let features =
            Array2::from_shape_fn((rows.len(), FEATURE_COUNT), |(i, j)| rows[i].0[j]);
        let outcomes = Label::ALL
            .iter()
            .map(|l| rows.iter().map(|(_, o)| o[l.index()]).collect())
            .collect();
        Ok(Self { features, outcomes })
    }

    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv(file)
    }

    /// Parse header-labelled CSV. Columns may appear in any order; extra columns are ignored.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };

        let mut feature_cols = [0usize; FEATURE_COUNT];
        for feature in Feature::ALL {
            feature_cols[feature.index()] = column(feature.name())?;
        }
        let mut outcome_cols = [0usize; LABEL_COUNT];
        for label in Label::ALL {
            outcome_cols[label.index()] = column(label.outcome_column())?;
        }

        let mut rows = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let row = i + 1;
            let cell = |col: usize, name: &str| -> Result<f64, DataError> {
                let raw = record.get(col).unwrap_or("");
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DataError::InvalidValue {
                        row,
                        column: name.to_string(),
                        value: raw.to_string(),
                    })
            };

            let mut values = [0.0; FEATURE_COUNT];
            for feature in Feature::ALL {
                values[feature.index()] = cell(feature_cols[feature.index()], feature.name())?;
            }
            let mut outcomes = [0u8; LABEL_COUNT];
            for label in Label::ALL {
                let name = label.outcome_column();
                let v = cell(outcome_cols[label.index()], name)?;
                outcomes[label.index()] = if v == 0.0 {
                    0
                } else if v == 1.0 {
                    1
                } else {
                    return Err(DataError::NonBinaryOutcome {
                        row,
                        column: name.to_string(),
                        value: v,
                    });
                };
            }
            rows.push((values, outcomes));
        }

        Self::from_rows(rows)
    }

    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn outcomes(&self, label: Label) -> &[u8] {
        &self.outcomes[label.index()]
    }

    /// (negative, positive) row counts for a label.
    pub fn class_counts(&self, label: Label) -> (usize, usize) {
        let positives = self.outcomes(label).iter().filter(|&&o| o == 1).count();
        (self.len() - positives, positives)
    }
}
