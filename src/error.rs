//! Typed failures for training and prediction.

use crate::features::Label;
use thiserror::Error;

/// Malformed or insufficient training data. Training aborts for every label.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column `{0}`")]
    MissingColumn(String),

    #[error("row {row}: column `{column}` has non-numeric value {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: outcome column `{column}` must be 0 or 1, got {value}")]
    NonBinaryOutcome {
        row: usize,
        column: String,
        value: f64,
    },

    #[error("dataset has no rows")]
    Empty,

    #[error("{label}: cannot stratify split, class {class} has {count} row(s) (need at least 2)")]
    Unstratifiable { label: Label, class: u8, count: usize },

    #[error("{label}: classifier training failed: {reason}")]
    Training { label: Label, reason: String },
}

/// Malformed prediction input. Local to one prediction call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("feature vector must be a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not numeric: {value}")]
    NonNumeric { field: &'static str, value: String },

    #[error("field `{0}` is not a finite number")]
    NonFinite(&'static str),

    #[error("field `{field}` must be 0 or 1, got {value}")]
    NotBinary { field: &'static str, value: f64 },

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{0}` supplied more than once")]
    DuplicateField(&'static str),
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("no trained model state has been published")]
    UntrainedModel,
}
