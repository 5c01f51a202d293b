//! Patient feature schema, disease labels and validated feature vectors.

mod schema;
mod vector;

pub use schema::{Feature, Label, FEATURE_COUNT, LABEL_COUNT};
pub use vector::FeatureVector;
