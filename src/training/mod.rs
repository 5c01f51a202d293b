//! Per-label training: stratified split, scaler fit, classifier fit, held-out evaluation.

mod split;
mod trainer;

pub use split::{stratified_split, Split, StratifyError};
pub use trainer::{LabelModel, LabelReport, TrainedState, Trainer, TrainingReport};
