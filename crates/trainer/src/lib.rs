//! Gesture Classifier Trainer
//!
//! Dense feed-forward network, optimizers, losses and the epoch loop used to
//! fit a gesture classifier on normalized IMU feature vectors.

mod engine;
mod layer;
mod loss;
mod network;
mod optimizer;
mod trainer;

pub use engine::{Evaluation, Prediction, TrainedModel};
pub use layer::{Activation, Dense, DenseGradient, LayerCache};
pub use loss::{Loss, Metric};
pub use network::{Network, HIDDEN_LAYER_WIDTHS};
pub use optimizer::{Optimizer, OptimizerKind};
pub use trainer::{EpochMetrics, History, Trainer, TrainingConfig};

use thiserror::Error;

/// Errors during training or inference
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainerError {
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Evaluation set is empty")]
    EmptyEvaluationSet,
    #[error("Shape mismatch: expected width {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),
    #[error("Loss became non-finite in epoch {epoch}")]
    NonFiniteLoss { epoch: usize },
}
