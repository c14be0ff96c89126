//! Dataset Error Types

use thiserror::Error;

/// Errors while assembling or splitting a dataset
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    /// No recordings survived windowing
    #[error("dataset is empty: no recordings to shuffle or split")]
    EmptyDataset,

    /// Pair shape differs from pairs already in the dataset
    #[error("shape mismatch: expected {expected_features} features / {expected_classes} classes, got {features} / {classes}")]
    ShapeMismatch {
        expected_features: usize,
        expected_classes: usize,
        features: usize,
        classes: usize,
    },

    /// Split ratios outside [0, 1] or summing past 1
    #[error("invalid split ratios: {0}")]
    InvalidSplit(String),
}
