//! Feature Engineering Engine
//!
//! Turns IMU sample tables into fixed-length normalized feature vectors and
//! one-hot gesture labels.

mod features;
mod normalizer;
mod windower;

pub use features::{FeatureVector, LabelVector, LabeledRecording};
pub use normalizer::FixedRangeNormalizer;
pub use windower::{Windower, DEFAULT_SAMPLES_PER_GESTURE};

use thiserror::Error;

/// Errors during feature extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Window size must be at least one sample, got {0}")]
    InvalidWindowSize(usize),
    #[error("Label index {index} out of range for {num_gestures} gestures")]
    LabelOutOfRange { index: usize, num_gestures: usize },
}
