//! Feature and Label Vectors

use serde::{Deserialize, Serialize};

/// Flat normalized feature vector for one recording
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Normalized values, six per sample in aX, aY, aZ, gX, gY, gZ order
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// One-hot encoded gesture label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelVector {
    pub values: Vec<f64>,
}

impl LabelVector {
    /// One-hot vector of width `num_classes` with 1.0 at `index`.
    ///
    /// Returns `None` when `index` is not below `num_classes`.
    pub fn one_hot(index: usize, num_classes: usize) -> Option<Self> {
        if index >= num_classes {
            return None;
        }
        let mut values = vec![0.0; num_classes];
        values[index] = 1.0;
        Some(Self { values })
    }

    /// Position of the active entry
    pub fn class_index(&self) -> Option<usize> {
        self.values.iter().position(|&v| v == 1.0)
    }

    /// Number of classes encoded
    pub fn num_classes(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Feature vector paired with its label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecording {
    pub features: FeatureVector,
    pub label: LabelVector,
}
