//! Train/Test/Validation Split

use crate::dataset::Dataset;
use crate::error::DatasetError;
use serde::{Deserialize, Serialize};

/// Fractions of the dataset given to training and testing; validation gets the rest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitRatios {
    /// Training fraction (default: 0.6)
    pub train: f64,
    /// Test fraction (default: 0.2)
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.6,
            test: 0.2,
        }
    }
}

impl SplitRatios {
    /// Check both fractions are in [0, 1] and leave a non-negative remainder
    pub fn validate(&self) -> Result<(), DatasetError> {
        for (name, value) in [("train", self.train), ("test", self.test)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DatasetError::InvalidSplit(format!(
                    "{name} ratio {value} outside [0, 1]"
                )));
            }
        }
        if self.train + self.test > 1.0 {
            return Err(DatasetError::InvalidSplit(format!(
                "train + test = {} exceeds 1",
                self.train + self.test
            )));
        }
        Ok(())
    }

    /// Fraction left for validation
    pub fn validate_share(&self) -> f64 {
        1.0 - self.train - self.test
    }

    /// Split boundaries `(TRAIN_SPLIT, TEST_SPLIT)` for `n` pairs.
    ///
    /// `TRAIN_SPLIT = floor(train * n)` and
    /// `TEST_SPLIT = floor(test * n) + TRAIN_SPLIT`, truncated in `f64`.
    pub fn boundaries(&self, n: usize) -> (usize, usize) {
        let train_split = (self.train * n as f64) as usize;
        let test_split = (self.test * n as f64) as usize + train_split;
        (train_split.min(n), test_split.min(n))
    }
}

/// Three contiguous, non-overlapping slices of a shuffled dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplits {
    pub train: Dataset,
    pub test: Dataset,
    pub validate: Dataset,
    /// Permutation applied before splitting: position `k` came from `order[k]`
    pub order: Vec<usize>,
}

impl DatasetSplits {
    /// Total pairs across the three slices
    pub fn total(&self) -> usize {
        self.train.len() + self.test.len() + self.validate.len()
    }
}

/// Cut `dataset` at the ratio boundaries
pub fn split(dataset: &Dataset, ratios: &SplitRatios) -> (Dataset, Dataset, Dataset) {
    let n = dataset.len();
    let (train_split, test_split) = ratios.boundaries(n);
    (
        dataset.slice(0..train_split),
        dataset.slice(train_split..test_split),
        dataset.slice(test_split..n),
    )
}
