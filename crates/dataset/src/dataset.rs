//! Paired Feature/Label Collections

use crate::error::DatasetError;
use feature_engine::{FeatureVector, LabelVector, LabeledRecording};
use std::ops::Range;

/// Two parallel collections paired by position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    features: Vec<FeatureVector>,
    labels: Vec<LabelVector>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair; its shape must match earlier pairs
    pub fn push(&mut self, features: FeatureVector, label: LabelVector) -> Result<(), DatasetError> {
        if let (Some(f), Some(l)) = (self.features.first(), self.labels.first()) {
            if f.len() != features.len() || l.num_classes() != label.num_classes() {
                return Err(DatasetError::ShapeMismatch {
                    expected_features: f.len(),
                    expected_classes: l.num_classes(),
                    features: features.len(),
                    classes: label.num_classes(),
                });
            }
        }
        self.features.push(features);
        self.labels.push(label);
        Ok(())
    }

    /// Append recordings in order
    pub fn extend(
        &mut self,
        recordings: impl IntoIterator<Item = LabeledRecording>,
    ) -> Result<(), DatasetError> {
        for rec in recordings {
            self.push(rec.features, rec.label)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn labels(&self) -> &[LabelVector] {
        &self.labels
    }

    /// Length of each feature vector, if any pair is present
    pub fn feature_dimension(&self) -> Option<usize> {
        self.features.first().map(FeatureVector::len)
    }

    /// Width of each label vector, if any pair is present
    pub fn num_classes(&self) -> Option<usize> {
        self.labels.first().map(LabelVector::num_classes)
    }

    /// Iterate pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&FeatureVector, &LabelVector)> {
        self.features.iter().zip(self.labels.iter())
    }

    /// Pairs reordered so position `k` holds the pair at `order[k]`
    pub fn permuted(&self, order: &[usize]) -> Self {
        Self {
            features: order.iter().map(|&i| self.features[i].clone()).collect(),
            labels: order.iter().map(|&i| self.labels[i].clone()).collect(),
        }
    }

    /// Contiguous sub-range of pairs
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            features: self.features[range.clone()].to_vec(),
            labels: self.labels[range].to_vec(),
        }
    }
}
