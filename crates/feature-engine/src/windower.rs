//! Fixed-Size Recording Windows

use crate::features::{FeatureVector, LabelVector, LabeledRecording};
use crate::normalizer::FixedRangeNormalizer;
use crate::FeatureError;
use gesture_data::{SensorTable, CHANNELS_PER_SAMPLE};
use tracing::{debug, warn};

/// Samples in one gesture recording
pub const DEFAULT_SAMPLES_PER_GESTURE: usize = 119;

/// Slices sample tables into contiguous, non-overlapping recordings
#[derive(Debug, Clone)]
pub struct Windower {
    samples_per_gesture: usize,
    normalizer: FixedRangeNormalizer,
}

impl Windower {
    /// Create a windower with the default sensor ranges
    pub fn new(samples_per_gesture: usize) -> Result<Self, FeatureError> {
        Self::with_normalizer(samples_per_gesture, FixedRangeNormalizer::default())
    }

    pub fn with_normalizer(
        samples_per_gesture: usize,
        normalizer: FixedRangeNormalizer,
    ) -> Result<Self, FeatureError> {
        if samples_per_gesture == 0 {
            return Err(FeatureError::InvalidWindowSize(samples_per_gesture));
        }
        Ok(Self {
            samples_per_gesture,
            normalizer,
        })
    }

    pub fn samples_per_gesture(&self) -> usize {
        self.samples_per_gesture
    }

    /// Length of every feature vector this windower produces
    pub fn feature_dimension(&self) -> usize {
        self.samples_per_gesture * CHANNELS_PER_SAMPLE
    }

    /// Number of full recordings in a table of `row_count` rows
    pub fn recording_count(&self, row_count: usize) -> usize {
        row_count / self.samples_per_gesture
    }

    /// Feature vectors for every full window of `table`; trailing rows are dropped
    pub fn features(&self, table: &SensorTable) -> Vec<FeatureVector> {
        let rows = table.rows();
        let num_recordings = self.recording_count(rows.len());

        let trailing = rows.len() - num_recordings * self.samples_per_gesture;
        if num_recordings == 0 {
            warn!(
                "'{}' has {} rows, fewer than one recording of {} samples",
                table.source_name(),
                rows.len(),
                self.samples_per_gesture
            );
        } else if trailing > 0 {
            debug!("Dropping {} trailing rows of '{}'", trailing, table.source_name());
        }

        let ranges = self.normalizer.ranges();
        let out_of_range: usize = rows[..num_recordings * self.samples_per_gesture]
            .iter()
            .map(|row| ranges.out_of_range_count(row))
            .sum();
        if out_of_range > 0 {
            debug!(
                "'{}' has {} raw values outside nominal sensor ranges",
                table.source_name(),
                out_of_range
            );
        }

        rows.chunks_exact(self.samples_per_gesture)
            .map(|window| {
                let mut values = Vec::with_capacity(self.feature_dimension());
                for row in window {
                    values.extend_from_slice(&self.normalizer.normalize_row(row));
                }
                FeatureVector::new(values)
            })
            .collect()
    }

    /// Labeled recordings of `table` for the gesture at `label_index`
    pub fn recordings(
        &self,
        table: &SensorTable,
        label_index: usize,
        num_gestures: usize,
    ) -> Result<Vec<LabeledRecording>, FeatureError> {
        let label = LabelVector::one_hot(label_index, num_gestures).ok_or(
            FeatureError::LabelOutOfRange {
                index: label_index,
                num_gestures,
            },
        )?;

        Ok(self
            .features(table)
            .into_iter()
            .map(|features| LabeledRecording {
                features,
                label: label.clone(),
            })
            .collect())
    }
}

impl Default for Windower {
    fn default() -> Self {
        Self {
            samples_per_gesture: DEFAULT_SAMPLES_PER_GESTURE,
            normalizer: FixedRangeNormalizer::default(),
        }
    }
}
