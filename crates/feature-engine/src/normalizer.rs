//! Fixed-Range Min-Max Normalization

use gesture_data::{SampleRow, SensorRange, SensorRanges, CHANNELS_PER_SAMPLE};
use serde::{Deserialize, Serialize};

/// Normalizer mapping each raw channel into [0, 1] using its nominal range.
///
/// Values outside the nominal range are passed through the same linear map
/// and land outside [0, 1]; nothing is clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedRangeNormalizer {
    ranges: SensorRanges,
}

impl FixedRangeNormalizer {
    /// Create a normalizer for the given sensor ranges
    pub fn new(ranges: SensorRanges) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &SensorRanges {
        &self.ranges
    }

    /// Normalize one value against a range: `(value - min) / (max - min)`
    pub fn scale(value: f64, range: &SensorRange) -> f64 {
        (value - range.min) / range.span()
    }

    /// Normalized acceleration; `(a + 4) / 8` for the default range
    pub fn accel(&self, value: f64) -> f64 {
        Self::scale(value, &self.ranges.accel)
    }

    /// Normalized angular velocity; `(g + 2000) / 4000` for the default range
    pub fn gyro(&self, value: f64) -> f64 {
        Self::scale(value, &self.ranges.gyro)
    }

    /// Normalize a row into aX, aY, aZ, gX, gY, gZ order
    pub fn normalize_row(&self, row: &SampleRow) -> [f64; CHANNELS_PER_SAMPLE] {
        [
            self.accel(row.ax),
            self.accel(row.ay),
            self.accel(row.az),
            self.gyro(row.gx),
            self.gyro(row.gy),
            self.gyro(row.gz),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_range_endpoints() {
        let norm = FixedRangeNormalizer::default();
        assert_eq!(norm.accel(-4.0), 0.0);
        assert_eq!(norm.accel(0.0), 0.5);
        assert_eq!(norm.accel(4.0), 1.0);
        assert_eq!(norm.gyro(-2000.0), 0.0);
        assert_eq!(norm.gyro(0.0), 0.5);
        assert_eq!(norm.gyro(2000.0), 1.0);
    }

    #[test]
    fn test_out_of_range_not_clamped() {
        let norm = FixedRangeNormalizer::default();
        assert_eq!(norm.accel(8.0), 1.5);
        assert_eq!(norm.gyro(-4000.0), -0.5);
    }

    #[test]
    fn test_row_order() {
        let norm = FixedRangeNormalizer::default();
        let row = SampleRow::from_channels([4.0, 0.0, -4.0, 2000.0, 0.0, -2000.0]);
        assert_eq!(norm.normalize_row(&row), [1.0, 0.5, 0.0, 1.0, 0.5, 0.0]);
    }

    proptest! {
        #[test]
        fn accel_maps_into_unit_interval(a in -4.0f64..=4.0) {
            let v = FixedRangeNormalizer::default().accel(a);
            prop_assert!((0.0..=1.0).contains(&v));
            prop_assert!((v - (a + 4.0) / 8.0).abs() < 1e-12);
        }

        #[test]
        fn gyro_maps_into_unit_interval(g in -2000.0f64..=2000.0) {
            let v = FixedRangeNormalizer::default().gyro(g);
            prop_assert!((0.0..=1.0).contains(&v));
            prop_assert!((v - (g + 2000.0) / 4000.0).abs() < 1e-12);
        }
    }
}
