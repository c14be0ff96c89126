//! IMU Sample Rows and Nominal Sensor Ranges

use serde::{Deserialize, Serialize};

/// Number of numeric channels in one sample row
pub const CHANNELS_PER_SAMPLE: usize = 6;

/// Required CSV column names, in feature order
pub const REQUIRED_COLUMNS: [&str; CHANNELS_PER_SAMPLE] = ["aX", "aY", "aZ", "gX", "gY", "gZ"];

/// One accelerometer + gyroscope reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    /// Acceleration X (g)
    pub ax: f64,
    /// Acceleration Y (g)
    pub ay: f64,
    /// Acceleration Z (g)
    pub az: f64,
    /// Angular velocity X (deg/s)
    pub gx: f64,
    /// Angular velocity Y (deg/s)
    pub gy: f64,
    /// Angular velocity Z (deg/s)
    pub gz: f64,
}

impl SampleRow {
    /// Build a row from values in `REQUIRED_COLUMNS` order
    pub fn from_channels(values: [f64; CHANNELS_PER_SAMPLE]) -> Self {
        let [ax, ay, az, gx, gy, gz] = values;
        Self { ax, ay, az, gx, gy, gz }
    }

    /// Values in `REQUIRED_COLUMNS` order
    pub fn channels(&self) -> [f64; CHANNELS_PER_SAMPLE] {
        [self.ax, self.ay, self.az, self.gx, self.gy, self.gz]
    }

    /// Acceleration triple
    pub fn accel(&self) -> [f64; 3] {
        [self.ax, self.ay, self.az]
    }

    /// Angular velocity triple
    pub fn gyro(&self) -> [f64; 3] {
        [self.gx, self.gy, self.gz]
    }
}

/// Inclusive range a raw sensor value is expected to fall in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorRange {
    pub min: f64,
    pub max: f64,
}

impl SensorRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Nominal ranges of the IMU channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorRanges {
    /// Accelerometer range (g)
    pub accel: SensorRange,
    /// Gyroscope range (deg/s)
    pub gyro: SensorRange,
}

impl Default for SensorRanges {
    fn default() -> Self {
        Self {
            accel: SensorRange::new(-4.0, 4.0),
            gyro: SensorRange::new(-2000.0, 2000.0),
        }
    }
}

impl SensorRanges {
    /// Count of channels in `row` lying outside their nominal range
    pub fn out_of_range_count(&self, row: &SampleRow) -> usize {
        let accel = row.accel().iter().filter(|v| !self.accel.contains(**v)).count();
        let gyro = row.gyro().iter().filter(|v| !self.gyro.contains(**v)).count();
        accel + gyro
    }
}

/// Ordered rows read from one source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorTable {
    source_name: String,
    rows: Vec<SampleRow>,
}

impl SensorTable {
    pub fn new(source_name: impl Into<String>, rows: Vec<SampleRow>) -> Self {
        Self {
            source_name: source_name.into(),
            rows,
        }
    }

    /// Name of the source the rows were read from
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn rows(&self) -> &[SampleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
