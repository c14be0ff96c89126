//! Gesture Sample Data
//!
//! Ordered gesture label sets, IMU sample rows, and schema-checked CSV loading.

mod error;
mod gestures;
mod loader;
mod sample;

pub use error::DataError;
pub use gestures::GestureSet;
pub use loader::{read_table, CsvDirectory, SampleSource};
pub use sample::{
    SampleRow, SensorRange, SensorRanges, SensorTable, CHANNELS_PER_SAMPLE, REQUIRED_COLUMNS,
};
