//! Pipeline configuration.

use dataset::SplitRatios;
use feature_engine::DEFAULT_SAMPLES_PER_GESTURE;
use gesture_data::GestureSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trainer::TrainingConfig;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 1337;

/// Environment variable prefix, e.g. `GESTURE_TRAINING__EPOCHS=10`
pub const ENV_PREFIX: &str = "GESTURE";

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed for the shuffle permutation and model initialization
    pub seed: u64,

    /// Ordered gesture labels; order defines the one-hot encoding
    pub gestures: GestureSet,

    /// Directory holding one `<gesture>.csv` per label
    pub data_dir: PathBuf,

    /// Samples per recording window
    pub samples_per_gesture: usize,

    /// Train/test fractions; validation takes the remainder
    pub split: SplitRatios,

    /// Optimizer, loss, metric and epoch settings
    pub training: TrainingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            gestures: GestureSet::default(),
            data_dir: PathBuf::from("data"),
            samples_per_gesture: DEFAULT_SAMPLES_PER_GESTURE,
            split: SplitRatios::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from an optional file layered under `GESTURE_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("gestures")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Number of gestures (width of the one-hot labels)
    pub fn num_gestures(&self) -> usize {
        self.gestures.len()
    }
}
