//! Gesture Training Pipeline
//!
//! Runs the load → window → assemble → train stages over one CSV table per
//! gesture and reports per-epoch metrics plus a held-out test evaluation.

pub mod config;

pub use config::PipelineConfig;

use dataset::{Dataset, DatasetAssembler, DatasetError, DatasetSplits};
use feature_engine::{FeatureError, Windower};
use gesture_data::{DataError, SampleSource};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use trainer::{Evaluation, History, TrainedModel, Trainer, TrainerError};

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Configure,
    Load,
    Window,
    Assemble,
    Train,
    Evaluate,
    Export,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Configure => "configure",
            Stage::Load => "load",
            Stage::Window => "window",
            Stage::Assemble => "assemble",
            Stage::Train => "train",
            Stage::Evaluate => "evaluate",
            Stage::Export => "export",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying cause of a stage failure
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Trainer(#[from] TrainerError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Fatal pipeline failure, tagged with the stage it happened in
#[derive(Debug, Error)]
#[error("{stage} stage failed")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

/// Extension to tag stage results
trait AtStage<T> {
    fn at_stage(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T, E: Into<StageError>> AtStage<T> for Result<T, E> {
    fn at_stage(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError {
            stage,
            source: e.into(),
        })
    }
}

/// Recordings found for one gesture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureSummary {
    pub gesture: String,
    pub rows: usize,
    pub recordings: usize,
}

/// Sizes of the three slices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitSizes {
    pub train: usize,
    pub test: usize,
    pub validate: usize,
}

impl From<&DatasetSplits> for SplitSizes {
    fn from(splits: &DatasetSplits) -> Self {
        Self {
            train: splits.train.len(),
            test: splits.test.len(),
            validate: splits.validate.len(),
        }
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub gestures: Vec<GestureSummary>,
    pub splits: SplitSizes,
    pub model: TrainedModel,
    pub history: History,
    /// `None` when the test slice is empty
    pub test_evaluation: Option<Evaluation>,
}

/// JSON training report
#[derive(Debug, Serialize)]
pub struct TrainingReport<'a> {
    pub config: &'a PipelineConfig,
    pub gestures: &'a [GestureSummary],
    pub splits: SplitSizes,
    pub history: &'a History,
    pub test_evaluation: Option<&'a Evaluation>,
}

/// Check configuration before any data is read
pub fn validate_config(config: &PipelineConfig) -> Result<Windower, PipelineError> {
    let windower = Windower::new(config.samples_per_gesture).at_stage(Stage::Configure)?;
    config.split.validate().at_stage(Stage::Configure)?;
    config.training.validate().at_stage(Stage::Configure)?;
    Ok(windower)
}

/// Load every gesture table and window it into one labeled dataset,
/// in gesture order
pub fn build_dataset(
    config: &PipelineConfig,
    source: &impl SampleSource,
) -> Result<(Dataset, Vec<GestureSummary>), PipelineError> {
    let windower = validate_config(config)?;
    let num_gestures = config.num_gestures();

    let mut dataset = Dataset::new();
    let mut summaries = Vec::with_capacity(num_gestures);

    for (index, gesture) in config.gestures.iter() {
        info!("Processing index {} for gesture '{}'", index, gesture);

        let table = source.load(gesture).at_stage(Stage::Load)?;
        let recordings = windower
            .recordings(&table, index, num_gestures)
            .at_stage(Stage::Window)?;
        info!("There are {} recordings of the {} gesture", recordings.len(), gesture);

        summaries.push(GestureSummary {
            gesture: gesture.to_string(),
            rows: table.len(),
            recordings: recordings.len(),
        });
        dataset.extend(recordings).at_stage(Stage::Assemble)?;
    }

    info!("Data set parsing and preparation complete: {} recordings", dataset.len());
    Ok((dataset, summaries))
}

/// Shuffle and split with the configured seed and ratios
pub fn assemble(config: &PipelineConfig, dataset: &Dataset) -> Result<DatasetSplits, PipelineError> {
    let assembler = DatasetAssembler::new(config.seed, config.split).at_stage(Stage::Assemble)?;
    let splits = assembler.assemble(dataset).at_stage(Stage::Assemble)?;
    info!("Data set randomization and splitting complete");
    Ok(splits)
}

/// Run every stage once, in order
pub fn run_pipeline(
    config: &PipelineConfig,
    source: &impl SampleSource,
) -> Result<PipelineOutcome, PipelineError> {
    let (dataset, gestures) = build_dataset(config, source)?;
    let splits = assemble(config, &dataset)?;

    let trainer = Trainer::new(config.training.clone(), config.seed).at_stage(Stage::Train)?;
    let (model, history) = trainer
        .fit(&splits.train, &splits.validate)
        .at_stage(Stage::Train)?;

    let test_evaluation = if splits.test.is_empty() {
        warn!("Test slice is empty; skipping evaluation");
        None
    } else {
        let eval = model.evaluate(&splits.test).at_stage(Stage::Evaluate)?;
        info!(
            "Test evaluation on {} recordings - loss: {:.4} - {}: {:.4} - accuracy: {:.4}",
            eval.samples,
            eval.loss,
            model.metric().as_str(),
            eval.metric,
            eval.accuracy
        );
        Some(eval)
    };

    Ok(PipelineOutcome {
        gestures,
        splits: SplitSizes::from(&splits),
        model,
        history,
        test_evaluation,
    })
}

/// Write the training report as pretty JSON
pub fn write_report(
    path: &Path,
    config: &PipelineConfig,
    outcome: &PipelineOutcome,
) -> Result<(), PipelineError> {
    let report = TrainingReport {
        config,
        gestures: &outcome.gestures,
        splits: outcome.splits,
        history: &outcome.history,
        test_evaluation: outcome.test_evaluation.as_ref(),
    };
    let json = serde_json::to_string_pretty(&report).at_stage(Stage::Export)?;
    std::fs::write(path, json).at_stage(Stage::Export)?;
    info!("Wrote training report to {}", path.display());
    Ok(())
}

/// Write the trained model's layers as JSON
pub fn write_model(path: &Path, model: &TrainedModel) -> Result<(), PipelineError> {
    let json = serde_json::to_string(model).at_stage(Stage::Export)?;
    std::fs::write(path, json).at_stage(Stage::Export)?;
    info!("Wrote model to {}", path.display());
    Ok(())
}

/// Initialize logging
pub fn init_logging(
    verbose: bool,
    json: bool,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_data::{SampleRow, SensorTable};
    use std::collections::HashMap;

    /// In-memory source keyed by gesture name
    struct MemorySource(HashMap<String, SensorTable>);

    impl SampleSource for MemorySource {
        fn load(&self, label: &str) -> Result<SensorTable, DataError> {
            self.0
                .get(label)
                .cloned()
                .ok_or_else(|| DataError::unavailable(label, "no such table"))
        }
    }

    fn table(rows: usize, level: f64) -> SensorTable {
        let rows = (0..rows)
            .map(|_| SampleRow::from_channels([level, level, level, level * 500.0, 0.0, 0.0]))
            .collect();
        SensorTable::new("mem", rows)
    }

    fn source(tables: &[(&str, usize, f64)]) -> MemorySource {
        MemorySource(
            tables
                .iter()
                .map(|(name, rows, level)| (name.to_string(), table(*rows, *level)))
                .collect(),
        )
    }

    fn small_config(epochs: usize) -> PipelineConfig {
        let mut config = PipelineConfig {
            samples_per_gesture: 4,
            ..Default::default()
        };
        config.training.epochs = epochs;
        config
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Load.to_string(), "load");
        assert_eq!(Stage::Assemble.as_str(), "assemble");
    }

    #[test]
    fn test_build_dataset_in_gesture_order() {
        let config = small_config(1);
        let src = source(&[("punch", 9, -1.0), ("flex", 12, 1.0)]);
        let (dataset, summaries) = build_dataset(&config, &src).unwrap();

        assert_eq!(dataset.len(), 5);
        assert_eq!(summaries[0], GestureSummary { gesture: "punch".to_string(), rows: 9, recordings: 2 });
        assert_eq!(summaries[1].recordings, 3);
        assert_eq!(dataset.labels()[0].class_index(), Some(0));
        assert_eq!(dataset.labels()[4].class_index(), Some(1));
    }

    #[test]
    fn test_missing_gesture_fails_at_load() {
        let config = small_config(1);
        let err = build_dataset(&config, &source(&[("punch", 8, 0.0)])).unwrap_err();
        assert_eq!(err.stage, Stage::Load);
        assert!(matches!(err.source, StageError::Data(DataError::DataUnavailable { .. })));
    }

    #[test]
    fn test_empty_dataset_fails_before_training() {
        let config = small_config(1);
        let src = source(&[("punch", 3, 0.0), ("flex", 2, 0.0)]);
        let (dataset, _) = build_dataset(&config, &src).unwrap();
        let err = assemble(&config, &dataset).unwrap_err();

        assert_eq!(err.stage, Stage::Assemble);
        assert!(matches!(err.source, StageError::Dataset(DatasetError::EmptyDataset)));
    }

    #[test]
    fn test_invalid_config_fails_at_configure() {
        let mut config = small_config(1);
        config.samples_per_gesture = 0;
        let err = build_dataset(&config, &source(&[])).unwrap_err();
        assert_eq!(err.stage, Stage::Configure);

        let mut config = small_config(1);
        config.training.batch_size = 0;
        assert_eq!(validate_config(&config).unwrap_err().stage, Stage::Configure);
    }

    #[test]
    fn test_run_pipeline_small() {
        let config = small_config(3);
        let src = source(&[("punch", 40, -2.0), ("flex", 40, 2.0)]);
        let outcome = run_pipeline(&config, &src).unwrap();

        // 20 recordings: train 12, test 4, validate 4
        assert_eq!(outcome.splits, SplitSizes { train: 12, test: 4, validate: 4 });
        assert_eq!(outcome.history.epochs.len(), 3);
        assert_eq!(outcome.test_evaluation.as_ref().map(|e| e.samples), Some(4));
    }
}
