//! End-to-end runs over CSV fixtures written to a temporary directory.

use gesture_data::{CsvDirectory, DataError};
use gesture_pipeline::{
    assemble, build_dataset, run_pipeline, write_model, write_report, PipelineConfig, Stage,
    StageError,
};
use std::path::PathBuf;
use trainer::TrainedModel;

struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("gesture-e2e-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    /// Write `rows` in-range samples for `gesture`; `phase` varies the signal
    fn write_gesture(&self, gesture: &str, rows: usize, phase: f64) {
        let mut csv = String::from("aX,aY,aZ,gX,gY,gZ\n");
        for i in 0..rows {
            let t = i as f64 * 0.1 + phase;
            csv.push_str(&format!(
                "{:.3},{:.3},{:.3},{:.2},{:.2},{:.2}\n",
                t.sin() * 3.5,
                t.cos() * 3.5,
                (t * 0.5).sin(),
                t.sin() * 1800.0,
                t.cos() * 900.0,
                (t * 2.0).sin() * 300.0
            ));
        }
        std::fs::write(self.dir.join(format!("{gesture}.csv")), csv).unwrap();
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            data_dir: self.dir.clone(),
            ..Default::default()
        }
    }

    fn source(&self) -> CsvDirectory {
        CsvDirectory::new(&self.dir)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

#[test]
fn two_gestures_of_three_recordings_split_three_one_two() {
    let fx = Fixture::new("split");
    fx.write_gesture("punch", 119 * 3, 0.0);
    fx.write_gesture("flex", 119 * 3, 1.5);

    let config = fx.config();
    let (dataset, summaries) = build_dataset(&config, &fx.source()).unwrap();
    assert_eq!(dataset.len(), 6);
    assert_eq!(summaries.iter().map(|s| s.recordings).collect::<Vec<_>>(), vec![3, 3]);
    assert_eq!(dataset.feature_dimension(), Some(119 * 6));
    assert!(dataset
        .features()
        .iter()
        .all(|f| f.values.iter().all(|v| (0.0..=1.0).contains(v))));

    let splits = assemble(&config, &dataset).unwrap();
    assert_eq!(splits.train.len(), 3);
    assert_eq!(splits.test.len(), 1);
    assert_eq!(splits.validate.len(), 2);
}

#[test]
fn same_seed_gives_identical_datasets() {
    let fx = Fixture::new("determinism");
    fx.write_gesture("punch", 119 * 5 + 17, 0.0);
    fx.write_gesture("flex", 119 * 4, 0.7);

    let config = fx.config();
    let run = || {
        let (dataset, _) = build_dataset(&config, &fx.source()).unwrap();
        assemble(&config, &dataset).unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first.order, second.order);
    assert_eq!(first, second);
}

#[test]
fn shuffled_pairs_keep_their_labels() {
    let fx = Fixture::new("pairing");
    fx.write_gesture("punch", 119 * 4, 0.0);
    fx.write_gesture("flex", 119 * 4, 2.0);

    let config = fx.config();
    let (dataset, _) = build_dataset(&config, &fx.source()).unwrap();
    let splits = assemble(&config, &dataset).unwrap();

    let shuffled = [&splits.train, &splits.test, &splits.validate];
    let mut position = 0;
    for part in shuffled {
        for (features, label) in part.iter() {
            let original = splits.order[position];
            assert_eq!(features, &dataset.features()[original]);
            assert_eq!(label, &dataset.labels()[original]);
            position += 1;
        }
    }
    assert_eq!(position, dataset.len());
}

#[test]
fn missing_gesture_file_aborts_at_load() {
    let fx = Fixture::new("missing");
    fx.write_gesture("punch", 119, 0.0);

    let err = run_pipeline(&fx.config(), &fx.source()).unwrap_err();
    assert_eq!(err.stage, Stage::Load);
    assert!(matches!(err.source, StageError::Data(DataError::DataUnavailable { .. })));
}

#[test]
fn malformed_value_aborts_at_load() {
    let fx = Fixture::new("malformed");
    fx.write_gesture("punch", 119, 0.0);
    std::fs::write(
        fx.dir.join("flex.csv"),
        "aX,aY,aZ,gX,gY,gZ\n0.1,0.2,0.3,1,2,3\n0.1,oops,0.3,1,2,3\n",
    )
    .unwrap();

    let err = run_pipeline(&fx.config(), &fx.source()).unwrap_err();
    assert_eq!(err.stage, Stage::Load);
    match err.source {
        StageError::Data(DataError::MalformedRow { line, column, .. }) => {
            assert_eq!(line, 3);
            assert_eq!(column, "aY");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn short_tables_abort_before_training() {
    let fx = Fixture::new("short");
    fx.write_gesture("punch", 100, 0.0);
    fx.write_gesture("flex", 50, 0.0);

    let err = run_pipeline(&fx.config(), &fx.source()).unwrap_err();
    assert_eq!(err.stage, Stage::Assemble);
}

#[test]
fn full_run_writes_report_and_model() {
    let fx = Fixture::new("full");
    fx.write_gesture("punch", 119 * 5, 0.0);
    fx.write_gesture("flex", 119 * 5, 3.0);

    let mut config = fx.config();
    config.training.epochs = 3;
    let outcome = run_pipeline(&config, &fx.source()).unwrap();

    assert_eq!(outcome.history.epochs.len(), 3);
    assert_eq!(outcome.splits.train + outcome.splits.test + outcome.splits.validate, 10);
    assert!(outcome.test_evaluation.is_some());

    let report_path = fx.dir.join("report.json");
    write_report(&report_path, &config, &outcome).unwrap();
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["history"]["epochs"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["splits"]["train"], 6);

    let model_path = fx.dir.join("model.json");
    write_model(&model_path, &outcome.model).unwrap();
    let restored: TrainedModel =
        serde_json::from_str(&std::fs::read_to_string(&model_path).unwrap()).unwrap();
    assert_eq!(restored.network().layers().len(), 3);
    assert_eq!(
        restored.network().parameter_count(),
        outcome.model.network().parameter_count()
    );
    assert_eq!(restored.loss(), outcome.model.loss());
}
