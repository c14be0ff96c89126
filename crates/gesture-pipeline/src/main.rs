//! Gesture Trainer - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use gesture_data::CsvDirectory;
use gesture_pipeline::{init_logging, run_pipeline, write_model, write_report, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "gesture-train", about = "Train an IMU gesture classifier from labeled CSV recordings")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory holding one <gesture>.csv per label
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    epochs: Option<usize>,
    /// Write history and test evaluation as JSON
    #[arg(long)]
    report: Option<PathBuf>,
    /// Write the trained model as JSON
    #[arg(long)]
    model_out: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json).context("failed to install tracing subscriber")?;

    info!("=== Gesture Trainer v{} ===", env!("CARGO_PKG_VERSION"));

    let mut config = PipelineConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(epochs) = cli.epochs {
        config.training.epochs = epochs;
    }

    info!(
        "Gestures {:?} from {} (seed={})",
        config.gestures.labels(),
        config.data_dir.display(),
        config.seed
    );

    let source = CsvDirectory::new(&config.data_dir);
    let outcome = run_pipeline(&config, &source)?;

    if let Some(path) = &cli.report {
        write_report(path, &config, &outcome)?;
    }
    if let Some(path) = &cli.model_out {
        write_model(path, &outcome.model)?;
    }

    if let Some(last) = outcome.history.last() {
        info!("Training finished after {} epochs (loss={:.4})", last.epoch, last.loss);
    }
    Ok(())
}
