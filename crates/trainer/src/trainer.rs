//! Epoch Training Loop

use crate::engine::TrainedModel;
use crate::loss::{Loss, Metric};
use crate::network::Network;
use crate::optimizer::{Optimizer, OptimizerKind};
use crate::TrainerError;
use dataset::Dataset;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Full passes over the training slice (default: 600)
    pub epochs: usize,
    /// Samples per gradient step (default: 1)
    pub batch_size: usize,
    /// Optimizer (default: rmsprop)
    pub optimizer: OptimizerKind,
    /// Overrides the optimizer's default learning rate
    pub learning_rate: Option<f64>,
    /// Loss (default: mse)
    pub loss: Loss,
    /// Reported metric (default: mae)
    pub metric: Metric,
    /// Reshuffle the training slice every epoch (default: true)
    pub shuffle: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 600,
            batch_size: 1,
            optimizer: OptimizerKind::Rmsprop,
            learning_rate: None,
            loss: Loss::Mse,
            metric: Metric::Mae,
            shuffle: true,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.epochs == 0 {
            return Err(TrainerError::InvalidConfig("epochs must be at least 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(TrainerError::InvalidConfig("batch_size must be at least 1".to_string()));
        }
        if let Some(lr) = self.learning_rate {
            if !lr.is_finite() || lr <= 0.0 {
                return Err(TrainerError::InvalidConfig(format!(
                    "learning_rate must be positive, got {lr}"
                )));
            }
        }
        Ok(())
    }
}

/// Loss and metric values of one epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 1-based epoch number
    pub epoch: usize,
    /// Mean training loss over the epoch's batches
    pub loss: f64,
    /// Mean training metric over the epoch's batches
    pub metric: f64,
    /// Validation loss after the epoch; `None` without validation data
    pub val_loss: Option<f64>,
    pub val_metric: Option<f64>,
}

/// Per-epoch record of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub loss: Loss,
    pub metric: Metric,
    pub epochs: Vec<EpochMetrics>,
}

impl History {
    /// Metrics of the last completed epoch
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }
}

/// Fits the gesture classifier on a training slice
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
    seed: u64,
}

impl Trainer {
    /// Create a trainer; `seed` drives weight init and per-epoch shuffling
    pub fn new(config: TrainingConfig, seed: u64) -> Result<Self, TrainerError> {
        config.validate()?;
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train for the configured number of epochs, validating after each one
    pub fn fit(
        &self,
        train: &Dataset,
        validate: &Dataset,
    ) -> Result<(TrainedModel, History), TrainerError> {
        let (inputs, classes) = match (train.feature_dimension(), train.num_classes()) {
            (Some(inputs), Some(classes)) => (inputs, classes),
            _ => return Err(TrainerError::EmptyTrainingSet),
        };

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut network = Network::gesture_classifier(inputs, classes, &mut rng);
        let mut optimizer =
            Optimizer::new(self.config.optimizer, self.config.learning_rate, network.layers());

        let (x_train, y_train) = to_matrices(train, inputs, classes)?;
        let val = if validate.is_empty() {
            None
        } else {
            Some(to_matrices(validate, inputs, classes)?)
        };

        info!(
            "Training {} parameters on {} samples ({} validation): optimizer={}, loss={}, metric={}, epochs={}, batch_size={}",
            network.parameter_count(),
            train.len(),
            validate.len(),
            self.config.optimizer.as_str(),
            self.config.loss.as_str(),
            self.config.metric.as_str(),
            self.config.epochs,
            self.config.batch_size
        );

        let mut order: Vec<usize> = (0..train.len()).collect();
        let mut epochs = Vec::with_capacity(self.config.epochs);

        for epoch in 1..=self.config.epochs {
            if self.config.shuffle {
                order.shuffle(&mut rng);
            }

            let mut loss_sum = 0.0;
            let mut metric_sum = 0.0;
            for batch in order.chunks(self.config.batch_size) {
                let xb = x_train.select(Axis(0), batch);
                let yb = y_train.select(Axis(0), batch);

                let caches = network.forward_cached(&xb);
                let predicted = match caches.last() {
                    Some(cache) => &cache.output,
                    None => return Err(TrainerError::InvalidConfig("network has no layers".to_string())),
                };

                let loss = self.config.loss.value(predicted, &yb);
                if !loss.is_finite() {
                    return Err(TrainerError::NonFiniteLoss { epoch });
                }
                loss_sum += loss * batch.len() as f64;
                metric_sum += self.config.metric.value(predicted, &yb) * batch.len() as f64;

                let grad = self.config.loss.gradient(predicted, &yb);
                let gradients = network.backward(&caches, grad);
                optimizer.step(network.layers_mut(), &gradients);
            }

            let n = train.len() as f64;
            let (val_loss, val_metric) = match &val {
                Some((x_val, y_val)) => {
                    let predicted = network.predict(x_val);
                    (
                        Some(self.config.loss.value(&predicted, y_val)),
                        Some(self.config.metric.value(&predicted, y_val)),
                    )
                }
                None => (None, None),
            };

            let metrics = EpochMetrics {
                epoch,
                loss: loss_sum / n,
                metric: metric_sum / n,
                val_loss,
                val_metric,
            };
            log_epoch(&metrics, self.config.epochs, &self.config);
            epochs.push(metrics);
        }

        debug!("Applied {} optimizer updates", optimizer.iterations());

        let model = TrainedModel::new(network, self.config.loss, self.config.metric);
        let history = History {
            loss: self.config.loss,
            metric: self.config.metric,
            epochs,
        };
        Ok((model, history))
    }
}

fn log_epoch(m: &EpochMetrics, total: usize, config: &TrainingConfig) {
    let metric = config.metric.as_str();
    match (m.val_loss, m.val_metric) {
        (Some(val_loss), Some(val_metric)) => info!(
            "Epoch {}/{} - loss: {:.4} - {}: {:.4} - val_loss: {:.4} - val_{}: {:.4}",
            m.epoch, total, m.loss, metric, m.metric, val_loss, metric, val_metric
        ),
        _ => info!(
            "Epoch {}/{} - loss: {:.4} - {}: {:.4}",
            m.epoch, total, m.loss, metric, m.metric
        ),
    }
}

/// Stack a dataset into (features, labels) matrices, checking widths
pub(crate) fn to_matrices(
    data: &Dataset,
    inputs: usize,
    classes: usize,
) -> Result<(Array2<f64>, Array2<f64>), TrainerError> {
    let n = data.len();
    let mut x = Vec::with_capacity(n * inputs);
    let mut y = Vec::with_capacity(n * classes);

    for (features, label) in data.iter() {
        if features.len() != inputs {
            return Err(TrainerError::ShapeMismatch {
                expected: inputs,
                actual: features.len(),
            });
        }
        if label.num_classes() != classes {
            return Err(TrainerError::ShapeMismatch {
                expected: classes,
                actual: label.num_classes(),
            });
        }
        x.extend_from_slice(features.as_slice());
        y.extend_from_slice(label.as_slice());
    }

    let x = Array2::from_shape_vec((n, inputs), x)
        .map_err(|e| TrainerError::InvalidConfig(e.to_string()))?;
    let y = Array2::from_shape_vec((n, classes), y)
        .map_err(|e| TrainerError::InvalidConfig(e.to_string()))?;
    Ok((x, y))
}
