//! Trained Model Inference and Evaluation

use crate::loss::{accuracy, argmax, Loss, Metric};
use crate::network::Network;
use crate::trainer::to_matrices;
use crate::TrainerError;
use dataset::Dataset;
use feature_engine::FeatureVector;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Class prediction for one feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Index into the gesture list
    pub class_index: usize,
    /// Probability of the predicted class
    pub confidence: f64,
    /// Probabilities for each class
    pub probabilities: Vec<f64>,
}

/// Scores of a model on a labeled dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub samples: usize,
    pub loss: f64,
    pub metric: f64,
    pub accuracy: f64,
}

/// Network fitted by the trainer, with the loss and metric it was trained against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    network: Network,
    loss: Loss,
    metric: Metric,
}

impl TrainedModel {
    pub fn new(network: Network, loss: Loss, metric: Metric) -> Self {
        Self {
            network,
            loss,
            metric,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn loss(&self) -> Loss {
        self.loss
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Classify one feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, TrainerError> {
        let expected = self.network.input_dimension();
        if features.len() != expected {
            return Err(TrainerError::ShapeMismatch {
                expected,
                actual: features.len(),
            });
        }

        let input = Array2::from_shape_vec((1, expected), features.values.clone())
            .map_err(|e| TrainerError::InvalidConfig(e.to_string()))?;
        let probabilities = self.network.predict(&input).row(0).to_vec();
        let class_index = argmax(probabilities.iter().copied()).unwrap_or(0);
        let confidence = probabilities.get(class_index).copied().unwrap_or(0.0);

        debug!("Predicted class {} (conf={:.3})", class_index, confidence);

        Ok(Prediction {
            class_index,
            confidence,
            probabilities,
        })
    }

    /// Loss, metric and accuracy over a labeled dataset
    pub fn evaluate(&self, data: &Dataset) -> Result<Evaluation, TrainerError> {
        if data.is_empty() {
            return Err(TrainerError::EmptyEvaluationSet);
        }
        let (x, y) = to_matrices(
            data,
            self.network.input_dimension(),
            self.network.output_dimension(),
        )?;
        let predicted = self.network.predict(&x);

        Ok(Evaluation {
            samples: data.len(),
            loss: self.loss.value(&predicted, &y),
            metric: self.metric.value(&predicted, &y),
            accuracy: accuracy(&predicted, &y),
        })
    }
}
