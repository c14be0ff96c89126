//! Losses and Reported Metrics

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Probability clipping bound for cross-entropy
const EPSILON: f64 = 1e-7;

/// Training loss, averaged over output units and then over the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    /// Mean squared error
    Mse,
    /// Mean absolute error
    Mae,
    /// Categorical cross-entropy on clipped probabilities
    CategoricalCrossentropy,
}

impl Loss {
    pub fn as_str(&self) -> &'static str {
        match self {
            Loss::Mse => "mse",
            Loss::Mae => "mae",
            Loss::CategoricalCrossentropy => "categorical_crossentropy",
        }
    }

    /// Mean loss over a batch
    pub fn value(&self, predicted: &Array2<f64>, target: &Array2<f64>) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        match self {
            Loss::Mse => mean_squared_error(predicted, target),
            Loss::Mae => mean_absolute_error(predicted, target),
            Loss::CategoricalCrossentropy => {
                let per_sample = (target * &predicted.mapv(|p| p.clamp(EPSILON, 1.0 - EPSILON).ln()))
                    .sum_axis(Axis(1));
                -per_sample.mean().unwrap_or(0.0)
            }
        }
    }

    /// Gradient of `value` w.r.t. `predicted`
    pub fn gradient(&self, predicted: &Array2<f64>, target: &Array2<f64>) -> Array2<f64> {
        let (batch, units) = predicted.dim();
        let batch = batch.max(1) as f64;
        let count = batch * units.max(1) as f64;
        let diff = predicted - target;
        match self {
            Loss::Mse => diff.mapv(|d| 2.0 * d / count),
            Loss::Mae => diff.mapv(|d| sign(d) / count),
            Loss::CategoricalCrossentropy => {
                let mut grad = Array2::zeros(predicted.dim());
                ndarray::Zip::from(&mut grad)
                    .and(predicted)
                    .and(target)
                    .for_each(|g, &p, &t| {
                        // clipped entries carry no gradient
                        if p > EPSILON && p < 1.0 - EPSILON {
                            *g = -t / (p * batch);
                        }
                    });
                grad
            }
        }
    }
}

/// Metric reported alongside the loss; never differentiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Mae,
    Mse,
    /// Fraction of samples whose arg-max matches the target's
    Accuracy,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Mae => "mae",
            Metric::Mse => "mse",
            Metric::Accuracy => "accuracy",
        }
    }

    pub fn value(&self, predicted: &Array2<f64>, target: &Array2<f64>) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        match self {
            Metric::Mae => mean_absolute_error(predicted, target),
            Metric::Mse => mean_squared_error(predicted, target),
            Metric::Accuracy => accuracy(predicted, target),
        }
    }
}

fn mean_squared_error(predicted: &Array2<f64>, target: &Array2<f64>) -> f64 {
    (predicted - target).mapv(|d| d * d).mean().unwrap_or(0.0)
}

fn mean_absolute_error(predicted: &Array2<f64>, target: &Array2<f64>) -> f64 {
    (predicted - target).mapv(f64::abs).mean().unwrap_or(0.0)
}

/// Fraction of rows where predicted and target arg-max agree
pub fn accuracy(predicted: &Array2<f64>, target: &Array2<f64>) -> f64 {
    let rows = predicted.nrows();
    if rows == 0 {
        return 0.0;
    }
    let hits = predicted
        .rows()
        .into_iter()
        .zip(target.rows())
        .filter(|(p, t)| argmax(p.iter().copied()) == argmax(t.iter().copied()))
        .count();
    hits as f64 / rows as f64
}

/// Index of the largest value; first wins on ties
pub fn argmax(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    values
        .into_iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn sign(d: f64) -> f64 {
    if d > 0.0 {
        1.0
    } else if d < 0.0 {
        -1.0
    } else {
        0.0
    }
}
