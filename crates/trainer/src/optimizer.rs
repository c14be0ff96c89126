//! Gradient-Descent Optimizers

use crate::layer::{Dense, DenseGradient};
use ndarray::{Array, Dimension, Zip};
use serde::{Deserialize, Serialize};

/// Optimizer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    /// RMSprop: rho 0.9, epsilon 1e-7
    Rmsprop,
    /// Adam: beta1 0.9, beta2 0.999, epsilon 1e-7
    Adam,
    /// Plain stochastic gradient descent
    Sgd,
}

impl OptimizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizerKind::Rmsprop => "rmsprop",
            OptimizerKind::Adam => "adam",
            OptimizerKind::Sgd => "sgd",
        }
    }

    pub fn default_learning_rate(&self) -> f64 {
        match self {
            OptimizerKind::Rmsprop | OptimizerKind::Adam => 0.001,
            OptimizerKind::Sgd => 0.01,
        }
    }
}

const RHO: f64 = 0.9;
const BETA_1: f64 = 0.9;
const BETA_2: f64 = 0.999;
const EPSILON: f64 = 1e-7;

/// Per-parameter accumulators
#[derive(Debug, Clone)]
struct Slots<D: Dimension> {
    first: Array<f64, D>,
    second: Array<f64, D>,
}

impl<D: Dimension> Slots<D> {
    fn zeros_like(param: &Array<f64, D>) -> Self {
        Self {
            first: Array::zeros(param.raw_dim()),
            second: Array::zeros(param.raw_dim()),
        }
    }
}

#[derive(Debug, Clone)]
struct LayerSlots {
    weights: Slots<ndarray::Ix2>,
    bias: Slots<ndarray::Ix1>,
}

/// Stateful optimizer bound to one network's parameter shapes
#[derive(Debug, Clone)]
pub struct Optimizer {
    kind: OptimizerKind,
    learning_rate: f64,
    iterations: u64,
    slots: Vec<LayerSlots>,
}

impl Optimizer {
    /// Create an optimizer for `layers`; `None` selects the kind's default rate
    pub fn new(kind: OptimizerKind, learning_rate: Option<f64>, layers: &[Dense]) -> Self {
        let slots = layers
            .iter()
            .map(|layer| LayerSlots {
                weights: Slots::zeros_like(&layer.weights),
                bias: Slots::zeros_like(&layer.bias),
            })
            .collect();
        Self {
            kind,
            learning_rate: learning_rate.unwrap_or_else(|| kind.default_learning_rate()),
            iterations: 0,
            slots,
        }
    }

    pub fn kind(&self) -> OptimizerKind {
        self.kind
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Number of updates applied so far
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Apply one update step; `gradients` align with `layers`
    pub fn step(&mut self, layers: &mut [Dense], gradients: &[DenseGradient]) {
        self.iterations += 1;
        let rule = UpdateRule {
            kind: self.kind,
            learning_rate: self.learning_rate,
            iteration: self.iterations,
        };
        for ((layer, grad), slots) in layers.iter_mut().zip(gradients).zip(&mut self.slots) {
            rule.apply(&mut layer.weights, &grad.weights, &mut slots.weights);
            rule.apply(&mut layer.bias, &grad.bias, &mut slots.bias);
        }
    }
}

struct UpdateRule {
    kind: OptimizerKind,
    learning_rate: f64,
    iteration: u64,
}

impl UpdateRule {
    fn apply<D: Dimension>(&self, param: &mut Array<f64, D>, grad: &Array<f64, D>, slots: &mut Slots<D>) {
        let lr = self.learning_rate;
        match self.kind {
            OptimizerKind::Rmsprop => {
                Zip::from(param)
                    .and(grad)
                    .and(&mut slots.second)
                    .for_each(|p, &g, v| {
                        *v = RHO * *v + (1.0 - RHO) * g * g;
                        *p -= lr * g / (v.sqrt() + EPSILON);
                    });
            }
            OptimizerKind::Adam => {
                let t = self.iteration as i32;
                let lr_t = lr * (1.0 - BETA_2.powi(t)).sqrt() / (1.0 - BETA_1.powi(t));
                Zip::from(param)
                    .and(grad)
                    .and(&mut slots.first)
                    .and(&mut slots.second)
                    .for_each(|p, &g, m, v| {
                        *m = BETA_1 * *m + (1.0 - BETA_1) * g;
                        *v = BETA_2 * *v + (1.0 - BETA_2) * g * g;
                        *p -= lr_t * *m / (v.sqrt() + EPSILON);
                    });
            }
            OptimizerKind::Sgd => {
                Zip::from(param).and(grad).for_each(|p, &g| *p -= lr * g);
            }
        }
    }
}
