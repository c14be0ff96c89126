//! Dense Layers and Activations

use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Activation applied after a dense layer's affine map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// max(0, z)
    Relu,
    /// Row-wise normalized exponentials
    Softmax,
}

impl Activation {
    /// Apply to a batch of pre-activations (one row per sample)
    pub fn forward(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::Relu => z.mapv(|v| v.max(0.0)),
            Activation::Softmax => {
                let mut out = z.clone();
                for mut row in out.rows_mut() {
                    let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
                    row.mapv_inplace(|v| (v - max).exp());
                    let sum = row.sum();
                    row.mapv_inplace(|v| v / sum);
                }
                out
            }
        }
    }

    /// Gradient w.r.t. pre-activations given the upstream gradient `grad`
    /// w.r.t. the activation output `a`
    pub fn backward(&self, z: &Array2<f64>, a: &Array2<f64>, grad: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::Relu => {
                let mask = z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
                grad * &mask
            }
            Activation::Softmax => {
                // dz_j = a_j * (g_j - sum_i g_i a_i), per row
                let dot = (grad * a).sum_axis(Axis(1)).insert_axis(Axis(1));
                a * &(grad - &dot)
            }
        }
    }
}

/// Fully connected layer: `a = activation(x · W + b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    /// Kernel of shape (inputs, units)
    pub weights: Array2<f64>,
    /// Bias of shape (units)
    pub bias: Array1<f64>,
    pub activation: Activation,
}

/// Intermediate values of one layer's forward pass
#[derive(Debug, Clone)]
pub struct LayerCache {
    pub input: Array2<f64>,
    pub pre_activation: Array2<f64>,
    pub output: Array2<f64>,
}

/// Parameter gradients of one layer
#[derive(Debug, Clone)]
pub struct DenseGradient {
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
}

impl Dense {
    /// Glorot-uniform kernel, zero bias
    pub fn glorot_uniform(
        inputs: usize,
        units: usize,
        activation: Activation,
        rng: &mut impl Rng,
    ) -> Self {
        let limit = (6.0 / (inputs + units) as f64).sqrt();
        let weights = Array2::from_shape_fn((inputs, units), |_| rng.random_range(-limit..limit));
        Self {
            weights,
            bias: Array1::zeros(units),
            activation,
        }
    }

    pub fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn units(&self) -> usize {
        self.weights.ncols()
    }

    /// Forward pass keeping the values backpropagation needs
    pub fn forward_cached(&self, input: &Array2<f64>) -> LayerCache {
        let pre_activation = input.dot(&self.weights) + &self.bias;
        let output = self.activation.forward(&pre_activation);
        LayerCache {
            input: input.clone(),
            pre_activation,
            output,
        }
    }

    pub fn forward(&self, input: &Array2<f64>) -> Array2<f64> {
        let pre_activation = input.dot(&self.weights) + &self.bias;
        self.activation.forward(&pre_activation)
    }

    /// Parameter gradients and the gradient w.r.t. the layer input
    pub fn backward(&self, cache: &LayerCache, grad_output: &Array2<f64>) -> (DenseGradient, Array2<f64>) {
        let dz = self
            .activation
            .backward(&cache.pre_activation, &cache.output, grad_output);
        let gradient = DenseGradient {
            weights: cache.input.t().dot(&dz),
            bias: dz.sum_axis(Axis(0)),
        };
        let grad_input = dz.dot(&self.weights.t());
        (gradient, grad_input)
    }
}
