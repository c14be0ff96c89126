//! Sequential Feed-Forward Network

use crate::layer::{Activation, Dense, DenseGradient, LayerCache};
use crate::TrainerError;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Widths of the hidden layers of the gesture classifier
pub const HIDDEN_LAYER_WIDTHS: [usize; 2] = [50, 15];

/// Stack of dense layers applied in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    layers: Vec<Dense>,
}

impl Network {
    /// Build from layers; each layer's input width must match the previous layer's units
    pub fn new(layers: Vec<Dense>) -> Result<Self, TrainerError> {
        if layers.is_empty() {
            return Err(TrainerError::InvalidConfig("network has no layers".to_string()));
        }
        for pair in layers.windows(2) {
            if pair[0].units() != pair[1].inputs() {
                return Err(TrainerError::ShapeMismatch {
                    expected: pair[0].units(),
                    actual: pair[1].inputs(),
                });
            }
        }
        Ok(Self { layers })
    }

    /// Gesture classifier: Dense(50, relu) -> Dense(15, relu) -> Dense(classes, softmax)
    pub fn gesture_classifier(inputs: usize, classes: usize, rng: &mut impl Rng) -> Self {
        let [first, second] = HIDDEN_LAYER_WIDTHS;
        Self {
            layers: vec![
                Dense::glorot_uniform(inputs, first, Activation::Relu, rng),
                Dense::glorot_uniform(first, second, Activation::Relu, rng),
                Dense::glorot_uniform(second, classes, Activation::Softmax, rng),
            ],
        }
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Dense] {
        &mut self.layers
    }

    /// Expected feature width
    pub fn input_dimension(&self) -> usize {
        self.layers.first().map(Dense::inputs).unwrap_or(0)
    }

    /// Number of output classes
    pub fn output_dimension(&self) -> usize {
        self.layers.last().map(Dense::units).unwrap_or(0)
    }

    /// Total trainable parameters
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.bias.len())
            .sum()
    }

    /// Batch forward pass
    pub fn predict(&self, input: &Array2<f64>) -> Array2<f64> {
        self.layers
            .iter()
            .fold(input.clone(), |x, layer| layer.forward(&x))
    }

    /// Forward pass keeping per-layer caches for backpropagation
    pub fn forward_cached(&self, input: &Array2<f64>) -> Vec<LayerCache> {
        let mut caches: Vec<LayerCache> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let cache = match caches.last() {
                Some(prev) => layer.forward_cached(&prev.output),
                None => layer.forward_cached(input),
            };
            caches.push(cache);
        }
        caches
    }

    /// Parameter gradients given dLoss/dOutput of the last layer
    pub fn backward(&self, caches: &[LayerCache], grad_output: Array2<f64>) -> Vec<DenseGradient> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut grad = grad_output;
        for (layer, cache) in self.layers.iter().zip(caches).rev() {
            let (gradient, grad_input) = layer.backward(cache, &grad);
            gradients.push(gradient);
            grad = grad_input;
        }
        gradients.reverse();
        gradients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::Loss;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gesture_classifier_topology() {
        let mut rng = StdRng::seed_from_u64(1337);
        let net = Network::gesture_classifier(714, 2, &mut rng);

        let widths: Vec<usize> = net.layers().iter().map(Dense::units).collect();
        assert_eq!(widths, vec![50, 15, 2]);
        assert_eq!(net.layers()[0].activation, Activation::Relu);
        assert_eq!(net.layers()[1].activation, Activation::Relu);
        assert_eq!(net.layers()[2].activation, Activation::Softmax);
        assert_eq!(net.input_dimension(), 714);
        assert_eq!(net.parameter_count(), 714 * 50 + 50 + 50 * 15 + 15 + 15 * 2 + 2);
    }

    #[test]
    fn test_same_seed_same_weights() {
        let a = Network::gesture_classifier(12, 3, &mut StdRng::seed_from_u64(9));
        let b = Network::gesture_classifier(12, 3, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_new_rejects_mismatched_layers() {
        let mut rng = StdRng::seed_from_u64(0);
        let layers = vec![
            Dense::glorot_uniform(4, 3, Activation::Relu, &mut rng),
            Dense::glorot_uniform(5, 2, Activation::Softmax, &mut rng),
        ];
        assert!(matches!(
            Network::new(layers),
            Err(TrainerError::ShapeMismatch { expected: 3, actual: 5 })
        ));
        assert!(Network::new(Vec::new()).is_err());
    }

    #[test]
    fn test_predict_outputs_probabilities() {
        let net = Network::gesture_classifier(6, 4, &mut StdRng::seed_from_u64(5));
        let out = net.predict(&Array2::from_elem((3, 6), 0.5));
        assert_eq!(out.dim(), (3, 4));
        for row in out.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_backprop_matches_finite_difference() {
        let mut net = Network::gesture_classifier(3, 2, &mut StdRng::seed_from_u64(21));
        let x = array![[0.2, 0.9, 0.4], [0.7, 0.1, 0.5]];
        let y = array![[1.0, 0.0], [0.0, 1.0]];
        let loss = Loss::Mse;

        let caches = net.forward_cached(&x);
        let output = &caches.last().unwrap().output;
        let grads = net.backward(&caches, loss.gradient(output, &y));

        let h = 1e-6;
        for layer_idx in 0..net.layers().len() {
            let (rows, cols) = net.layers()[layer_idx].weights.dim();
            for i in 0..rows {
                for j in 0..cols {
                    let original = net.layers()[layer_idx].weights[[i, j]];
                    net.layers_mut()[layer_idx].weights[[i, j]] = original + h;
                    let plus = loss.value(&net.predict(&x), &y);
                    net.layers_mut()[layer_idx].weights[[i, j]] = original - h;
                    let minus = loss.value(&net.predict(&x), &y);
                    net.layers_mut()[layer_idx].weights[[i, j]] = original;

                    let numeric = (plus - minus) / (2.0 * h);
                    let analytic = grads[layer_idx].weights[[i, j]];
                    assert!(
                        (numeric - analytic).abs() < 1e-6,
                        "layer {layer_idx} w[{i},{j}]: {numeric} vs {analytic}"
                    );
                }
            }
        }
    }
}
