//! Seeded Shuffle-then-Split Assembly

use crate::dataset::Dataset;
use crate::error::DatasetError;
use crate::split::{split, DatasetSplits, SplitRatios};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

/// Assembles labeled recordings into shuffled train/test/validation slices
#[derive(Debug, Clone)]
pub struct DatasetAssembler {
    seed: u64,
    ratios: SplitRatios,
}

impl DatasetAssembler {
    /// Create an assembler; ratios are checked up front
    pub fn new(seed: u64, ratios: SplitRatios) -> Result<Self, DatasetError> {
        ratios.validate()?;
        Ok(Self { seed, ratios })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ratios(&self) -> &SplitRatios {
        &self.ratios
    }

    /// Uniformly random permutation of `0..n` drawn from the seeded RNG
    pub fn shuffle_order(&self, n: usize) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut rng);
        order
    }

    /// Shuffle `dataset` jointly and cut it into three slices
    pub fn assemble(&self, dataset: &Dataset) -> Result<DatasetSplits, DatasetError> {
        let n = dataset.len();
        if n == 0 {
            return Err(DatasetError::EmptyDataset);
        }

        let order = self.shuffle_order(n);
        let shuffled = dataset.permuted(&order);
        debug!("Shuffled {} recordings with seed {}", n, self.seed);

        let (train, test, validate) = split(&shuffled, &self.ratios);
        info!(
            "Split {} recordings: train={}, test={}, validate={}",
            n,
            train.len(),
            test.len(),
            validate.len()
        );

        Ok(DatasetSplits {
            train,
            test,
            validate,
            order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::{FeatureVector, LabelVector};
    use proptest::prelude::*;

    /// Dataset whose feature value encodes the original position and class
    fn tagged(n: usize, classes: usize) -> Dataset {
        let mut ds = Dataset::new();
        for i in 0..n {
            let class = i % classes;
            ds.push(
                FeatureVector::new(vec![i as f64, class as f64]),
                LabelVector::one_hot(class, classes).unwrap(),
            )
            .unwrap();
        }
        ds
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let assembler = DatasetAssembler::new(1337, SplitRatios::default()).unwrap();
        assert_eq!(
            assembler.assemble(&Dataset::new()).unwrap_err(),
            DatasetError::EmptyDataset
        );
    }

    #[test]
    fn test_invalid_ratios_rejected() {
        let ratios = SplitRatios { train: 0.7, test: 0.7 };
        assert!(DatasetAssembler::new(1, ratios).is_err());
    }

    #[test]
    fn test_six_recordings_split_three_one_two() {
        let assembler = DatasetAssembler::new(1337, SplitRatios::default()).unwrap();
        let splits = assembler.assemble(&tagged(6, 2)).unwrap();

        assert_eq!(splits.train.len(), 3);
        assert_eq!(splits.test.len(), 1);
        assert_eq!(splits.validate.len(), 2);
        assert_eq!(splits.total(), 6);
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = DatasetAssembler::new(42, SplitRatios::default()).unwrap();
        let b = DatasetAssembler::new(42, SplitRatios::default()).unwrap();
        let ds = tagged(50, 3);

        assert_eq!(a.assemble(&ds).unwrap(), b.assemble(&ds).unwrap());
    }

    #[test]
    fn test_different_seed_different_order() {
        let a = DatasetAssembler::new(1, SplitRatios::default()).unwrap();
        let b = DatasetAssembler::new(2, SplitRatios::default()).unwrap();
        assert_ne!(a.shuffle_order(100), b.shuffle_order(100));
    }

    proptest! {
        #[test]
        fn shuffle_preserves_pairing(n in 1usize..200, seed in any::<u64>()) {
            let assembler = DatasetAssembler::new(seed, SplitRatios::default()).unwrap();
            let splits = assembler.assemble(&tagged(n, 3)).unwrap();

            let mut sorted = splits.order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());

            let mut position = 0;
            for part in [&splits.train, &splits.test, &splits.validate] {
                for (features, label) in part.iter() {
                    prop_assert_eq!(features.values[0] as usize, splits.order[position]);
                    prop_assert_eq!(Some(features.values[1] as usize), label.class_index());
                    position += 1;
                }
            }
            prop_assert_eq!(position, n);
            prop_assert_eq!(splits.train.len(), (0.6 * n as f64) as usize);
        }
    }
}
