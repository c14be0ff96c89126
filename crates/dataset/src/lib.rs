//! Dataset Assembly
//!
//! Collects labeled recordings into paired collections, shuffles them with an
//! explicit seed, and splits them into train/test/validation slices.

mod assembler;
mod dataset;
mod error;
mod split;

pub use assembler::DatasetAssembler;
pub use dataset::Dataset;
pub use error::DatasetError;
pub use split::{split, DatasetSplits, SplitRatios};
