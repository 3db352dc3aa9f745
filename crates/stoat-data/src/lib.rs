//! # stoat-data
//!
//! Data plumbing for training loops: the [`Dataset`] capability the engine
//! consumes samples through, an in-memory [`TensorDataset`], a shuffling
//! [`DataLoader`] that stacks samples into batch tensors, and synthetic
//! dataset generators for demos and tests.

pub mod dataset;
pub mod loader;
pub mod synthetic;

pub use dataset::{Dataset, Sample, TensorDataset};
pub use loader::DataLoader;
pub use synthetic::{make_blobs, xor_dataset};
