//! Stoat — a small neural-network training engine with hand-written backprop.
//!
//! The workspace is split into focused crates, re-exported here:
//! - [`stoat_core`]: the 2-D `Tensor` type and the math kernels.
//! - [`stoat_nn`]: layers (`Dense`, `ReLU`, `Sigmoid`, `Sequential`), the
//!   `Module` trait, and loss functions.
//! - [`stoat_optim`]: `Sgd` and `Adam`.
//! - [`stoat_data`]: datasets, the mini-batch `DataLoader`, and synthetic
//!   data generators.
//!
//! This crate adds the binary checkpoint codec ([`checkpoint`]) and a
//! [`prelude`] for demos and tests.
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use stoat::prelude::*;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut model = Sequential::new()
//!     .add(Dense::new(2, 8, &mut rng))
//!     .add(ReLU::new())
//!     .add(Dense::new(8, 1, &mut rng));
//!
//! let x = Tensor::from_vec(4, 2, vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0])?;
//! let y = model.forward(&x)?;
//! assert_eq!(y.shape(), (4, 1));
//! # Ok::<(), stoat::Error>(())
//! ```

pub mod checkpoint;

pub use stoat_core::{Error, Result, Tensor};

pub mod prelude {
    //! Everything a training driver typically needs.

    pub use stoat_core::{math, Error, Result, Tensor};
    pub use stoat_data::{make_blobs, xor_dataset, DataLoader, Dataset, Sample, TensorDataset};
    pub use stoat_nn::{
        bce_with_logits, mse_loss, softmax_cross_entropy_with_logits, Dense, Init, Module,
        NamedParam, Param, ReLU, Sequential, Sigmoid,
    };
    pub use stoat_optim::{Adam, Optimizer, Sgd};

    pub use crate::checkpoint::{self, Persist};
}
