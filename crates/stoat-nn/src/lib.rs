//! # stoat-nn
//!
//! Neural network layers with hand-written backward passes.
//!
//! There is no computation graph here: every layer implements the
//! three-method [`Module`] contract — `forward` caches what its own
//! `backward` will need, `backward` consumes that cache, accumulates into
//! the layer's gradient buffers, and returns the gradient with respect to
//! its input. [`Sequential`] chains layers by threading forward outputs
//! down the list and backward gradients back up it.
//!
//! Losses close the loop: each returns a scalar loss together with the
//! gradient of that loss with respect to the predictions, which is what you
//! feed into the model's `backward`.

pub mod activation;
pub mod dense;
pub mod init;
pub mod loss;
pub mod module;
pub mod sequential;

pub use activation::{ReLU, Sigmoid};
pub use dense::Dense;
pub use init::Init;
pub use loss::{bce_with_logits, mse_loss, softmax_cross_entropy_with_logits};
pub use module::{Module, NamedParam, Param};
pub use sequential::Sequential;
