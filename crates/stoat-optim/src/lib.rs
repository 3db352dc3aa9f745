//! # stoat-optim
//!
//! Optimizers that mutate parameter values in place through the borrowed
//! [`Param`] handles a model hands out via `named_parameters_mut()`.
//!
//! The usual training-step shape:
//! ```ignore
//! let mut params = model.named_parameters_mut();
//! opt.zero_grad(&mut params);
//! drop(params);
//! let out = model.forward(&x)?;
//! let (loss, grad) = mse_loss(&out, &y)?;
//! model.backward(&grad)?;
//! opt.step(&mut model.named_parameters_mut());
//! ```

pub mod adam;
pub mod sgd;

pub use adam::Adam;
pub use sgd::Sgd;

use stoat_nn::Param;

/// The optimizer contract: zero gradient buffers between logical steps,
/// and apply one update from the accumulated gradients.
pub trait Optimizer {
    /// Set every parameter's gradient accumulator to zero.
    fn zero_grad(&mut self, params: &mut [Param<'_>]) {
        for p in params.iter_mut() {
            p.grad.fill_(0.0);
        }
    }

    /// Update every parameter value in place from its accumulated gradient.
    fn step(&mut self, params: &mut [Param<'_>]);
}
