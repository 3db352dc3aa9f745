use stoat_core::math::{relu, relu_backward, sigmoid, sigmoid_backward_from_output};
use stoat_core::{Error, Result, Tensor};

use crate::module::Module;

// Activation layers
//
// Parameter-free: all they own is the forward cache their backward needs.
// ReLU keeps the pre-activation input (the derivative depends on the sign
// of x); Sigmoid keeps its output (the derivative y*(1-y) is cheaper from
// the output than recomputing the sigmoid).

/// ReLU activation layer: `max(0, x)`.
#[derive(Default)]
pub struct ReLU {
    x_cache: Option<Tensor>,
}

impl ReLU {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for ReLU {
    fn forward(&mut self, x: &Tensor) -> Result<Tensor> {
        self.x_cache = Some(x.clone());
        Ok(relu(x))
    }

    fn backward(&mut self, grad_out: &Tensor) -> Result<Tensor> {
        let x = self
            .x_cache
            .take()
            .ok_or(Error::BackwardBeforeForward { layer: "ReLU" })?;
        relu_backward(&x, grad_out)
    }
}

/// Sigmoid activation layer: `1 / (1 + e^-x)`, branch-stable.
#[derive(Default)]
pub struct Sigmoid {
    y_cache: Option<Tensor>,
}

impl Sigmoid {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Module for Sigmoid {
    fn forward(&mut self, x: &Tensor) -> Result<Tensor> {
        let y = sigmoid(x);
        self.y_cache = Some(y.clone());
        Ok(y)
    }

    fn backward(&mut self, grad_out: &Tensor) -> Result<Tensor> {
        let y = self
            .y_cache
            .take()
            .ok_or(Error::BackwardBeforeForward { layer: "Sigmoid" })?;
        sigmoid_backward_from_output(&y, grad_out)
    }
}
