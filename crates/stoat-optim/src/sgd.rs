use stoat_nn::Param;

use crate::Optimizer;

// Stochastic gradient descent: value -= lr * grad
//
// Stateless beyond the learning rate.

/// Plain SGD with a fixed learning rate.
pub struct Sgd {
    lr: f32,
}

impl Sgd {
    pub fn new(lr: f32) -> Self {
        Sgd { lr }
    }

    pub fn learning_rate(&self) -> f32 {
        self.lr
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut [Param<'_>]) {
        for p in params.iter_mut() {
            for (v, &g) in p.value.data_mut().iter_mut().zip(p.grad.data()) {
                *v -= self.lr * g;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoat_core::Tensor;

    #[test]
    fn test_single_step() {
        let mut value = Tensor::from_vec(1, 2, vec![1.0, -1.0]).unwrap();
        let mut grad = Tensor::from_vec(1, 2, vec![0.5, 0.5]).unwrap();
        let mut opt = Sgd::new(0.1);

        let mut params = vec![Param {
            name: "W".to_string(),
            value: &mut value,
            grad: &mut grad,
        }];
        opt.step(&mut params);
        drop(params);

        assert!((value[(0, 0)] - 0.95).abs() < 1e-6);
        assert!((value[(0, 1)] - (-1.05)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_grad_clears_accumulators() {
        let mut value = Tensor::ones(2, 2);
        let mut grad = Tensor::ones(2, 2);
        let mut opt = Sgd::new(0.1);

        let mut params = vec![Param {
            name: "W".to_string(),
            value: &mut value,
            grad: &mut grad,
        }];
        opt.zero_grad(&mut params);
        drop(params);

        assert!(grad.data().iter().all(|&g| g == 0.0));
        // zero_grad must not touch values.
        assert!(value.data().iter().all(|&v| v == 1.0));
    }
}
