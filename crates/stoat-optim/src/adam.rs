use std::collections::HashMap;

use stoat_core::Tensor;
use stoat_nn::Param;

use crate::Optimizer;

// Adam — adaptive moments
//
// Per parameter: first moment m and second moment v, decayed by beta1 and
// beta2, bias-corrected by 1 - beta^t. The time step t is shared across all
// parameters and incremented once per step() call.
//
// Moment state is keyed by the parameter's POSITION in the
// named_parameters_mut() traversal, not by the tensor's address. Traversal
// order is fixed for a given architecture, so the key stays stable even if
// the model value moves in memory; an address key would silently lose the
// moments on any move.

struct Moments {
    m: Tensor,
    v: Tensor,
}

/// The Adam optimizer (Kingma & Ba, 2015).
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    /// Shared time step, incremented once per `step()` call.
    t: i32,
    /// First/second moment pairs keyed by parameter traversal index.
    moments: HashMap<usize, Moments>,
}

impl Adam {
    /// Create an Adam optimizer with explicit hyperparameters.
    pub fn new(lr: f32, beta1: f32, beta2: f32, eps: f32) -> Self {
        Adam {
            lr,
            beta1,
            beta2,
            eps,
            t: 0,
            moments: HashMap::new(),
        }
    }

    /// The conventional defaults: beta1 = 0.9, beta2 = 0.999, eps = 1e-8.
    pub fn with_defaults(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8)
    }

    /// Number of `step()` calls so far.
    pub fn time_step(&self) -> i32 {
        self.t
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [Param<'_>]) {
        self.t += 1;
        let correction1 = 1.0 - self.beta1.powi(self.t);
        let correction2 = 1.0 - self.beta2.powi(self.t);

        for (idx, p) in params.iter_mut().enumerate() {
            // A grad whose shape drifted from its value is skipped rather
            // than corrupting the update.
            if !p.value.same_shape(p.grad) {
                continue;
            }

            let (rows, cols) = p.value.shape();
            let entry = self.moments.entry(idx).or_insert_with(|| Moments {
                m: Tensor::zeros(rows, cols),
                v: Tensor::zeros(rows, cols),
            });

            for (i, (&g, val)) in p
                .grad
                .data()
                .iter()
                .zip(p.value.data_mut().iter_mut())
                .enumerate()
            {
                let m = &mut entry.m.data_mut()[i];
                *m = self.beta1 * *m + (1.0 - self.beta1) * g;
                let v = &mut entry.v.data_mut()[i];
                *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;

                let m_hat = entry.m.data()[i] / correction1;
                let v_hat = entry.v.data()[i] / correction2;
                *val -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_matches_hand_computation() {
        // With bias correction, the very first Adam step moves each weight
        // by ~lr in the direction opposite the gradient sign (for eps ~ 0).
        let mut value = Tensor::from_vec(1, 2, vec![1.0, 1.0]).unwrap();
        let mut grad = Tensor::from_vec(1, 2, vec![0.5, -0.5]).unwrap();
        let mut opt = Adam::with_defaults(0.001);

        let mut params = vec![Param {
            name: "W".to_string(),
            value: &mut value,
            grad: &mut grad,
        }];
        opt.step(&mut params);
        drop(params);

        assert!((value[(0, 0)] - (1.0 - 0.001)).abs() < 1e-5);
        assert!((value[(0, 1)] - (1.0 + 0.001)).abs() < 1e-5);
        assert_eq!(opt.time_step(), 1);
    }

    #[test]
    fn test_moments_persist_across_steps() {
        let mut value = Tensor::ones(1, 1);
        let mut grad = Tensor::ones(1, 1);
        let mut opt = Adam::with_defaults(0.01);

        for _ in 0..3 {
            let mut params = vec![Param {
                name: "W".to_string(),
                value: &mut value,
                grad: &mut grad,
            }];
            opt.step(&mut params);
        }

        assert_eq!(opt.time_step(), 3);
        assert_eq!(opt.moments.len(), 1);
        // Constant gradient of 1.0 keeps pulling the value down.
        assert!(value[(0, 0)] < 1.0 - 0.02);
    }

    #[test]
    fn test_mismatched_grad_shape_is_skipped() {
        let mut value = Tensor::ones(2, 2);
        let mut grad = Tensor::ones(1, 2);
        let mut opt = Adam::with_defaults(0.1);

        let mut params = vec![Param {
            name: "W".to_string(),
            value: &mut value,
            grad: &mut grad,
        }];
        opt.step(&mut params);
        drop(params);

        // Untouched, and no moment state allocated for it.
        assert!(value.data().iter().all(|&v| v == 1.0));
        assert!(opt.moments.is_empty());
    }
}
