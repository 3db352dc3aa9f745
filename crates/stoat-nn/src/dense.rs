use rand::Rng;

use stoat_core::math::{add, add_bias_rowwise, matmul, sum_rows, transpose};
use stoat_core::{Error, Result, Tensor};

use crate::init::{he_uniform, xavier_uniform, Init};
use crate::module::{Module, NamedParam, Param};

// Dense — fully-connected layer
//
// Forward:  y = x @ w + b          x: [batch, in]   y: [batch, out]
// Backward: dw += xᵀ @ g           g: [batch, out]
//           db += sum_rows(g)
//           dx  = g @ wᵀ
//
// The weight is stored [in, out] so forward is a plain matmul with the
// batch on the left. Gradients accumulate across backward calls until the
// optimizer zeroes them.

/// A fully-connected layer: `y = x·w + b`.
///
/// # Example
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use stoat_core::Tensor;
/// use stoat_nn::{Dense, Module};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let mut layer = Dense::new(3, 2, &mut rng);
/// let x = Tensor::ones(4, 3); // batch of 4
/// let y = layer.forward(&x).unwrap();
/// assert_eq!(y.shape(), (4, 2));
/// ```
pub struct Dense {
    /// Weight matrix, `[in_features, out_features]`.
    w: Tensor,
    /// Bias row, `[1, out_features]`.
    b: Tensor,
    /// Gradient accumulator for `w`.
    dw: Tensor,
    /// Gradient accumulator for `b`.
    db: Tensor,
    /// Input cached by the last forward, consumed by backward.
    x_cache: Option<Tensor>,
}

impl Dense {
    /// Create a Dense layer with He-uniform weights and zero bias, drawing
    /// from the caller's seeded generator.
    pub fn new(in_features: usize, out_features: usize, rng: &mut impl Rng) -> Self {
        Self::with_init(in_features, out_features, Init::HeUniform, rng)
    }

    /// Create a Dense layer with an explicit initialization scheme.
    pub fn with_init(
        in_features: usize,
        out_features: usize,
        init: Init,
        rng: &mut impl Rng,
    ) -> Self {
        let w = match init {
            Init::HeUniform => he_uniform(in_features, out_features, rng),
            Init::XavierUniform => xavier_uniform(in_features, out_features, rng),
        };
        Dense {
            w,
            b: Tensor::zeros(1, out_features),
            dw: Tensor::zeros(in_features, out_features),
            db: Tensor::zeros(1, out_features),
            x_cache: None,
        }
    }

    /// Input feature dimension.
    pub fn in_features(&self) -> usize {
        self.w.rows()
    }

    /// Output feature dimension.
    pub fn out_features(&self) -> usize {
        self.w.cols()
    }
}

impl Module for Dense {
    fn forward(&mut self, x: &Tensor) -> Result<Tensor> {
        if x.cols() != self.w.rows() {
            return Err(Error::ShapeMismatch {
                op: "dense forward",
                lhs: x.shape(),
                rhs: self.w.shape(),
            });
        }
        self.x_cache = Some(x.clone());
        let y = matmul(x, &self.w)?;
        add_bias_rowwise(&y, &self.b)
    }

    fn backward(&mut self, grad_out: &Tensor) -> Result<Tensor> {
        let x = self
            .x_cache
            .take()
            .ok_or(Error::BackwardBeforeForward { layer: "Dense" })?;

        if grad_out.cols() != self.w.cols() || grad_out.rows() != x.rows() {
            return Err(Error::ShapeMismatch {
                op: "dense backward",
                lhs: grad_out.shape(),
                rhs: (x.rows(), self.w.cols()),
            });
        }

        let xt = transpose(&x);
        self.dw = add(&self.dw, &matmul(&xt, grad_out)?)?;
        self.db = add(&self.db, &sum_rows(grad_out))?;

        let wt = transpose(&self.w);
        matmul(grad_out, &wt)
    }

    fn named_parameters(&self) -> Vec<NamedParam<'_>> {
        vec![
            NamedParam {
                name: "W".to_string(),
                value: &self.w,
                grad: &self.dw,
            },
            NamedParam {
                name: "b".to_string(),
                value: &self.b,
                grad: &self.db,
            },
        ]
    }

    fn named_parameters_mut(&mut self) -> Vec<Param<'_>> {
        vec![
            Param {
                name: "W".to_string(),
                value: &mut self.w,
                grad: &mut self.dw,
            },
            Param {
                name: "b".to_string(),
                value: &mut self.b,
                grad: &mut self.db,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layer(in_f: usize, out_f: usize) -> Dense {
        let mut rng = StdRng::seed_from_u64(1);
        Dense::new(in_f, out_f, &mut rng)
    }

    #[test]
    fn test_forward_shapes() {
        let mut d = layer(3, 2);
        let x = Tensor::ones(5, 3);
        let y = d.forward(&x).unwrap();
        assert_eq!(y.shape(), (5, 2));

        let bad = Tensor::ones(5, 4);
        assert!(d.forward(&bad).is_err());
    }

    #[test]
    fn test_backward_shapes_and_grad_input() {
        let mut d = layer(3, 2);
        let x = Tensor::ones(4, 3);
        d.forward(&x).unwrap();
        let g = Tensor::ones(4, 2);
        let dx = d.backward(&g).unwrap();
        assert_eq!(dx.shape(), (4, 3));
    }

    #[test]
    fn test_backward_rejects_wrong_grad_shape() {
        let mut d = layer(3, 2);
        d.forward(&Tensor::ones(4, 3)).unwrap();
        assert!(d.backward(&Tensor::ones(4, 5)).is_err());
    }

    #[test]
    fn test_backward_without_forward_is_error() {
        let mut d = layer(2, 2);
        let err = d.backward(&Tensor::ones(1, 2)).unwrap_err();
        assert!(matches!(
            err,
            Error::BackwardBeforeForward { layer: "Dense" }
        ));

        // A forward re-arms backward exactly once.
        d.forward(&Tensor::ones(1, 2)).unwrap();
        d.backward(&Tensor::ones(1, 2)).unwrap();
        assert!(d.backward(&Tensor::ones(1, 2)).is_err());
    }

    #[test]
    fn test_gradients_accumulate_across_passes() {
        let mut d = layer(2, 1);
        let x = Tensor::from_vec(1, 2, vec![1.0, 2.0]).unwrap();

        let g1 = Tensor::from_vec(1, 1, vec![0.1]).unwrap();
        d.forward(&x).unwrap();
        d.backward(&g1).unwrap();
        let first: Vec<f32> = d.named_parameters()[0].grad.data().to_vec();

        let g2 = Tensor::from_vec(1, 1, vec![0.2]).unwrap();
        d.forward(&x).unwrap();
        d.backward(&g2).unwrap();
        let accumulated = d.named_parameters()[0].grad.data().to_vec();

        // 0.1 then 0.2 on the same input: total = 3x the first pass.
        for (f, a) in first.iter().zip(&accumulated) {
            assert!((a - 3.0 * f).abs() < 1e-6, "expected {} got {}", 3.0 * f, a);
        }
    }

    #[test]
    fn test_named_parameters_order_and_shapes() {
        let d = layer(3, 2);
        let ps = d.named_parameters();
        assert_eq!(ps.len(), 2);
        assert_eq!(ps[0].name, "W");
        assert_eq!(ps[0].value.shape(), (3, 2));
        assert_eq!(ps[0].grad.shape(), (3, 2));
        assert_eq!(ps[1].name, "b");
        assert_eq!(ps[1].value.shape(), (1, 2));
    }
}
