use stoat_core::math::{
    div_rowwise, exp, log, rowwise_max, rowwise_sum, sigmoid_scalar, sub_rowwise,
};
use stoat_core::{Error, Result, Tensor};

// Loss functions
//
// Each loss returns (scalar loss, gradient w.r.t. predictions); the
// gradient is what you feed into the model's backward. All three divide by
// the batch ROW count, not the element count, so per-sample gradient scale
// is independent of output width.
//
// Numerical stability is by construction, not by runtime guards:
//   - bce_with_logits uses max(x,0) - x*y + log1p(e^-|x|), which never
//     exponentiates a positive value
//   - softmax CE shifts each row by its max before exponentiating
//     (log-sum-exp), so logits of any magnitude stay finite

fn check_same_shape(op: &'static str, a: &Tensor, b: &Tensor) -> Result<()> {
    if !a.same_shape(b) {
        return Err(Error::ShapeMismatch {
            op,
            lhs: a.shape(),
            rhs: b.shape(),
        });
    }
    Ok(())
}

/// Mean squared error.
///
/// `loss = sum((pred - target)²) / batch_rows`, gradient per element
/// `2 * (pred - target) / batch_rows`.
pub fn mse_loss(preds: &Tensor, targets: &Tensor) -> Result<(f32, Tensor)> {
    check_same_shape("mse_loss", preds, targets)?;

    let batch = preds.rows() as f32;
    let mut grad = Tensor::zeros_like(preds);
    let mut loss_sum = 0.0;

    for (i, (&p, &t)) in preds.data().iter().zip(targets.data()).enumerate() {
        let diff = p - t;
        loss_sum += diff * diff;
        grad.data_mut()[i] = 2.0 * diff / batch;
    }

    Ok((loss_sum / batch, grad))
}

/// Binary cross-entropy on raw logits (single output column).
///
/// Uses the stable form `max(x, 0) - x*y + ln(1 + e^-|x|)` averaged over
/// rows; the gradient is `(sigmoid(x) - y) / batch_rows`. Targets are
/// expected in {0, 1}.
pub fn bce_with_logits(logits: &Tensor, targets: &Tensor) -> Result<(f32, Tensor)> {
    check_same_shape("bce_with_logits", logits, targets)?;
    if logits.cols() != 1 {
        return Err(Error::ShapeMismatch {
            op: "bce_with_logits (one column required)",
            lhs: logits.shape(),
            rhs: (logits.rows(), 1),
        });
    }

    let batch = logits.rows() as f32;
    let mut grad = Tensor::zeros_like(logits);
    let mut loss_sum = 0.0;

    for (i, (&x, &y)) in logits.data().iter().zip(targets.data()).enumerate() {
        loss_sum += x.max(0.0) - x * y + (-x.abs()).exp().ln_1p();
        grad.data_mut()[i] = (sigmoid_scalar(x) - y) / batch;
    }

    Ok((loss_sum / batch, grad))
}

/// Softmax cross-entropy on raw logits with one-hot targets.
///
/// Computes row-wise log-softmax via the max-shifted log-sum-exp, then
/// `loss = -mean_rows(Σ target · log_softmax)` and gradient
/// `(softmax - target) / batch_rows`.
pub fn softmax_cross_entropy_with_logits(
    logits: &Tensor,
    targets: &Tensor,
) -> Result<(f32, Tensor)> {
    check_same_shape("softmax_cross_entropy", logits, targets)?;

    // Shift by the row max so exp never overflows.
    let max_logits = rowwise_max(logits);
    let shifted = sub_rowwise(logits, &max_logits)?;
    let exps = exp(&shifted);
    let z = rowwise_sum(&exps);
    let log_z = log(&z);
    let log_softmax = sub_rowwise(&shifted, &log_z)?;

    let batch = logits.rows() as f32;
    let mut loss_sum = 0.0;
    for (&t, &ls) in targets.data().iter().zip(log_softmax.data()) {
        loss_sum -= t * ls;
    }

    let probs = div_rowwise(&exps, &z)?;
    let mut grad = Tensor::zeros_like(logits);
    for (i, (&p, &t)) in probs.data().iter().zip(targets.data()).enumerate() {
        grad.data_mut()[i] = (p - t) / batch;
    }

    Ok((loss_sum / batch, grad))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_fixed_example() {
        let preds = Tensor::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let targets = Tensor::from_vec(2, 2, vec![1.0, 1.0, 3.0, 5.0]).unwrap();
        let (loss, grad) = mse_loss(&preds, &targets).unwrap();
        assert!((loss - 1.0).abs() < 1e-6);
        assert_eq!(grad.data(), &[0.0, 1.0, 0.0, -1.0]);
    }

    #[test]
    fn test_mse_shape_mismatch() {
        let a = Tensor::zeros(2, 2);
        let b = Tensor::zeros(2, 3);
        assert!(mse_loss(&a, &b).is_err());
    }

    #[test]
    fn test_bce_at_zero_logit() {
        let logits = Tensor::from_vec(1, 1, vec![0.0]).unwrap();
        let targets = Tensor::from_vec(1, 1, vec![1.0]).unwrap();
        let (loss, grad) = bce_with_logits(&logits, &targets).unwrap();
        // -ln(0.5)
        assert!((loss - 0.693147).abs() < 1e-5);
        assert!((grad[(0, 0)] - (-0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_bce_extreme_logits_stay_finite() {
        // Maximally wrong predictions with huge logits.
        let logits = Tensor::from_vec(2, 1, vec![50.0, -50.0]).unwrap();
        let targets = Tensor::from_vec(2, 1, vec![0.0, 1.0]).unwrap();
        let (loss, grad) = bce_with_logits(&logits, &targets).unwrap();
        assert!(loss.is_finite());
        assert!((loss - 50.0).abs() < 1e-3);
        assert!(grad.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_bce_requires_single_column() {
        let logits = Tensor::zeros(2, 2);
        let targets = Tensor::zeros(2, 2);
        assert!(bce_with_logits(&logits, &targets).is_err());
    }

    #[test]
    fn test_softmax_ce_uniform_logits() {
        // All-zero logits over 3 classes: loss = -ln(1/3) per row.
        let logits = Tensor::zeros(2, 3);
        let mut targets = Tensor::zeros(2, 3);
        targets[(0, 0)] = 1.0;
        targets[(1, 2)] = 1.0;
        let (loss, grad) = softmax_cross_entropy_with_logits(&logits, &targets).unwrap();
        assert!((loss - 3.0f32.ln()).abs() < 1e-5);
        // Gradient rows sum to zero.
        assert!((grad.row(0).iter().sum::<f32>()).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_ce_huge_logit_no_nan() {
        let logits = Tensor::from_vec(1, 3, vec![1000.0, 0.0, 0.0]).unwrap();
        let mut targets = Tensor::zeros(1, 3);
        targets[(0, 0)] = 1.0;
        let (loss, grad) = softmax_cross_entropy_with_logits(&logits, &targets).unwrap();
        assert!(loss.is_finite());
        assert!(loss.abs() < 1e-5);
        assert!(grad.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_softmax_ce_gradient_direction() {
        // Wrong confident prediction: gradient pushes logit 0 down, logit 1 up.
        let logits = Tensor::from_vec(1, 2, vec![5.0, -5.0]).unwrap();
        let targets = Tensor::from_vec(1, 2, vec![0.0, 1.0]).unwrap();
        let (_, grad) = softmax_cross_entropy_with_logits(&logits, &targets).unwrap();
        assert!(grad[(0, 0)] > 0.0);
        assert!(grad[(0, 1)] < 0.0);
    }
}
