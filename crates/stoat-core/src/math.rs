use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::tensor::Tensor;

// Math kernels — pure functions over Tensors
//
// Every kernel checks its shape preconditions at entry and returns a freshly
// allocated output tensor; operands are never mutated. The hand-written
// derivative kernels (relu_backward, sigmoid_backward_from_output) live here
// next to their forward counterparts so the pairing is obvious.
//
// matmul is the one parallel kernel: output rows depend only on read-only
// inputs and land in disjoint slices of the output buffer, so rayon can
// split the work across rows with no synchronization.

/// Check that two operands share a shape, for elementwise kernels.
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

/// Matrix multiplication: `[m, k] @ [k, n] → [m, n]`.
///
/// `b` is transposed into a scratch copy first so the inner reduction reads
/// both operands with unit stride — each output element is a cache-friendly
/// dot product of two contiguous rows. Output rows are computed in parallel.
pub fn matmul(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    if a.cols() != b.rows() {
        return Err(Error::MatmulShapeMismatch {
            m: a.rows(),
            k1: a.cols(),
            k2: b.rows(),
            n: b.cols(),
        });
    }
    let (m, k) = a.shape();
    let n = b.cols();

    // Zero output columns: nothing to compute, and chunking by 0 would panic.
    if n == 0 {
        return Ok(Tensor::zeros(m, 0));
    }

    let bt = transpose(b);
    let mut c = Tensor::zeros(m, n);

    c.data_mut()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(i, c_row)| {
            let a_row = &a.data()[i * k..(i + 1) * k];
            for (j, out) in c_row.iter_mut().enumerate() {
                let b_row = &bt.data()[j * k..(j + 1) * k];
                let mut sum = 0.0;
                for l in 0..k {
                    sum += a_row[l] * b_row[l];
                }
                *out = sum;
            }
        });

    Ok(c)
}

/// Transpose: `[r, c] → [c, r]`. `transpose(transpose(a)) == a`.
pub fn transpose(a: &Tensor) -> Tensor {
    let (rows, cols) = a.shape();
    let mut t = Tensor::zeros(cols, rows);
    for i in 0..rows {
        for j in 0..cols {
            t[(j, i)] = a[(i, j)];
        }
    }
    t
}

/// Elementwise addition. Shapes must match.
pub fn add(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    check_same_shape("add", a, b)?;
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| x + y)
        .collect();
    Tensor::from_vec(a.rows(), a.cols(), data)
}

/// Elementwise subtraction. Shapes must match.
pub fn sub(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    check_same_shape("sub", a, b)?;
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| x - y)
        .collect();
    Tensor::from_vec(a.rows(), a.cols(), data)
}

/// Elementwise multiplication. Shapes must match.
pub fn mul(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    check_same_shape("mul", a, b)?;
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| x * y)
        .collect();
    Tensor::from_vec(a.rows(), a.cols(), data)
}

/// Scale every element by `s`.
pub fn mul_scalar(a: &Tensor, s: f32) -> Tensor {
    let data = a.data().iter().map(|&x| x * s).collect();
    Tensor::from_vec(a.rows(), a.cols(), data).expect("shape preserved")
}

/// Broadcast a single-row bias `b` across every row of `x`.
///
/// `b` must be `1 × x.cols`.
pub fn add_bias_rowwise(x: &Tensor, b: &Tensor) -> Result<Tensor> {
    if b.rows() != 1 || b.cols() != x.cols() {
        return Err(Error::ShapeMismatch {
            op: "add_bias_rowwise",
            lhs: x.shape(),
            rhs: b.shape(),
        });
    }
    let cols = x.cols();
    let mut y = x.clone();
    if cols > 0 {
        for row in y.data_mut().chunks_mut(cols) {
            for (v, &bias) in row.iter_mut().zip(b.data()) {
                *v += bias;
            }
        }
    }
    Ok(y)
}

/// Column-wise sum over all rows, returned as a single row.
///
/// This is the reduction behind bias gradients: `db = sum_rows(grad_out)`.
pub fn sum_rows(x: &Tensor) -> Tensor {
    let cols = x.cols();
    let mut s = Tensor::zeros(1, cols);
    if cols == 0 {
        return s;
    }
    for row in x.data().chunks(cols) {
        for (acc, &v) in s.data_mut().iter_mut().zip(row) {
            *acc += v;
        }
    }
    s
}

/// ReLU: `max(0, x)` elementwise.
pub fn relu(x: &Tensor) -> Tensor {
    let data = x.data().iter().map(|&v| v.max(0.0)).collect();
    Tensor::from_vec(x.rows(), x.cols(), data).expect("shape preserved")
}

/// ReLU derivative: pass `dy` through where the original input was positive,
/// zero elsewhere. `x` is the pre-activation input, not the ReLU output.
pub fn relu_backward(x: &Tensor, dy: &Tensor) -> Result<Tensor> {
    check_same_shape("relu_backward", x, dy)?;
    let data = x
        .data()
        .iter()
        .zip(dy.data())
        .map(|(&v, &g)| if v > 0.0 { g } else { 0.0 })
        .collect();
    Tensor::from_vec(x.rows(), x.cols(), data)
}

/// Branch-stable scalar sigmoid.
///
/// For x >= 0 uses `1 / (1 + e^-x)`; for x < 0 uses `e^x / (1 + e^x)`. Both
/// branches only ever exponentiate a non-positive value, so the intermediate
/// never overflows for large |x|.
pub fn sigmoid_scalar(x: f32) -> f32 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Sigmoid: `1 / (1 + e^-x)` elementwise, computed branch-stable.
pub fn sigmoid(x: &Tensor) -> Tensor {
    let data = x.data().iter().map(|&v| sigmoid_scalar(v)).collect();
    Tensor::from_vec(x.rows(), x.cols(), data).expect("shape preserved")
}

/// Sigmoid derivative from the forward *output*: `dy * y * (1 - y)`.
///
/// Consuming the cached output avoids recomputing the sigmoid in backward.
pub fn sigmoid_backward_from_output(y: &Tensor, dy: &Tensor) -> Result<Tensor> {
    check_same_shape("sigmoid_backward", y, dy)?;
    let data = y
        .data()
        .iter()
        .zip(dy.data())
        .map(|(&s, &g)| g * s * (1.0 - s))
        .collect();
    Tensor::from_vec(y.rows(), y.cols(), data)
}

/// Elementwise `e^x`.
pub fn exp(x: &Tensor) -> Tensor {
    let data = x.data().iter().map(|&v| v.exp()).collect();
    Tensor::from_vec(x.rows(), x.cols(), data).expect("shape preserved")
}

/// Elementwise natural logarithm.
pub fn log(x: &Tensor) -> Tensor {
    let data = x.data().iter().map(|&v| v.ln()).collect();
    Tensor::from_vec(x.rows(), x.cols(), data).expect("shape preserved")
}

// Row-broadcast helpers
//
// These exist to build numerically stable softmax: shift each row by its
// max, exponentiate, normalize by the row sum. Each returns either a column
// (one value per row) or a full matrix with the column broadcast across it.

/// Maximum of each row, as an `[rows, 1]` column.
pub fn rowwise_max(x: &Tensor) -> Tensor {
    let cols = x.cols();
    if cols == 0 {
        // Max over an empty row is the fold identity.
        let data = vec![f32::NEG_INFINITY; x.rows()];
        return Tensor::from_vec(x.rows(), 1, data).expect("one per row");
    }
    let data = x
        .data()
        .chunks(cols)
        .map(|row| row.iter().copied().fold(f32::NEG_INFINITY, f32::max))
        .collect();
    Tensor::from_vec(x.rows(), 1, data).expect("one per row")
}

/// Sum of each row, as an `[rows, 1]` column.
pub fn rowwise_sum(x: &Tensor) -> Tensor {
    let cols = x.cols();
    if cols == 0 {
        return Tensor::zeros(x.rows(), 1);
    }
    let data = x.data().chunks(cols).map(|row| row.iter().sum()).collect();
    Tensor::from_vec(x.rows(), 1, data).expect("one per row")
}

/// Subtract a `[rows, 1]` column `v` from every column of `x`.
pub fn sub_rowwise(x: &Tensor, v: &Tensor) -> Result<Tensor> {
    if v.rows() != x.rows() || v.cols() != 1 {
        return Err(Error::ShapeMismatch {
            op: "sub_rowwise",
            lhs: x.shape(),
            rhs: v.shape(),
        });
    }
    let cols = x.cols();
    let mut y = x.clone();
    if cols > 0 {
        for (i, row) in y.data_mut().chunks_mut(cols).enumerate() {
            let s = v.get(i, 0);
            for val in row.iter_mut() {
                *val -= s;
            }
        }
    }
    Ok(y)
}

/// Divide every column of `x` by a `[rows, 1]` column `v`.
pub fn div_rowwise(x: &Tensor, v: &Tensor) -> Result<Tensor> {
    if v.rows() != x.rows() || v.cols() != 1 {
        return Err(Error::ShapeMismatch {
            op: "div_rowwise",
            lhs: x.shape(),
            rhs: v.shape(),
        });
    }
    let cols = x.cols();
    let mut y = x.clone();
    if cols > 0 {
        for (i, row) in y.data_mut().chunks_mut(cols).enumerate() {
            let s = v.get(i, 0);
            for val in row.iter_mut() {
                *val /= s;
            }
        }
    }
    Ok(y)
}

/// Mean over all elements.
pub fn mean(x: &Tensor) -> f32 {
    let sum: f32 = x.data().iter().sum();
    sum / x.elem_count() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul_hand_computed() {
        // [[1,2],[3,4]] @ [[5,6],[7,8]] = [[19,22],[43,50]]
        let a = Tensor::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Tensor::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = matmul(&a, &b).unwrap();
        assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_rectangular() {
        // [2,3] @ [3,1] -> [2,1]
        let a = Tensor::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Tensor::from_vec(3, 1, vec![1.0, 0.0, -1.0]).unwrap();
        let c = matmul(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 1));
        assert_eq!(c.data(), &[-2.0, -2.0]);
    }

    #[test]
    fn test_matmul_inner_dim_mismatch() {
        let a = Tensor::zeros(2, 3);
        let b = Tensor::zeros(2, 3);
        assert!(matches!(
            matmul(&a, &b),
            Err(Error::MatmulShapeMismatch { k1: 3, k2: 2, .. })
        ));
    }

    #[test]
    fn test_transpose_involution() {
        let a = Tensor::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let t = transpose(&a);
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t[(0, 1)], 4.0);
        assert_eq!(transpose(&t), a);
    }

    #[test]
    fn test_elementwise_ops() {
        let a = Tensor::from_vec(1, 3, vec![1.0, 2.0, 3.0]).unwrap();
        let b = Tensor::from_vec(1, 3, vec![4.0, 5.0, 6.0]).unwrap();
        assert_eq!(add(&a, &b).unwrap().data(), &[5.0, 7.0, 9.0]);
        assert_eq!(sub(&b, &a).unwrap().data(), &[3.0, 3.0, 3.0]);
        assert_eq!(mul(&a, &b).unwrap().data(), &[4.0, 10.0, 18.0]);
        assert_eq!(mul_scalar(&a, 2.0).data(), &[2.0, 4.0, 6.0]);

        let c = Tensor::zeros(3, 1);
        assert!(add(&a, &c).is_err());
        assert!(sub(&a, &c).is_err());
        assert!(mul(&a, &c).is_err());
    }

    #[test]
    fn test_bias_and_sum_rows() {
        let x = Tensor::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Tensor::from_vec(1, 2, vec![10.0, 20.0]).unwrap();
        let y = add_bias_rowwise(&x, &b).unwrap();
        assert_eq!(y.data(), &[11.0, 22.0, 13.0, 24.0]);

        let s = sum_rows(&x);
        assert_eq!(s.shape(), (1, 2));
        assert_eq!(s.data(), &[4.0, 6.0]);

        let bad = Tensor::zeros(1, 3);
        assert!(add_bias_rowwise(&x, &bad).is_err());
    }

    #[test]
    fn test_relu_and_backward() {
        let x = Tensor::from_vec(1, 4, vec![-1.0, 0.0, 2.0, -3.0]).unwrap();
        assert_eq!(relu(&x).data(), &[0.0, 0.0, 2.0, 0.0]);

        let dy = Tensor::ones(1, 4);
        let dx = relu_backward(&x, &dy).unwrap();
        assert_eq!(dx.data(), &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_sigmoid_stable_at_extremes() {
        let x = Tensor::from_vec(1, 3, vec![-100.0, 0.0, 100.0]).unwrap();
        let y = sigmoid(&x);
        assert!(y.data().iter().all(|v| v.is_finite()));
        assert!(y[(0, 0)] < 1e-6);
        assert!((y[(0, 1)] - 0.5).abs() < 1e-6);
        assert!(y[(0, 2)] > 1.0 - 1e-6);
    }

    #[test]
    fn test_sigmoid_backward_from_output() {
        let x = Tensor::from_vec(1, 1, vec![0.0]).unwrap();
        let y = sigmoid(&x);
        let dy = Tensor::ones(1, 1);
        let dx = sigmoid_backward_from_output(&y, &dy).unwrap();
        // sigma'(0) = 0.25
        assert!((dx[(0, 0)] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rowwise_helpers() {
        let x = Tensor::from_vec(2, 3, vec![1.0, 5.0, 3.0, -2.0, 0.0, -1.0]).unwrap();
        let mx = rowwise_max(&x);
        assert_eq!(mx.data(), &[5.0, 0.0]);
        let sm = rowwise_sum(&x);
        assert_eq!(sm.data(), &[9.0, -3.0]);

        let shifted = sub_rowwise(&x, &mx).unwrap();
        assert_eq!(shifted.data(), &[-4.0, 0.0, -2.0, -2.0, 0.0, -1.0]);

        let halves = Tensor::from_vec(2, 1, vec![2.0, 2.0]).unwrap();
        let divided = div_rowwise(&x, &halves).unwrap();
        assert_eq!(divided[(0, 1)], 2.5);
    }

    #[test]
    fn test_zero_column_operands() {
        // Degenerate but shape-valid inputs must produce empty results, not
        // panic in the chunked loops.
        let a = Tensor::zeros(2, 3);
        let b = Tensor::zeros(3, 0);
        let c = matmul(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 0));

        let empty = Tensor::zeros(2, 0);
        assert_eq!(sum_rows(&empty).shape(), (1, 0));
        assert_eq!(rowwise_sum(&empty).data(), &[0.0, 0.0]);
        assert_eq!(
            rowwise_max(&empty).data(),
            &[f32::NEG_INFINITY, f32::NEG_INFINITY]
        );

        let bias = Tensor::zeros(1, 0);
        assert_eq!(add_bias_rowwise(&empty, &bias).unwrap().shape(), (2, 0));

        let col = Tensor::zeros(2, 1);
        assert_eq!(sub_rowwise(&empty, &col).unwrap().shape(), (2, 0));
        assert_eq!(div_rowwise(&empty, &col).unwrap().shape(), (2, 0));
    }

    #[test]
    fn test_mean() {
        let x = Tensor::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(mean(&x), 2.5);
    }
}
